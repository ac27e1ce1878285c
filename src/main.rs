use dotenvy::dotenv;
use schoolhub::router::init_router;
use schoolhub::state::init_app_state;
use schoolhub_observability::{init_metrics, init_tracing, metrics_app};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    if let Some(handle) = init_metrics() {
        let metrics_port = std::env::var("METRICS_PORT").unwrap_or_else(|_| "9000".to_string());
        tokio::spawn(async move {
            let addr = format!("0.0.0.0:{}", metrics_port);
            match tokio::net::TcpListener::bind(&addr).await {
                Ok(listener) => {
                    info!(address = %addr, "Metrics server listening");
                    if let Err(err) = axum::serve(listener, metrics_app(handle)).await {
                        error!(error = %err, "Metrics server stopped");
                    }
                }
                Err(err) => error!(address = %addr, error = %err, "Failed to bind metrics server"),
            }
        });
    }

    let state = init_app_state().await;
    let app = init_router(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");

    info!(address = %addr, "Server running");
    println!("🚀 Server running on http://localhost:{}", port);
    println!("📚 Swagger UI available at http://localhost:{}/swagger-ui", port);
    println!("📖 Scalar UI available at http://localhost:{}/scalar", port);

    axum::serve(listener, app).await.expect("Server error");
}

//! SchoolHub Observability
//!
//! - Structured logging to the console and rolling files
//! - HTTP request logging middleware
//! - Prometheus metrics, including account and password reset counters
//!
//! Compiled in via the `observability` feature (default). At runtime the
//! `OBSERVABILITY_ENABLED` environment variable can switch file logging and
//! metrics off, leaving console logging only.
//!
//! # Examples
//!
//! ```no_run
//! use schoolhub_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     let _handle = init_metrics();
//! }
//! ```

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, is_observability_enabled, logging_middleware};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, metrics_app, metrics_middleware, track_account_provisioned,
    track_credentials_mail, track_jwt_issued, track_password_reset, track_user_login_failure,
    track_user_login_success,
};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn init_tracing() {}

    /// Stand-in for the Prometheus handle; never constructed.
    #[derive(Clone)]
    pub enum PrometheusHandle {}

    pub fn init_metrics() -> Option<PrometheusHandle> {
        None
    }

    pub fn metrics_app(handle: PrometheusHandle) -> Router {
        match handle {}
    }

    pub fn track_account_provisioned(_kind: &str) {}
    pub fn track_credentials_mail(_sent: bool) {}
    pub fn track_password_reset(_stage: &str, _outcome: &str) {}
    pub fn track_user_login_success(_role: &str) {}
    pub fn track_user_login_failure(_reason: &str) {}
    pub fn track_jwt_issued() {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;

use axum::{Router, routing::post};

use super::controller::{forgot_password, reset_password, verify_otp};
use crate::state::AppState;

pub fn init_password_reset_router() -> Router<AppState> {
    Router::new()
        .route("/forgot-password", post(forgot_password))
        .route("/verify-otp", post(verify_otp))
        .route("/reset-password", post(reset_password))
}

use axum::{Router, routing::get};

use super::controller::{dashboard, profile};
use crate::state::AppState;

pub fn init_navigation_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/profile", get(profile))
}

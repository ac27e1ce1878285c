use axum::{Router, routing::post};

use super::controller::login_user;
use crate::modules::password_reset::router::init_password_reset_router;
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_user))
        .merge(init_password_reset_router())
}

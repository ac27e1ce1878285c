use axum::{
    Router,
    routing::{delete, get},
};

use super::controller::{delete_user, get_current_user};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/{id}", delete(delete_user))
}

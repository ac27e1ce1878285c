use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_driver, create_parent, create_staff, create_student, get_driver, get_parent,
    get_staff, get_student, update_driver, update_parent, update_staff, update_student,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student))
        .route("/{id}", get(get_student).put(update_student))
}

pub fn init_staff_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_staff))
        .route("/{id}", get(get_staff).put(update_staff))
}

pub fn init_drivers_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_driver))
        .route("/{id}", get(get_driver).put(update_driver))
}

pub fn init_parents_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_parent))
        .route("/{id}", get(get_parent).put(update_parent))
}

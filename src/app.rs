use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/refresh", post(handlers::refresh))
        .route("/subscribers/add", post(handlers::add_subscriber))
        .route("/subscribers/update", post(handlers::update_subscriber))
        .route("/subscribers/remove", post(handlers::remove_subscriber))
        .route("/send", post(handlers::send_message))
        .route("/rows/edit", post(handlers::edit_row))
        .route("/rows/send", post(handlers::send_row))
        .route("/api/view", get(handlers::view))
        .with_state(state)
}

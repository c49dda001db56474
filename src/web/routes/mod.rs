//! Contains all the routes that this application can handle.

mod health;
mod waitlist;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new().nest("/api", api_routes(app_state))
}

/// API - Routes nested under "/api" path
fn api_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/waitlist", post(waitlist::waitlist_submit))
        .with_state(app_state)
}

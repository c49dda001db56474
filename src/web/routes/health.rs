use axum::{extract::State, Json};

use crate::{waitlist::HealthStatus, AppState};

pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthStatus> {
    Json(app_state.registrar.health_check())
}

use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/click", post(handlers::click_form))
        .route("/api/click", post(handlers::click))
        .route("/api/habits", get(handlers::get_habits))
        .route("/api/presets", get(handlers::get_presets))
        .route("/api/export", get(handlers::get_export))
        .route("/api/notifications", get(handlers::get_notifications))
        .route("/notifications/:tag/click", post(handlers::notification_click))
        .fallback(handlers::asset)
        .with_state(state)
}

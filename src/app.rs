use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/checkin", post(handlers::check_in_form))
        .route("/prayer-types/add", post(handlers::add_prayer_type_form))
        .route("/prayer-types/remove", post(handlers::remove_prayer_type_form))
        .route("/reset", post(handlers::reset_form))
        .route("/api/today", get(handlers::get_today))
        .route("/api/checkin", post(handlers::check_in))
        .route("/api/history", get(handlers::get_history))
        .route("/api/calendar", get(handlers::get_calendar))
        .route(
            "/api/prayer-types",
            get(handlers::list_prayer_types).post(handlers::add_prayer_type),
        )
        .route("/api/prayer-types/:name", delete(handlers::remove_prayer_type))
        .route("/api/reset", post(handlers::reset))
        .route("/api/share", get(handlers::get_share))
        .with_state(state)
}

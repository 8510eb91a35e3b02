use crate::handlers::{alert, event};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/create-event/", post(event::create_event))
        .route("/list-alerts/", get(alert::list_alerts))
        .route(
            "/update-alert/{id}/",
            patch(alert::patch_alert).put(alert::put_alert),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

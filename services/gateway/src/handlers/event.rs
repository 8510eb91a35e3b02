use crate::auth::ElevatedUser;
use crate::error::AppError;
use crate::models::{CreateEventRequest, EventResponse};
use crate::state::AppState;
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};

/// `POST /create-event/`
///
/// Any alert the event raises already exists when this returns.
pub async fn create_event(
    State(state): State<AppState>,
    ElevatedUser(user): ElevatedUser,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let Json(payload) = payload?;
    let new_event = payload.into_new_event()?;

    let event = state.alerts.create_event(new_event).await?;
    tracing::debug!(subject = %user.subject, event_id = %event.id, "event ingested");

    Ok((StatusCode::CREATED, Json(event.into())))
}

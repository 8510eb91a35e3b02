use crate::auth::{AuthenticatedUser, ElevatedUser};
use crate::error::AppError;
use crate::models::{AlertResponse, AlertStatusResponse, ListAlertsQuery, UpdateAlertRequest};
use crate::state::AppState;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
};
use types::ids::AlertId;

/// `GET /list-alerts/?status=&severity=`
pub async fn list_alerts(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    query: Result<Query<ListAlertsQuery>, QueryRejection>,
) -> Result<Json<Vec<AlertResponse>>, AppError> {
    let Query(query) = query?;
    let filter = query.into_filter()?;

    let alerts = state.alerts.list_alerts(&filter).await?;

    Ok(Json(alerts.into_iter().map(AlertResponse::from).collect()))
}

/// `PATCH /update-alert/{id}/`
///
/// Partial update: a body without `status` leaves the alert unchanged and
/// echoes its current status.
pub async fn patch_alert(
    State(state): State<AppState>,
    ElevatedUser(user): ElevatedUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAlertRequest>, JsonRejection>,
) -> Result<Json<AlertStatusResponse>, AppError> {
    let alert_id = parse_alert_id(&id)?;
    let Json(payload) = payload?;

    let alert = if payload.status.is_some() {
        let status = payload.status()?;
        state.alerts.update_alert_status(alert_id, status).await?
    } else {
        state.alerts.get_alert(alert_id).await?
    };
    tracing::debug!(subject = %user.subject, alert_id = %alert.id, "alert patched");

    Ok(Json(AlertStatusResponse {
        status: alert.status,
    }))
}

/// `PUT /update-alert/{id}/`
pub async fn put_alert(
    State(state): State<AppState>,
    ElevatedUser(user): ElevatedUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAlertRequest>, JsonRejection>,
) -> Result<Json<AlertStatusResponse>, AppError> {
    let alert_id = parse_alert_id(&id)?;
    let Json(payload) = payload?;
    let status = payload.status()?;

    let alert = state.alerts.update_alert_status(alert_id, status).await?;
    tracing::debug!(subject = %user.subject, alert_id = %alert.id, "alert updated");

    Ok(Json(AlertStatusResponse {
        status: alert.status,
    }))
}

// Unparseable ids cannot name an alert.
fn parse_alert_id(id: &str) -> Result<AlertId, AppError> {
    id.parse()
        .map_err(|_| AppError::NotFound(format!("alert {}", id)))
}

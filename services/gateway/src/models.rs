use alerting::filter::AlertFilter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::alert::{AlertStatus, AlertWithEvent};
use types::errors::ValidationError;
use types::event::{Event, NewEvent, Severity};
use types::ids::{AlertId, EventId};

/// `POST /create-event/` body
///
/// Fields are optional here so that a missing one is reported as a
/// validation error naming the field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEventRequest {
    pub source: Option<String>,
    pub event_type: Option<String>,
    pub severity: Option<i64>,
    pub description: Option<String>,
}

impl CreateEventRequest {
    pub fn into_new_event(self) -> Result<NewEvent, ValidationError> {
        let source = self
            .source
            .ok_or(ValidationError::MissingField { field: "source" })?;
        let event_type = self
            .event_type
            .ok_or(ValidationError::MissingField { field: "event_type" })?;
        let severity = self
            .severity
            .ok_or(ValidationError::MissingField { field: "severity" })?;
        let description = self
            .description
            .ok_or(ValidationError::MissingField { field: "description" })?;

        NewEvent::new(source, event_type, Severity::try_from(severity)?, description)
    }
}

/// Event as echoed by the create endpoint; severity stays numeric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: EventId,
    pub source: String,
    pub event_type: String,
    pub severity: Severity,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            source: event.source,
            event_type: event.event_type,
            severity: event.severity,
            description: event.description,
            created_at: event.created_at,
        }
    }
}

/// Event embedded in a listed alert; severity rendered as its label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetail {
    pub id: EventId,
    pub source: String,
    pub event_type: String,
    pub severity: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertResponse {
    pub id: AlertId,
    pub event: EventDetail,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<AlertWithEvent> for AlertResponse {
    fn from(item: AlertWithEvent) -> Self {
        let AlertWithEvent { alert, event } = item;
        Self {
            id: alert.id,
            status: alert.status.label().to_string(),
            created_at: alert.created_at,
            event: EventDetail {
                id: event.id,
                severity: event.severity.label().to_string(),
                source: event.source,
                event_type: event.event_type,
                description: event.description,
                created_at: event.created_at,
            },
        }
    }
}

/// `GET /list-alerts/` query string
///
/// Kept as raw text: an empty value means "no constraint", anything else must
/// be an in-domain integer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAlertsQuery {
    pub status: Option<String>,
    pub severity: Option<String>,
}

impl ListAlertsQuery {
    pub fn into_filter(self) -> Result<AlertFilter, ValidationError> {
        let mut filter = AlertFilter::default();
        if let Some(value) = parse_number("status", self.status.as_deref())? {
            filter = filter.with_status(AlertStatus::try_from(value)?);
        }
        if let Some(value) = parse_number("severity", self.severity.as_deref())? {
            filter = filter.with_severity(Severity::try_from(value)?);
        }
        Ok(filter)
    }
}

fn parse_number(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ValidationError::Invalid {
                field,
                reason: "enter a number".to_string(),
            }),
    }
}

/// `PATCH|PUT /update-alert/{id}/` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAlertRequest {
    pub status: Option<i64>,
}

impl UpdateAlertRequest {
    pub fn status(&self) -> Result<AlertStatus, ValidationError> {
        let value = self
            .status
            .ok_or(ValidationError::MissingField { field: "status" })?;
        AlertStatus::try_from(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertStatusResponse {
    pub status: AlertStatus,
}

//! Request-scoped alerting operations
//!
//! Each public method is one unit of work against the shared store. Ingestion
//! is an explicit two-step pipeline, persist the event then derive its alert,
//! both inside one transaction.

use std::sync::Arc;

use chrono::Utc;
use types::alert::{Alert, AlertStatus, AlertWithEvent};
use types::errors::ValidationError;
use types::event::{Event, NewEvent};
use types::ids::{AlertId, EventId};

use crate::audit::{AuditRecord, AuditSink};
use crate::derivation::{derive_alert, derive_alert_at};
use crate::error::ServiceError;
use crate::filter::AlertFilter;
use crate::store::{self, Database};
use crate::transition::apply_status;

#[derive(Clone)]
pub struct AlertService {
    db: Database,
    audit: Arc<dyn AuditSink>,
}

impl AlertService {
    pub fn new(db: Database, audit: Arc<dyn AuditSink>) -> Self {
        Self { db, audit }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Persist an event and, if it escalates, its alert.
    ///
    /// Both rows commit together: once this returns, any alert the event
    /// raised is visible to readers.
    #[tracing::instrument(skip_all, fields(source = %new.source, severity = new.severity.label()))]
    pub async fn create_event(&self, new: NewEvent) -> Result<Event, ServiceError> {
        new.validate()?;

        let now = Utc::now();
        let event = Event::from_new(new, now);
        let alert = derive_alert_at(&event, now);

        let mut tx = self.db.begin_write().await?;
        store::insert_event(&mut *tx, &event).await?;
        if let Some(alert) = &alert {
            store::insert_alert(&mut *tx, alert).await?;
        }
        tx.commit().await?;

        self.audit.record(&AuditRecord::EventIngested {
            event_id: event.id,
            severity: event.severity,
        });
        if let Some(alert) = alert {
            self.audit.record(&AuditRecord::AlertRaised {
                alert_id: alert.id,
                event_id: event.id,
            });
        }

        Ok(event)
    }

    /// Re-run derivation for an already stored event.
    ///
    /// # Errors
    /// - `Integrity` if the event does not exist or already has an alert
    /// - `Validation` if the event's severity does not escalate
    #[tracing::instrument(skip(self))]
    pub async fn raise_alert(&self, event_id: EventId) -> Result<Alert, ServiceError> {
        let mut tx = self.db.begin_write().await?;

        let event = store::fetch_event(&mut *tx, event_id)
            .await?
            .ok_or_else(|| ServiceError::Integrity(format!("event {event_id} does not exist")))?;

        let alert = derive_alert(&event).ok_or_else(|| {
            ServiceError::Validation(ValidationError::Invalid {
                field: "severity",
                reason: format!("{} events do not raise alerts", event.severity.label()),
            })
        })?;

        store::insert_alert(&mut *tx, &alert).await?;
        tx.commit().await?;

        self.audit.record(&AuditRecord::AlertRaised {
            alert_id: alert.id,
            event_id: event.id,
        });

        Ok(alert)
    }

    /// Alerts matching every criterion in `filter`, with their events.
    pub async fn list_alerts(&self, filter: &AlertFilter) -> Result<Vec<AlertWithEvent>, ServiceError> {
        store::list_alerts(self.db.pool(), filter).await
    }

    /// # Errors
    /// `NotFound` if no alert has this id.
    pub async fn get_alert(&self, id: AlertId) -> Result<Alert, ServiceError> {
        store::fetch_alert(self.db.pool(), id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("alert {id}")))
    }

    /// Replace an alert's status.
    ///
    /// Concurrent updates to the same alert are last-writer-wins.
    ///
    /// # Errors
    /// `NotFound` if no alert has this id.
    #[tracing::instrument(skip(self))]
    pub async fn update_alert_status(
        &self,
        id: AlertId,
        status: AlertStatus,
    ) -> Result<Alert, ServiceError> {
        let mut tx = self.db.begin_write().await?;

        let mut alert = store::fetch_alert(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("alert {id}")))?;

        let change = apply_status(&mut alert, status);
        store::update_alert_status(&mut *tx, alert.id, alert.status).await?;
        tx.commit().await?;

        self.audit.record(&AuditRecord::AlertStatusChanged(change));

        Ok(alert)
    }
}

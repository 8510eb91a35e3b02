//! SQLite persistence
//!
//! Two tables related 1:1 by a unique foreign key:
//!
//! ```text
//! events(id, source, event_type, severity, description, created_at)
//! alerts(id, event_id UNIQUE → events.id ON DELETE CASCADE, status, created_at)
//! ```
//!
//! The unique constraint on `alerts.event_id` is the sole guard against a
//! second alert for the same event; violations surface as
//! [`ServiceError::Integrity`].
//!
//! Query functions take any executor so callers can run them on the pool or
//! inside a transaction.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Executor, QueryBuilder, Row, Sqlite, Transaction};
use types::alert::{Alert, AlertStatus, AlertWithEvent};
use types::event::{Event, Severity};
use types::ids::{AlertId, EventId};

use crate::error::ServiceError;
use crate::filter::AlertFilter;

const SCHEMA: [&str; 3] = [
    r"
    CREATE TABLE IF NOT EXISTS events (
        id          TEXT PRIMARY KEY NOT NULL,
        source      TEXT NOT NULL,
        event_type  TEXT NOT NULL,
        severity    INTEGER NOT NULL CHECK (severity BETWEEN 1 AND 4),
        description TEXT NOT NULL,
        created_at  TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS alerts (
        id          TEXT PRIMARY KEY NOT NULL,
        event_id    TEXT NOT NULL UNIQUE REFERENCES events(id) ON DELETE CASCADE,
        status      INTEGER NOT NULL DEFAULT 1 CHECK (status BETWEEN 1 AND 3),
        created_at  TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS alerts_status_idx ON alerts(status)",
];

/// Connection pool handle
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `url`.
    ///
    /// An in-memory URL gets a single long-lived connection, since every
    /// SQLite in-memory connection is its own database.
    ///
    /// # Errors
    /// Returns `ServiceError::Storage` if the URL is invalid or the
    /// connection fails.
    pub async fn connect(url: &str) -> Result<Self, ServiceError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options.connect_with(options).await?;
        tracing::debug!(url, "database connected");
        Ok(Self { pool })
    }

    /// Fresh, migrated in-memory database.
    pub async fn in_memory() -> Result<Self, ServiceError> {
        let db = Self::connect("sqlite::memory:").await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Create tables and indexes if they do not exist.
    pub async fn migrate(&self) -> Result<(), ServiceError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a transaction holding the write lock from the outset.
    ///
    /// Read-then-write units must use this: a deferred transaction cannot
    /// upgrade its read lock while another writer is active and fails with
    /// `SQLITE_BUSY` instead of waiting out the busy timeout.
    pub async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>, ServiceError> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }
}

pub async fn insert_event<'e, E>(executor: E, event: &Event) -> Result<(), ServiceError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r"
        INSERT INTO events (id, source, event_type, severity, description, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(event.id.to_string())
    .bind(event.source.as_str())
    .bind(event.event_type.as_str())
    .bind(event.severity.value())
    .bind(event.description.as_str())
    .bind(event.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Persist a derived alert.
///
/// # Errors
/// `ServiceError::Integrity` if the event already has an alert or does not
/// exist.
pub async fn insert_alert<'e, E>(executor: E, alert: &Alert) -> Result<(), ServiceError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r"
        INSERT INTO alerts (id, event_id, status, created_at)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(alert.id.to_string())
    .bind(alert.event_id.to_string())
    .bind(alert.status.value())
    .bind(alert.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn fetch_event<'e, E>(executor: E, id: EventId) -> Result<Option<Event>, ServiceError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r"
        SELECT id AS event_id, source, event_type, severity, description, created_at
        FROM events
        WHERE id = ?
        ",
    )
    .bind(id.to_string())
    .fetch_optional(executor)
    .await?;

    row.map(|row| decode_event(&row)).transpose()
}

pub async fn fetch_alert<'e, E>(executor: E, id: AlertId) -> Result<Option<Alert>, ServiceError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r"
        SELECT id AS alert_id, event_id, status AS alert_status, created_at AS alert_created_at
        FROM alerts
        WHERE id = ?
        ",
    )
    .bind(id.to_string())
    .fetch_optional(executor)
    .await?;

    row.map(|row| decode_alert(&row)).transpose()
}

/// Overwrite an alert's status. Returns the number of rows touched.
pub async fn update_alert_status<'e, E>(
    executor: E,
    id: AlertId,
    status: AlertStatus,
) -> Result<u64, ServiceError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE alerts SET status = ? WHERE id = ?")
        .bind(status.value())
        .bind(id.to_string())
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Alerts matching `filter`, each joined with its event, in insertion order.
pub async fn list_alerts<'e, E>(
    executor: E,
    filter: &AlertFilter,
) -> Result<Vec<AlertWithEvent>, ServiceError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        r"
        SELECT a.id AS alert_id, a.status AS alert_status, a.created_at AS alert_created_at,
               e.id AS event_id, e.source, e.event_type, e.severity, e.description, e.created_at
        FROM alerts a
        JOIN events e ON e.id = a.event_id
        WHERE 1 = 1
        ",
    );
    if let Some(status) = filter.status {
        query.push(" AND a.status = ").push_bind(status.value());
    }
    if let Some(severity) = filter.severity {
        query.push(" AND e.severity = ").push_bind(severity.value());
    }
    query.push(" ORDER BY a.rowid");

    let rows = query.build().fetch_all(executor).await?;

    rows.iter()
        .map(|row| {
            Ok(AlertWithEvent {
                alert: decode_alert(row)?,
                event: decode_event(row)?,
            })
        })
        .collect()
}

fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

fn decode_event(row: &SqliteRow) -> Result<Event, ServiceError> {
    let id: String = row.try_get("event_id")?;
    let severity: i64 = row.try_get("severity")?;

    Ok(Event {
        id: id.parse().map_err(decode_error)?,
        source: row.try_get("source")?,
        event_type: row.try_get("event_type")?,
        severity: Severity::try_from(severity).map_err(decode_error)?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

fn decode_alert(row: &SqliteRow) -> Result<Alert, ServiceError> {
    let id: String = row.try_get("alert_id")?;
    let event_id: String = row.try_get("event_id")?;
    let status: i64 = row.try_get("alert_status")?;

    Ok(Alert {
        id: id.parse().map_err(decode_error)?,
        event_id: event_id.parse().map_err(decode_error)?,
        status: AlertStatus::try_from(status).map_err(decode_error)?,
        created_at: row.try_get("alert_created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use types::event::NewEvent;

    async fn seeded_event(db: &Database, severity: Severity) -> Event {
        let new = NewEvent::new("sensor-7", "intrusion", severity, "breach").unwrap();
        let event = Event::from_new(new, Utc::now());
        insert_event(db.pool(), &event).await.unwrap();
        event
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn test_event_reads_back() {
        let db = Database::in_memory().await.unwrap();
        let event = seeded_event(&db, Severity::Medium).await;

        let fetched = fetch_event(db.pool(), event.id).await.unwrap().unwrap();
        assert_eq!(fetched, event);
        assert!(fetch_event(db.pool(), EventId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_alert_for_event_is_rejected() {
        let db = Database::in_memory().await.unwrap();
        let event = seeded_event(&db, Severity::Critical).await;

        insert_alert(db.pool(), &Alert::open_for(&event, Utc::now()))
            .await
            .unwrap();
        let err = insert_alert(db.pool(), &Alert::open_for(&event, Utc::now()))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Integrity(_)), "got {err:?}");
        let all = list_alerts(db.pool(), &AlertFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_alert_for_missing_event_is_rejected() {
        let db = Database::in_memory().await.unwrap();
        let new = NewEvent::new("ghost", "none", Severity::High, "").unwrap();
        let never_stored = Event::from_new(new, Utc::now());

        let err = insert_alert(db.pool(), &Alert::open_for(&never_stored, Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Integrity(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_deleting_event_cascades_to_alert() {
        let db = Database::in_memory().await.unwrap();
        let event = seeded_event(&db, Severity::High).await;
        let alert = Alert::open_for(&event, Utc::now());
        insert_alert(db.pool(), &alert).await.unwrap();

        sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(event.id.to_string())
            .execute(db.pool())
            .await
            .unwrap();

        assert!(fetch_alert(db.pool(), alert.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_status_touches_one_row() {
        let db = Database::in_memory().await.unwrap();
        let event = seeded_event(&db, Severity::High).await;
        let alert = Alert::open_for(&event, Utc::now());
        insert_alert(db.pool(), &alert).await.unwrap();

        let touched = update_alert_status(db.pool(), alert.id, AlertStatus::Acknowledged)
            .await
            .unwrap();
        assert_eq!(touched, 1);

        let stored = fetch_alert(db.pool(), alert.id).await.unwrap().unwrap();
        assert_eq!(stored.status, AlertStatus::Acknowledged);
        assert_eq!(stored.event_id, event.id);

        let missing = update_alert_status(db.pool(), AlertId::new(), AlertStatus::Open)
            .await
            .unwrap();
        assert_eq!(missing, 0);
    }

    #[tokio::test]
    async fn test_list_filters_and_keeps_insertion_order() {
        let db = Database::in_memory().await.unwrap();
        let mut inserted = Vec::new();
        for severity in [Severity::High, Severity::Critical, Severity::Critical] {
            let event = seeded_event(&db, severity).await;
            let alert = Alert::open_for(&event, Utc::now());
            insert_alert(db.pool(), &alert).await.unwrap();
            inserted.push(alert.id);
        }
        update_alert_status(db.pool(), inserted[2], AlertStatus::Resolved)
            .await
            .unwrap();

        let all = list_alerts(db.pool(), &AlertFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|a| a.alert.id).collect();
        assert_eq!(ids, inserted);

        let filter = AlertFilter::default().with_severity(Severity::Critical);
        let critical = list_alerts(db.pool(), &filter).await.unwrap();
        assert_eq!(critical.len(), 2);
        assert!(critical.iter().all(|a| filter.matches(a)));

        let filter = AlertFilter::default()
            .with_status(AlertStatus::Open)
            .with_severity(Severity::Critical);
        let open_critical = list_alerts(db.pool(), &filter).await.unwrap();
        assert_eq!(open_critical.len(), 1);
        assert_eq!(open_critical[0].alert.id, inserted[1]);
    }

    #[tokio::test]
    async fn test_severity_check_constraint() {
        let db = Database::in_memory().await.unwrap();
        let result = sqlx::query(
            "INSERT INTO events (id, source, event_type, severity, description, created_at)
             VALUES ('x', 's', 't', 9, '', '2024-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await;
        assert!(result.is_err());
    }
}

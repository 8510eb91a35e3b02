//! Alerting core
//!
//! Ingests events, derives alerts from escalating events and manages the
//! alert status lifecycle:
//! - `derivation`: severity ≥ High turns an event into an Open alert
//! - `transition`: status replacement with a before/after record
//! - `filter`: listing criteria over alert status and event severity
//! - `audit`: injected sink for audit records
//! - `store`: SQLite schema and queries
//! - `service`: composes the above into request-scoped operations

pub mod derivation;
pub mod transition;
pub mod filter;
pub mod audit;
pub mod error;
pub mod store;
pub mod service;

pub use error::ServiceError;
pub use service::AlertService;

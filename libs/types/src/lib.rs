//! Types library for the threat monitoring service
//!
//! This library provides the entity and enumeration definitions shared by the
//! alerting core and the HTTP gateway. It performs no I/O.
//!
//! # Modules
//! - `ids`: Unique identifiers (EventId, AlertId)
//! - `event`: Severity scale and the immutable Event record
//! - `alert`: Alert status lifecycle and the derived Alert record
//! - `errors`: Validation error taxonomy

pub mod ids;
pub mod event;
pub mod alert;
pub mod errors;

pub mod alert;
pub mod event;

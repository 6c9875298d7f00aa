//! HTTP Errors.

mod status_error;
pub use status_error::StatusError;

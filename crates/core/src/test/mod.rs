//! Utilities for testing handler methods.

mod request;
pub use client::TestClient;
pub use request::{RequestBuilder, TestExchange};
pub use response::ResponseExt;

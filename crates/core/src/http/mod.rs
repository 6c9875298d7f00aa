//! The HTTP related types used by handler methods and argument resolvers.
//!
//! Only the pieces of the exchange that handler invocation touches live here: the [`Request`]
//! a resolver reads from, the [`Response`] a handler may write to, its [`ResBody`], and
//! [`StatusError`] for failures that carry a status code.

pub mod body;
pub mod errors;
pub mod request;
pub mod response;

pub use body::ResBody;
pub use errors::StatusError;
pub use headers;
pub use http::method::Method;
pub use http::version::Version;
pub use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Uri, header, method, uri};
pub use mime::{self, Mime};
pub use request::Request;
pub use response::Response;

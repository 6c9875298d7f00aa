//! HTTP request.
use std::fmt::{self, Debug, Formatter};
use std::sync::OnceLock;
use std::time::SystemTime;

use headers::{HeaderMapExt, IfModifiedSince};
use http::header::{AsHeaderName, HeaderMap, HeaderValue, IntoHeaderName};
use http::{Method, Uri, Version};
use multimap::MultiMap;

use crate::Error;

/// Represents an HTTP request as seen by argument resolvers and handler methods.
///
/// The body is not part of it: reading and deserializing payloads is left to dedicated
/// resolvers or [`Decoder`](crate::codec::Decoder)s.
///
/// # Examples
///
/// ```
/// use volley_core::http::{Method, Request};
///
/// let req = Request::new();
/// assert_eq!(*req.method(), Method::GET);
/// ```
pub struct Request {
    uri: Uri,
    method: Method,
    version: Version,
    headers: HeaderMap,
    queries: OnceLock<MultiMap<String, String>>,
}

impl Default for Request {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<B> From<http::Request<B>> for Request {
    fn from(req: http::Request<B>) -> Self {
        let (parts, _) = req.into_parts();
        Self {
            uri: parts.uri,
            method: parts.method,
            version: parts.version,
            headers: parts.headers,
            queries: OnceLock::new(),
        }
    }
}

impl Request {
    /// Creates a new blank `Request`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            uri: Uri::default(),
            method: Method::default(),
            version: Version::default(),
            headers: HeaderMap::new(),
            queries: OnceLock::new(),
        }
    }

    /// Returns a reference to the associated URI.
    #[inline]
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }
    /// Sets the URI. Cached queries are discarded.
    #[inline]
    pub fn set_uri(&mut self, uri: Uri) {
        self.uri = uri;
        self.queries = OnceLock::new();
    }

    /// Returns a reference to the associated HTTP method.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }
    /// Returns a mutable reference to the associated HTTP method.
    #[inline]
    pub fn method_mut(&mut self) -> &mut Method {
        &mut self.method
    }

    /// Returns the associated version.
    #[inline]
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }
    /// Returns a mutable reference to the associated version.
    #[inline]
    pub fn version_mut(&mut self) -> &mut Version {
        &mut self.version
    }

    /// Returns a reference to the associated header field map.
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
    /// Returns a mutable reference to the associated header field map.
    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Get the first value of header `key` as `&str`, `None` when it is missing or not visible
    /// ASCII.
    #[inline]
    pub fn header<K: AsHeaderName>(&self, key: K) -> Option<&str> {
        self.headers.get(key).and_then(|v| v.to_str().ok())
    }

    /// Modify a header for this request.
    ///
    /// When `overwrite` is set to `true`, If the header is already present, the value will be replaced.
    /// When `overwrite` is set to `false`, The new header is always appended to the request, even if the header already exists.
    pub fn add_header<N, V>(&mut self, name: N, value: V, overwrite: bool) -> crate::Result<&mut Self>
    where
        N: IntoHeaderName,
        V: TryInto<HeaderValue>,
    {
        let value = value
            .try_into()
            .map_err(|_| Error::InvalidHeader("invalid header value".to_owned()))?;
        if overwrite {
            self.headers.insert(name, value);
        } else {
            self.headers.append(name, value);
        }
        Ok(self)
    }

    /// Get the parsed query string, parsed on first access.
    pub fn queries(&self) -> &MultiMap<String, String> {
        self.queries.get_or_init(|| {
            form_urlencoded::parse(self.uri.query().unwrap_or_default().as_bytes())
                .into_owned()
                .collect()
        })
    }

    /// Get the first query value for `key`.
    #[inline]
    pub fn query(&self, key: &str) -> Option<&str> {
        self.queries().get(key).map(String::as_str)
    }

    /// Value of the `If-Modified-Since` header, if present and well formed.
    #[inline]
    #[must_use]
    pub fn if_modified_since(&self) -> Option<IfModifiedSince> {
        self.headers.typed_get::<IfModifiedSince>()
    }

    /// Whether the resource, last modified at `last_modified`, should be considered unchanged
    /// for this request.
    ///
    /// Only `GET` and `HEAD` requests carrying an `If-Modified-Since` header can be unchanged.
    #[must_use]
    pub fn is_unmodified_since(&self, last_modified: SystemTime) -> bool {
        if !matches!(self.method, Method::GET | Method::HEAD) {
            return false;
        }
        self.if_modified_since()
            .is_some_and(|since| !since.is_modified(last_modified))
    }
}

impl Debug for Request {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", self.method())
            .field("uri", self.uri())
            .field("version", &self.version())
            .field("headers", self.headers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::http::header::IF_MODIFIED_SINCE;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_query() {
        let mut req = Request::new();
        req.set_uri("http://localhost/path?q=rust&q=go&lang=en%20NZ".parse().unwrap());
        assert_eq!(req.query("q"), Some("rust"));
        assert_eq!(req.queries().get_vec("q").map(Vec::len), Some(2));
        assert_eq!(req.query("lang"), Some("en NZ"));
        assert_eq!(req.query("missing"), None);

        req.set_uri("http://localhost/other".parse().unwrap());
        assert_eq!(req.query("q"), None);
    }

    #[test]
    fn test_add_header() {
        let mut req = Request::new();
        req.add_header("x-token", "a", true).unwrap();
        req.add_header("x-token", "b", false).unwrap();
        assert_eq!(req.header("x-token"), Some("a"));
        assert_eq!(req.headers().get_all("x-token").iter().count(), 2);
        assert!(req.add_header("x-token", "bad\nvalue", true).is_err());
    }

    #[test]
    fn test_unmodified_since() {
        let mut req = Request::new();
        assert!(!req.is_unmodified_since(at(1000)));

        req.headers_mut()
            .typed_insert(IfModifiedSince::from(at(10_000)));
        assert!(req.headers().contains_key(IF_MODIFIED_SINCE));
        assert!(req.is_unmodified_since(at(1000)));
        assert!(!req.is_unmodified_since(at(20_000)));

        *req.method_mut() = Method::POST;
        assert!(!req.is_unmodified_since(at(1000)));
    }
}

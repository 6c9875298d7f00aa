//! HTTP response.
use std::collections::VecDeque;
use std::fmt::{self, Debug, Formatter};
use std::pin::pin;
use std::time::SystemTime;

use bytes::Bytes;
use futures_util::stream::{Stream, StreamExt};
use headers::{HeaderMapExt, LastModified};
use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue, IntoHeaderName};
use http::Version;
use mime::Mime;

use crate::http::{Request, ResBody, StatusCode};
use crate::{BoxedError, Error};

/// Represents an HTTP response.
///
/// Handler methods that fully handle the exchange write to it directly; everything else is
/// left to the dispatch layer.
#[non_exhaustive]
pub struct Response {
    /// The HTTP status code.
    pub status_code: Option<StatusCode>,
    /// The HTTP headers.
    pub headers: HeaderMap,
    /// The HTTP version.
    pub version: Version,
    /// The HTTP body.
    pub body: ResBody,
}

impl Default for Response {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Creates a new blank `Response`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            status_code: None,
            headers: HeaderMap::new(),
            version: Version::default(),
            body: ResBody::None,
        }
    }

    /// Get headers reference.
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
    /// Get mutable headers reference.
    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Modify a header for this response.
    ///
    /// When `overwrite` is set to `true`, If the header is already present, the value will be replaced.
    /// When `overwrite` is set to `false`, The new header is always appended to the response, even if the header already exists.
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

    /// Get content type.
    #[inline]
    #[must_use]
    pub fn content_type(&self) -> Option<Mime> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.parse().ok())
    }

    /// Sets status code and returns `&mut Self`.
    #[inline]
    pub fn status_code(&mut self, code: StatusCode) -> &mut Self {
        self.status_code = Some(code);
        self
    }

    /// Get mutable body reference.
    #[inline]
    pub fn body_mut(&mut self) -> &mut ResBody {
        &mut self.body
    }
    /// Sets body.
    #[inline]
    pub fn body(&mut self, body: impl Into<ResBody>) -> &mut Self {
        self.body = body.into();
        self
    }
    /// Sets body to a new value and returns old value.
    #[inline]
    pub fn replace_body(&mut self, body: ResBody) -> ResBody {
        std::mem::replace(&mut self.body, body)
    }
    /// Take body from response.
    #[inline]
    pub fn take_body(&mut self) -> ResBody {
        self.replace_body(ResBody::None)
    }

    /// Write bytes data to body. If body is none, a new `ResBody` will created.
    pub fn write_body(&mut self, data: impl Into<Bytes>) -> crate::Result<()> {
        match self.body_mut() {
            ResBody::None => {
                self.body = ResBody::Once(data.into());
            }
            ResBody::Once(bytes) => {
                let chunks = VecDeque::from([std::mem::take(bytes), data.into()]);
                self.body = ResBody::Chunks(chunks);
            }
            ResBody::Chunks(chunks) => {
                chunks.push_back(data.into());
            }
            ResBody::Stream(_) => {
                tracing::error!("current body's kind is `ResBody::Stream`, it is not allowed to write bytes");
                return Err(Error::other(
                    "current body's kind is `ResBody::Stream`, it is not allowed to write bytes",
                ));
            }
        }
        Ok(())
    }

    /// Drain `stream` into the body. The returned future completes once every chunk has been
    /// written, or fails with the first error of the stream.
    pub async fn write_with<S, B, E>(&mut self, stream: S) -> crate::Result<()>
    where
        S: Stream<Item = Result<B, E>>,
        B: Into<Bytes>,
        E: Into<BoxedError>,
    {
        let mut stream = pin!(stream);
        while let Some(chunk) = stream.next().await {
            self.write_body(chunk.map_err(|e| Error::Other(e.into()))?)?;
        }
        Ok(())
    }

    /// Set response's body to stream.
    #[inline]
    pub fn stream<S, O, E>(&mut self, stream: S)
    where
        S: Stream<Item = Result<O, E>> + Send + 'static,
        O: Into<Bytes> + 'static,
        E: Into<BoxedError> + 'static,
    {
        self.body = ResBody::stream(stream);
    }

    /// Conditional request check against the resource's last modification time.
    ///
    /// Sets `Last-Modified` for `GET`/`HEAD` requests. Returns `true`, after switching the status
    /// to `304 Not Modified`, when the request's `If-Modified-Since` shows the client copy is
    /// current; the handler should then write nothing else.
    pub fn check_not_modified(&mut self, req: &Request, last_modified: SystemTime) -> bool {
        if self.is_not_modified() {
            return true;
        }
        if matches!(*req.method(), http::Method::GET | http::Method::HEAD) {
            self.headers.typed_insert(LastModified::from(last_modified));
        }
        let unmodified = req.is_unmodified_since(last_modified);
        if unmodified {
            self.status_code = Some(StatusCode::NOT_MODIFIED);
        }
        unmodified
    }

    /// Returns `true` when the response has been marked `304 Not Modified`.
    #[inline]
    #[must_use]
    pub fn is_not_modified(&self) -> bool {
        self.status_code == Some(StatusCode::NOT_MODIFIED)
    }
}

impl Debug for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status_code", &self.status_code)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Error as IoError, ErrorKind};
    use std::time::Duration;

    use futures_util::stream::iter;
    use headers::IfModifiedSince;

    use super::*;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_write_body() {
        let mut res = Response::new();
        res.write_body("hello").unwrap();
        assert!(res.body.is_once());
        res.write_body(" world").unwrap();
        assert!(res.body.is_chunks());
        assert_eq!(res.body.size(), Some(11));

        res.stream(iter(vec![Ok::<_, BoxedError>(Bytes::from("x"))]));
        assert!(res.write_body("y").is_err());
    }

    #[tokio::test]
    async fn test_write_with() {
        let mut res = Response::new();
        res.write_with(iter(vec![Ok::<_, IoError>("ab"), Ok("cd")]))
            .await
            .unwrap();
        assert_eq!(res.body.size(), Some(4));

        let failing = iter(vec![
            Ok("ef"),
            Err(IoError::new(ErrorKind::BrokenPipe, "gone")),
            Ok("never"),
        ]);
        let err = res.write_with(failing).await.unwrap_err();
        assert!(matches!(err, Error::Other(_)));
        assert_eq!(err.to_string(), "gone");
        assert_eq!(res.body.size(), Some(6));
    }

    #[test]
    fn test_check_not_modified() {
        let mut req = Request::new();
        req.headers_mut().typed_insert(IfModifiedSince::from(at(10_000)));

        let mut res = Response::new();
        assert!(res.check_not_modified(&req, at(1000)));
        assert!(res.is_not_modified());
        assert!(res.headers().typed_get::<LastModified>().is_some());

        let mut res = Response::new();
        assert!(!res.check_not_modified(&req, at(20_000)));
        assert_eq!(res.status_code, None);
    }

    #[test]
    fn test_content_type() {
        let mut res = Response::new();
        assert_eq!(None, res.content_type());
        res.add_header(CONTENT_TYPE, "text/plain", true).unwrap();
        assert_eq!(Some(mime::TEXT_PLAIN), res.content_type());
    }
}

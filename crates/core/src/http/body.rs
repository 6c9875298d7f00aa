//! Response body.

use std::collections::VecDeque;
use std::fmt::{self, Debug, Formatter};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::{BoxStream, Stream, StreamExt};

use crate::BoxedError;

/// Response body type.
#[non_exhaustive]
#[derive(Default)]
pub enum ResBody {
    /// None body.
    #[default]
    None,
    /// Once bytes body.
    Once(Bytes),
    /// Chunks body.
    Chunks(VecDeque<Bytes>),
    /// Stream body.
    Stream(BoxStream<'static, Result<Bytes, BoxedError>>),
}

impl ResBody {
    /// Create a stream body from a stream of byte chunks.
    pub fn stream<S, O, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<O, E>> + Send + 'static,
        O: Into<Bytes> + 'static,
        E: Into<BoxedError> + 'static,
    {
        Self::Stream(stream.map(|item| item.map(Into::into).map_err(Into::into)).boxed())
    }

    /// Check is that body is not set.
    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(*self, Self::None)
    }
    /// Check is that body is once.
    #[inline]
    #[must_use]
    pub fn is_once(&self) -> bool {
        matches!(*self, Self::Once(_))
    }
    /// Check is that body is chunks.
    #[inline]
    #[must_use]
    pub fn is_chunks(&self) -> bool {
        matches!(*self, Self::Chunks(_))
    }
    /// Check is that body is stream.
    #[inline]
    #[must_use]
    pub fn is_stream(&self) -> bool {
        matches!(*self, Self::Stream(_))
    }

    /// Get body's size, `None` for streams.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        match self {
            Self::None => Some(0),
            Self::Once(bytes) => Some(bytes.len() as u64),
            Self::Chunks(chunks) => Some(chunks.iter().map(|bytes| bytes.len() as u64).sum()),
            Self::Stream(_) => None,
        }
    }
}

impl Stream for ResBody {
    type Item = Result<Bytes, BoxedError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.get_mut() {
            Self::None => Poll::Ready(None),
            Self::Once(bytes) => {
                if bytes.is_empty() {
                    Poll::Ready(None)
                } else {
                    Poll::Ready(Some(Ok(std::mem::take(bytes))))
                }
            }
            Self::Chunks(chunks) => Poll::Ready(chunks.pop_front().map(Ok)),
            Self::Stream(stream) => stream.as_mut().poll_next(cx),
        }
    }
}

impl From<Bytes> for ResBody {
    #[inline]
    fn from(value: Bytes) -> Self {
        Self::Once(value)
    }
}
impl From<Vec<u8>> for ResBody {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self::Once(value.into())
    }
}
impl From<String> for ResBody {
    #[inline]
    fn from(value: String) -> Self {
        Self::Once(value.into())
    }
}
impl From<&'static str> for ResBody {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::Once(value.into())
    }
}

impl Debug for ResBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("ResBody::None"),
            Self::Once(bytes) => f.debug_tuple("ResBody::Once").field(bytes).finish(),
            Self::Chunks(chunks) => f.debug_tuple("ResBody::Chunks").field(chunks).finish(),
            Self::Stream(_) => f.write_str("ResBody::Stream(..)"),
        }
    }
}

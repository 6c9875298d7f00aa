//! Decoding of request payloads from streams of byte chunks.
mod byte_array;
mod error;

pub use byte_array::{ByteArrayDecoder, DEFAULT_MAX_IN_MEMORY_SIZE};
pub use error::CodecError;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use mime::Mime;

use crate::BoxedError;
use crate::method::TypeDescriptor;

/// Stream of raw payload chunks.
pub type ByteStream = BoxStream<'static, Result<Bytes, BoxedError>>;

/// Turns a stream of byte chunks into typed values.
pub trait Decoder: Send + Sync {
    /// Type of the decoded values.
    type Output: Send + 'static;

    /// Whether values of type `ty` can be decoded from payloads of type `mime`.
    fn can_decode(&self, ty: &TypeDescriptor, mime: Option<&Mime>) -> bool;

    /// Decode `input` into a stream of values.
    ///
    /// A failure of `input` is yielded after the values decoded before it.
    fn decode(&self, input: ByteStream) -> BoxStream<'static, Result<Self::Output, CodecError>>;

    /// Decode the whole of `input` into a single value.
    fn decode_to_single(&self, input: ByteStream) -> BoxFuture<'static, Result<Self::Output, CodecError>>;
}

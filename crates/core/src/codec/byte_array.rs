use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{BoxStream, StreamExt};
use mime::Mime;

use super::{ByteStream, CodecError, Decoder};
use crate::method::TypeDescriptor;

/// Default limit on the bytes buffered by [`ByteArrayDecoder::decode_to_single`].
pub const DEFAULT_MAX_IN_MEMORY_SIZE: usize = 256 * 1024;

/// Decodes payloads of any media type into `Vec<u8>`.
#[derive(Clone, Copy, Debug)]
pub struct ByteArrayDecoder {
    max_in_memory_size: Option<usize>,
}

impl Default for ByteArrayDecoder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ByteArrayDecoder {
    /// Create a decoder buffering at most 256 KiB.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_in_memory_size: Some(DEFAULT_MAX_IN_MEMORY_SIZE),
        }
    }

    /// Sets the limit on bytes buffered when aggregating and returns `Self`. `None` means
    /// unlimited.
    #[inline]
    #[must_use]
    pub fn max_in_memory_size(mut self, size: Option<usize>) -> Self {
        self.max_in_memory_size = size;
        self
    }

    /// Get the limit on bytes buffered when aggregating.
    #[inline]
    #[must_use]
    pub fn get_max_in_memory_size(&self) -> Option<usize> {
        self.max_in_memory_size
    }
}

impl Decoder for ByteArrayDecoder {
    type Output = Vec<u8>;

    fn can_decode(&self, ty: &TypeDescriptor, _mime: Option<&Mime>) -> bool {
        ty.is::<Vec<u8>>()
    }

    fn decode(&self, input: ByteStream) -> BoxStream<'static, Result<Vec<u8>, CodecError>> {
        input
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(CodecError::Source))
            .boxed()
    }

    fn decode_to_single(&self, mut input: ByteStream) -> BoxFuture<'static, Result<Vec<u8>, CodecError>> {
        let limit = self.max_in_memory_size;
        async move {
            let mut buf = Vec::new();
            while let Some(chunk) = input.next().await {
                let chunk = chunk.map_err(CodecError::Source)?;
                if let Some(limit) = limit {
                    if buf.len() + chunk.len() > limit {
                        tracing::debug!(limit, "payload exceeds the in-memory limit");
                        return Err(CodecError::BufferLimit(limit));
                    }
                }
                buf.extend_from_slice(&chunk);
            }
            Ok(buf)
        }
        .boxed()
    }
}

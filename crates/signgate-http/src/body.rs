//! Response body types supporting buffered, streaming and empty modes.
//!
//! - **Buffered**: plain-text error bodies.
//! - **Streaming**: object bodies, passed through chunk by chunk from the
//!   object store.
//! - **Empty**: responses with no content.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use http_body::{Body, Frame, SizeHint};
use http_body_util::Full;
use signgate_core::store::ByteStream;

/// Gateway response body.
///
/// Implements [`Body`] so it can be used directly with hyper responses.
#[derive(Default)]
pub enum GateResponseBody {
    /// Buffered body for small responses such as error messages.
    Buffered(Full<Bytes>),
    /// Object body streamed from the store.
    Streaming(ByteStream),
    /// No body.
    #[default]
    Empty,
}

impl fmt::Debug for GateResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered(full) => f.debug_tuple("Buffered").field(full).finish(),
            Self::Streaming(_) => f.write_str("Streaming(..)"),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

impl GateResponseBody {
    /// Create a buffered body from bytes.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Buffered(Full::new(data.into()))
    }

    /// Create a buffered body from a UTF-8 string.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self::Buffered(Full::new(Bytes::from(s.into())))
    }

    /// Create a streaming body.
    #[must_use]
    pub fn from_stream(stream: ByteStream) -> Self {
        Self::Streaming(stream)
    }

    /// Create an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }
}

impl Body for GateResponseBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Buffered(full) => Pin::new(full)
                .poll_frame(cx)
                .map_err(|never| match never {}),
            Self::Streaming(stream) => stream
                .as_mut()
                .poll_next(cx)
                .map(|chunk| chunk.map(|result| result.map(Frame::data))),
            Self::Empty => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Buffered(full) => full.is_end_stream(),
            Self::Streaming(_) => false,
            Self::Empty => true,
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            Self::Buffered(full) => full.size_hint(),
            Self::Streaming(_) => SizeHint::default(),
            Self::Empty => SizeHint::with_exact(0),
        }
    }
}

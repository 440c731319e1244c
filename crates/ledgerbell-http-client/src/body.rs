use bytes::Bytes;
use http_body::Frame;
use std::{
    fmt::{self, Debug},
    pin::Pin,
    task::{self, Poll},
};
use tower::BoxError;

/// Single-chunk request body
///
/// Every request this client sends is either empty or a small buffered
/// payload, so the body is a plain `Option<Bytes>` rather than a stream.
pub struct Body {
    data: Option<Bytes>,
}

impl Body {
    /// Empty body
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self { data: None }
    }

    /// Single byte chunk body
    #[inline]
    pub fn data<D>(data: D) -> Self
    where
        D: Into<Bytes>,
    {
        Self {
            data: Some(data.into()),
        }
    }
}

impl Default for Body {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl Debug for Body {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .finish_non_exhaustive()
    }
}

impl From<Bytes> for Body {
    #[inline]
    fn from(value: Bytes) -> Self {
        Self::data(value)
    }
}

impl From<String> for Body {
    #[inline]
    fn from(value: String) -> Self {
        Self::data(value)
    }
}

impl From<Vec<u8>> for Body {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self::data(value)
    }
}

impl http_body::Body for Body {
    type Data = Bytes;
    type Error = BoxError;

    #[inline]
    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut task::Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.get_mut().data.take().map(|data| Ok(Frame::data(data))))
    }

    #[inline]
    fn is_end_stream(&self) -> bool {
        self.data.is_none()
    }

    #[inline]
    fn size_hint(&self) -> http_body::SizeHint {
        self.data.as_ref().map_or_else(http_body::SizeHint::new, |data| {
            http_body::SizeHint::with_exact(data.len() as u64)
        })
    }
}

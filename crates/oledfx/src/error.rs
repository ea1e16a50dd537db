#![forbid(unsafe_code)]

//! Display engine errors.

use std::fmt;

use oledfx_render::BufferError;
use oledfx_text::ScrollLogError;

/// Errors raised by [`Display`](crate::Display), generic over the
/// transport's error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayError<E> {
    /// The transport refused to connect.
    Connect(E),
    /// A command or frame could not be sent.
    Transport(E),
    /// A framebuffer could not be created.
    Buffer(BufferError),
    /// The scroll log could not be created.
    Log(ScrollLogError),
    /// Buffers have not been allocated, or were released by `end`.
    NotAllocated,
}

impl<E: fmt::Display> fmt::Display for DisplayError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect(err) => write!(f, "transport connect failed: {err}"),
            Self::Transport(err) => write!(f, "transport error: {err}"),
            Self::Buffer(err) => write!(f, "{err}"),
            Self::Log(err) => write!(f, "{err}"),
            Self::NotAllocated => write!(f, "display buffers are not allocated"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for DisplayError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect(err) | Self::Transport(err) => Some(err),
            Self::Buffer(err) => Some(err),
            Self::Log(err) => Some(err),
            Self::NotAllocated => None,
        }
    }
}

impl<E> From<BufferError> for DisplayError<E> {
    fn from(err: BufferError) -> Self {
        Self::Buffer(err)
    }
}

impl<E> From<ScrollLogError> for DisplayError<E> {
    fn from(err: ScrollLogError) -> Self {
        Self::Log(err)
    }
}

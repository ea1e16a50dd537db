#![forbid(unsafe_code)]

//! Buffer allocation errors.

use std::fmt;

/// Errors raised while creating a [`FrameBuffer`](crate::FrameBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// The allocator could not provide `bytes` bytes.
    Alloc { bytes: usize },
    /// Zero-sized display, or a height that is not a whole number of pages.
    InvalidGeometry { width: u16, height: u16 },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc { bytes } => write!(f, "failed to allocate {bytes} bytes for frame buffer"),
            Self::InvalidGeometry { width, height } => write!(
                f,
                "invalid display geometry {width}x{height} (height must be a non-zero multiple of 8)"
            ),
        }
    }
}

impl std::error::Error for BufferError {}

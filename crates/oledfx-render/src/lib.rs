#![forbid(unsafe_code)]

//! Render kernel: packed framebuffer, shape drawing, column blits, and the
//! transport capability the display engine pushes frames through.

pub mod bitmap;
pub mod blit;
pub mod drawing;
pub mod error;
pub mod framebuffer;
pub mod transport;

pub use bitmap::BitOrder;
pub use blit::raster_height;
pub use drawing::{Draw, Quadrants};
pub use error::BufferError;
pub use framebuffer::{Color, FrameBuffer};
pub use transport::{Headless, HeadlessError, Transport};

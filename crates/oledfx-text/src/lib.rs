#![forbid(unsafe_code)]

//! Text rendering for oledfx.
//!
//! Fonts are read-only blobs validated once into a [`Font`]. Input bytes go
//! through a [`GlyphMapper`] to become font codes, the [`Typesetter`] lays
//! them out (alignment, explicit line breaks, word wrap), and glyphs are
//! composited with the render crate's column blit. [`ScrollLog`] keeps a
//! bounded terminal-style history that re-renders through the same path.

pub mod error;
pub mod font;
pub mod layout;
pub mod lines;
pub mod mapper;
pub mod scroll_log;

pub use error::{FontError, ScrollLogError};
#[cfg(any(test, feature = "test-helpers"))]
pub use font::FontBuilder;
pub use font::{Font, Glyph};
pub use layout::{TextAlignment, Typesetter, WrappedLine};
pub use lines::{Lines, lines};
pub use mapper::{GlyphMapper, Latin1Folding, Passthrough};
pub use scroll_log::ScrollLog;

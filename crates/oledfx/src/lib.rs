#![forbid(unsafe_code)]

//! oledfx public facade crate.
//!
//! Re-exports the render kernel and text engine, and provides the
//! [`Display`] engine that ties a [`Transport`] to a framebuffer, a font,
//! and a scroll log.

pub mod commands;
pub mod config;
pub mod display;
pub mod error;

pub use config::{DisplayConfig, Geometry};
pub use display::Display;
pub use error::DisplayError;

// --- Core re-exports -------------------------------------------------------

pub use oledfx_core::geometry::{Point, Rect, Size};

// --- Render re-exports -----------------------------------------------------

pub use oledfx_render::{
    BitOrder, BufferError, Color, Draw, FrameBuffer, Headless, HeadlessError, Quadrants,
    Transport, raster_height,
};

// --- Text re-exports -------------------------------------------------------

pub use oledfx_text::{
    Font, FontError, Glyph, GlyphMapper, Latin1Folding, Passthrough, ScrollLog, ScrollLogError,
    TextAlignment, Typesetter, WrappedLine,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Color, Display, DisplayConfig, DisplayError, Draw, Font, FrameBuffer, Geometry, Point,
        TextAlignment, Transport,
    };

    pub use crate::{core, render, text};
}

pub use oledfx_core as core;
pub use oledfx_render as render;
pub use oledfx_text as text;

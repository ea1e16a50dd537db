#![forbid(unsafe_code)]

//! Display configuration.
//!
//! A [`DisplayConfig`] names the panel geometry and whether a shadow buffer
//! is kept for transports that diff frames.
//!
//! # Usage
//!
//! ```
//! use oledfx::config::{DisplayConfig, Geometry};
//!
//! let config = DisplayConfig::new(Geometry::W128H32).double_buffer(false);
//! assert_eq!(config.geometry().size().height, 32);
//! assert!(!config.is_double_buffered());
//! ```

use oledfx_core::geometry::Size;

/// Panel geometries supported by the controller family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Geometry {
    #[default]
    W128H64,
    W128H32,
    W64H48,
    W64H32,
    /// Arbitrary size. No controller init sequence is sent; zero dimensions
    /// fall back to 128x64.
    Raw { width: u16, height: u16 },
}

impl Geometry {
    /// Panel size in pixels.
    pub const fn size(self) -> Size {
        match self {
            Self::W128H64 => Size::new(128, 64),
            Self::W128H32 => Size::new(128, 32),
            Self::W64H48 => Size::new(64, 48),
            Self::W64H32 => Size::new(64, 32),
            Self::Raw { width, height } => Size::new(
                if width > 0 { width } else { 128 },
                if height > 0 { height } else { 64 },
            ),
        }
    }

    #[inline]
    pub const fn is_raw(self) -> bool {
        matches!(self, Self::Raw { .. })
    }
}

/// Configuration for a [`Display`](crate::Display).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    geometry: Geometry,
    double_buffer: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            double_buffer: true,
        }
    }
}

impl DisplayConfig {
    /// Configuration for `geometry` with double buffering enabled.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    /// Keep (or skip) a shadow copy of the last presented frame.
    #[must_use]
    pub fn double_buffer(mut self, enabled: bool) -> Self {
        self.double_buffer = enabled;
        self
    }

    #[inline]
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub const fn is_double_buffered(&self) -> bool {
        self.double_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_sizes() {
        assert_eq!(Geometry::W128H64.size(), Size::new(128, 64));
        assert_eq!(Geometry::W128H32.size(), Size::new(128, 32));
        assert_eq!(Geometry::W64H48.size(), Size::new(64, 48));
        assert_eq!(Geometry::W64H32.size(), Size::new(64, 32));
    }

    #[test]
    fn raw_zero_dimensions_fall_back() {
        let g = Geometry::Raw {
            width: 0,
            height: 16,
        };
        assert_eq!(g.size(), Size::new(128, 16));
        let g = Geometry::Raw {
            width: 96,
            height: 0,
        };
        assert_eq!(g.size(), Size::new(96, 64));
        assert!(g.is_raw());
        assert!(!Geometry::W64H48.is_raw());
    }

    #[test]
    fn default_is_double_buffered_128x64() {
        let config = DisplayConfig::default();
        assert_eq!(config.geometry(), Geometry::W128H64);
        assert!(config.is_double_buffered());
        assert_eq!(config, DisplayConfig::new(Geometry::W128H64));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_and_defaults() {
        let config = DisplayConfig::new(Geometry::Raw {
            width: 72,
            height: 40,
        })
        .double_buffer(false);
        let json = serde_json::to_string(&config).unwrap();
        let back: DisplayConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let partial: DisplayConfig = serde_json::from_str(r#"{"geometry":"w64_h32"}"#).unwrap();
        assert_eq!(partial.geometry(), Geometry::W64H32);
        assert!(partial.is_double_buffered());
    }
}

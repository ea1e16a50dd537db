#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Drawing coordinates are signed: shapes may start or extend off-screen and
//! are clipped by the framebuffer. Display dimensions are unsigned.

/// A pixel position. Origin is the top-left corner of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Display dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Number of 8-pixel pages (byte rows), rounding up.
    #[inline]
    pub const fn pages(&self) -> u16 {
        self.height.div_ceil(8)
    }

    /// Bytes needed for a packed 1-bit-per-pixel image of this size.
    #[inline]
    pub const fn packed_len(&self) -> usize {
        self.width as usize * self.pages() as usize
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rectangle in signed pixel coordinates.
///
/// Width and height are signed so that callers can describe shapes that
/// start off-screen; a rectangle with a non-positive dimension is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin covering `size`.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width as i32, size.height as i32)
    }

    /// Right edge (exclusive), saturated to the `i32` range.
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive), saturated to the `i32` range.
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    ///
    /// Edges are compared in `i64`, so a rectangle reaching past `i32::MAX`
    /// still contains the points it covers.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        let (left, top) = (self.x as i64, self.y as i64);
        x >= left
            && x < left + self.width as i64
            && y >= top
            && y < top + self.height as i64
    }
}

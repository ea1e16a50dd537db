#![forbid(unsafe_code)]

//! Packed monochrome framebuffer.
//!
//! The [`FrameBuffer`] owns the pixel storage that a display transport later
//! pushes to the controller. It provides pixel access and the horizontal and
//! vertical span fills every shape algorithm is built on.
//!
//! # Layout
//!
//! Pixels are packed eight to a byte in vertical strips called pages:
//! pixel `(x, y)` is bit `y & 7` of byte `x + (y / 8) * width`. This is the
//! native memory layout of SSD1306-class controllers in horizontal
//! addressing mode, so the pixel region can be sent as-is.
//!
//! Transports that need a command prefix in front of every data frame get it
//! reserved up front: the storage is `header_len + width * height / 8` bytes,
//! and only [`FrameBuffer::frame`] exposes the header. Everything else sees
//! the pixel region.
//!
//! # Invariants
//!
//! 1. `width > 0`, `height > 0`, `height % 8 == 0`
//! 2. `storage.len() == header_len + width * height / 8`
//! 3. Dimensions never change after creation
//! 4. Public writes never index outside the pixel region; coordinates outside
//!    `[0, width) x [0, height)` are dropped

use crate::error::BufferError;
use oledfx_core::geometry::{Rect, Size};

/// How a drawing operation combines with existing pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// Clear bits (AND-out).
    Black,
    /// Set bits (OR-in).
    #[default]
    White,
    /// Flip bits (XOR).
    Inverse,
}

impl Color {
    /// Combine `mask` into `byte`.
    #[inline]
    pub fn apply(self, byte: &mut u8, mask: u8) {
        match self {
            Self::White => *byte |= mask,
            Self::Black => *byte &= !mask,
            Self::Inverse => *byte ^= mask,
        }
    }

    /// The opposite operation; `Inverse` is its own opposite.
    #[inline]
    #[must_use]
    pub const fn inverted(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
            Self::Inverse => Self::Inverse,
        }
    }
}

/// A packed 1-bit-per-pixel image sized to a display.
///
/// # Example
///
/// ```
/// use oledfx_render::framebuffer::{Color, FrameBuffer};
///
/// let mut fb = FrameBuffer::new(128, 64).unwrap();
/// fb.set_pixel(3, 10);
/// assert!(fb.pixel(3, 10));
/// assert_eq!(fb.pixels()[3 + 128], 0b0000_0100);
///
/// fb.set_color(Color::Inverse);
/// fb.set_pixel(3, 10);
/// assert!(!fb.pixel(3, 10));
/// ```
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    header_len: usize,
    storage: Vec<u8>,
    color: Color,
    yield_hook: Option<fn()>,
}

impl FrameBuffer {
    /// Create a zeroed framebuffer with no header.
    pub fn new(width: u16, height: u16) -> Result<Self, BufferError> {
        Self::with_header(width, height, 0)
    }

    /// Create a zeroed framebuffer with `header_len` bytes reserved in front
    /// of the pixel data.
    ///
    /// Allocation is fallible: on an exhausted heap this returns
    /// [`BufferError::Alloc`] instead of aborting.
    pub fn with_header(width: u16, height: u16, header_len: usize) -> Result<Self, BufferError> {
        if width == 0 || height == 0 || height % 8 != 0 {
            return Err(BufferError::InvalidGeometry { width, height });
        }

        let bytes = header_len + Size::new(width, height).packed_len();
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(bytes)
            .map_err(|_| BufferError::Alloc { bytes })?;
        storage.resize(bytes, 0);

        Ok(Self {
            width,
            height,
            header_len,
            storage,
            color: Color::White,
            yield_hook: None,
        })
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Bounding rect of the whole display.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Number of pixel bytes (excluding the header).
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len() - self.header_len
    }

    /// Always false for a valid buffer.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes reserved in front of the pixel data.
    #[inline]
    pub const fn header_len(&self) -> usize {
        self.header_len
    }

    /// The packed pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.storage[self.header_len..]
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.storage[self.header_len..]
    }

    /// Header followed by pixel data, ready to hand to a transport.
    #[inline]
    pub fn frame(&self) -> &[u8] {
        &self.storage
    }

    #[inline]
    pub fn frame_mut(&mut self) -> &mut [u8] {
        &mut self.storage
    }

    /// The reserved header region.
    #[inline]
    pub fn header_mut(&mut self) -> &mut [u8] {
        &mut self.storage[..self.header_len]
    }

    /// Current drawing color used by every operation that does not take one.
    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Install a hook that column blits call after every composited byte.
    ///
    /// Platforms with a cooperative scheduler use this to yield during long
    /// image draws. It has no effect on the rendered result.
    pub fn set_yield_hook(&mut self, hook: Option<fn()>) {
        self.yield_hook = hook;
    }

    #[inline]
    pub(crate) fn cooperative_yield(&self) {
        if let Some(hook) = self.yield_hook {
            hook();
        }
    }

    /// Byte index and bit mask for `(x, y)`, or `None` outside the display.
    #[inline]
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        let index = x as usize + (y as usize / 8) * self.width as usize;
        Some((index, 1 << (y & 7)))
    }

    /// Apply `mask` to pixel byte `index` with `color`.
    ///
    /// `index` must be inside the pixel region.
    #[inline]
    pub(crate) fn apply(&mut self, index: usize, mask: u8, color: Color) {
        let offset = self.header_len;
        color.apply(&mut self.storage[offset + index], mask);
    }

    /// Draw a pixel with the current color.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32) {
        self.set_pixel_color(x, y, self.color);
    }

    /// Draw a pixel with an explicit color.
    #[inline]
    pub fn set_pixel_color(&mut self, x: i32, y: i32, color: Color) {
        if let Some((index, mask)) = self.locate(x, y) {
            self.apply(index, mask, color);
        }
    }

    /// [`set_pixel_color`](Self::set_pixel_color) for widened coordinates.
    /// Positions outside the `i32` range are off-screen.
    #[inline]
    pub(crate) fn plot(&mut self, x: i64, y: i64, color: Color) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.set_pixel_color(x, y, color);
        }
    }

    /// Draw a pixel with the opposite of the current color.
    ///
    /// With `White` this clears the pixel, with `Black` it sets it, and with
    /// `Inverse` it flips it.
    #[inline]
    pub fn clear_pixel(&mut self, x: i32, y: i32) {
        self.set_pixel_color(x, y, self.color.inverted());
    }

    /// Read a pixel back. Out-of-range pixels read as off.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        self.locate(x, y)
            .is_some_and(|(index, mask)| self.pixels()[index] & mask != 0)
    }

    /// Number of pixels that are on.
    pub fn count_lit(&self) -> usize {
        self.pixels().iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Zero the pixel region. The header is untouched.
    pub fn clear(&mut self) {
        self.pixels_mut().fill(0);
    }

    /// Fill every pixel byte with `byte`.
    pub fn fill(&mut self, byte: u8) {
        self.pixels_mut().fill(byte);
    }

    /// Check if two buffers hold the same pixels (headers are ignored).
    pub fn content_eq(&self, other: &FrameBuffer) -> bool {
        self.width == other.width && self.height == other.height && self.pixels() == other.pixels()
    }

    /// Fill a horizontal run of `length` pixels starting at `(x, y)`.
    ///
    /// The run is clipped against both ends of the row before any byte is
    /// touched. Any `i32` start and length are accepted.
    pub fn draw_horizontal_line(&mut self, x: i32, y: i32, length: i32) {
        let (width, height) = (i32::from(self.width), i32::from(self.height));
        if y < 0 || y >= height || x >= width {
            return;
        }
        let Some((x, length)) = clip_run(x, length, width) else {
            return;
        };

        let start = self.header_len + (y as usize / 8) * self.width as usize + x as usize;
        let mask = 1u8 << (y & 7);
        let color = self.color;
        for byte in &mut self.storage[start..start + length as usize] {
            color.apply(byte, mask);
        }
    }

    /// Fill a vertical run of `length` pixels starting at `(x, y)`.
    ///
    /// Spans rarely start or end on a page boundary, so the run is written
    /// in three phases: a partial byte for the top page, whole bytes for
    /// the pages in between, and a partial byte for the bottom page.
    pub fn draw_vertical_line(&mut self, x: i32, y: i32, length: i32) {
        let (width, height) = (i32::from(self.width), i32::from(self.height));
        if x < 0 || x >= width || y >= height {
            return;
        }
        let Some((y, mut length)) = clip_run(y, length, height) else {
            return;
        };

        let stride = self.width as usize;
        let color = self.color;
        let mut index = (y as usize / 8) * stride + x as usize;

        // Top page: bits from (y & 7) upward.
        let top = y & 7;
        if top != 0 {
            let room = 8 - top;
            let mut mask = !(0xFFu8 >> room);
            if length < room {
                mask &= 0xFFu8 >> (room - length);
            }
            self.apply(index, mask, color);
            if length <= room {
                return;
            }
            length -= room;
            index += stride;
        }

        // Whole pages.
        while length >= 8 {
            let offset = self.header_len + index;
            let byte = &mut self.storage[offset];
            *byte = match color {
                Color::White => 0xFF,
                Color::Black => 0x00,
                Color::Inverse => !*byte,
            };
            index += stride;
            length -= 8;
        }

        // Bottom page: the low `length` bits.
        if length > 0 {
            let mask = ((1u16 << length) - 1) as u8;
            self.apply(index, mask, color);
        }
    }
}

impl PartialEq for FrameBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.content_eq(other)
    }
}

impl Eq for FrameBuffer {}

/// Clip the run `start..start + length` to `0..limit`.
///
/// Returns the clipped start and length, or `None` when nothing is left. The
/// end is computed in `i64` so runs reaching past `i32::MAX` clip instead of
/// wrapping.
#[inline]
fn clip_run(start: i32, length: i32, limit: i32) -> Option<(i32, i32)> {
    let end = (i64::from(start) + i64::from(length)).min(i64::from(limit));
    let start = start.max(0);
    let length = i32::try_from(end - i64::from(start)).ok()?;
    (length > 0).then_some((start, length))
}

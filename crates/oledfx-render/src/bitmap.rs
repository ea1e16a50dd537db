#![forbid(unsafe_code)]

//! Row-major monochrome bitmap import.
//!
//! Unlike [`FrameBuffer::blit_columns`], these formats do not match the
//! display layout, so they are unpacked one bit at a time and drawn with
//! per-pixel writes. Rows are padded to whole bytes.

use crate::framebuffer::{Color, FrameBuffer};

/// Bit order within each byte of a row-major bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitOrder {
    /// Bit 7 is the leftmost pixel.
    #[default]
    MsbFirst,
    /// Bit 0 is the leftmost pixel (the XBM convention).
    LsbFirst,
}

impl BitOrder {
    #[inline]
    const fn is_set(self, byte: u8, column: usize) -> bool {
        let bit = column & 7;
        match self {
            Self::MsbFirst => byte & (0x80 >> bit) != 0,
            Self::LsbFirst => byte & (1 << bit) != 0,
        }
    }
}

impl FrameBuffer {
    /// Draw a row-major 1-bit bitmap at `(x, y)` with the current color.
    ///
    /// Only set bits are drawn; clear bits leave the framebuffer untouched.
    /// Rows missing from a short `data` slice are skipped.
    pub fn draw_row_major(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        data: &[u8],
        order: BitOrder,
    ) {
        if width <= 0 || height <= 0 {
            return;
        }
        let stride = (width as usize).div_ceil(8);
        let (x, y) = (i64::from(x), i64::from(y));
        let color = self.color();
        for (row, bytes) in data.chunks(stride).take(height as usize).enumerate() {
            for col in 0..width as usize {
                let Some(&byte) = bytes.get(col / 8) else {
                    break;
                };
                if order.is_set(byte, col) {
                    self.plot(x + col as i64, y + row as i64, color);
                }
            }
        }
    }

    /// Draw an XBM image (row-major, LSB first).
    #[inline]
    pub fn draw_xbm(&mut self, x: i32, y: i32, width: i32, height: i32, xbm: &[u8]) {
        self.draw_row_major(x, y, width, height, xbm, BitOrder::LsbFirst);
    }

    /// Draw a 16x16 icon stored as 16 little-endian 16-bit rows.
    ///
    /// Every pixel is written: set bits become white and clear bits black,
    /// swapped when `inverse` is true. The current color is not used.
    pub fn draw_ico16x16(&mut self, x: i32, y: i32, ico: &[u8], inverse: bool) {
        let (x, y) = (i64::from(x), i64::from(y));
        for (row, pair) in ico.chunks_exact(2).take(16).enumerate() {
            let bits = u16::from_le_bytes([pair[0], pair[1]]);
            for col in 0..16 {
                let on = (bits >> col) & 1 != 0;
                let color = if on != inverse {
                    Color::White
                } else {
                    Color::Black
                };
                self.plot(x + col, y + row as i64, color);
            }
        }
    }
}

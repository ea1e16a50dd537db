#![forbid(unsafe_code)]

//! Column-major blits.
//!
//! Glyphs and "fast" images are stored in the display's own layout: each byte
//! covers 8 vertical pixels (LSB on top), bytes run top to bottom within a
//! column, and columns run left to right. A source of height `h` therefore
//! has [`raster_height`]`(h)` bytes per column.
//!
//! # Layout
//!
//! A target `y` that is not a multiple of 8 makes every source byte straddle
//! two pages. The byte is widened to 16 bits and shifted down by `y & 7`;
//! the low half lands in the page containing `y`, the high half in the page
//! below.
//!
//! ```text
//!   page p     ┌ bits 0..s   untouched
//!              └ bits s..8   source bits 0..8-s
//!   page p+1   ┌ bits 0..s   source bits 8-s..8
//!              └ bits s..8   untouched
//! ```
//!
//! Each of the two writes is skipped independently when its page or column
//! falls outside the display, so glyphs partially above the top edge still
//! show their lower half.

use crate::framebuffer::FrameBuffer;

/// Bytes per column for a source of `height` pixels.
#[inline]
pub const fn raster_height(height: i32) -> usize {
    if height <= 0 {
        0
    } else {
        ((height - 1) as usize >> 3) + 1
    }
}

impl FrameBuffer {
    /// Composite column-major `data` at `(x, y)` with the current color.
    ///
    /// `width` and `height` describe the source in pixels. At most
    /// `width * raster_height(height)` bytes of `data` are read, and a glyph
    /// whose byte size is shorter leaves its trailing columns blank. Whole
    /// source bytes are written: bits of the last byte beyond `height` are
    /// drawn if they are set.
    pub fn blit_columns(&mut self, x: i32, y: i32, width: i32, height: i32, data: &[u8]) {
        let rows = raster_height(height);
        if width <= 0 || rows == 0 {
            return;
        }
        let (fb_width, fb_height) = (i64::from(self.width()), i64::from(self.height()));
        let (x, y) = (i64::from(x), i64::from(y));
        let extent = 8 * rows as i64;
        if y + extent <= 0 || y >= fb_height || x + i64::from(width) <= 0 || x >= fb_width {
            return;
        }
        let data = &data[..data.len().min((width as usize).saturating_mul(rows))];

        let pages = fb_height / 8;
        let top_page = y.div_euclid(8);
        let shift = y.rem_euclid(8) as u32;
        let color = self.color();

        for (i, &byte) in data.iter().enumerate() {
            let col = x + (i / rows) as i64;
            if col >= fb_width {
                break;
            }
            if col < 0 {
                continue;
            }
            let page = top_page + (i % rows) as i64;
            let bits = u16::from(byte) << shift;
            let (upper, lower) = (bits as u8, (bits >> 8) as u8);

            if (0..pages).contains(&page) {
                self.apply((col + page * fb_width) as usize, upper, color);
            }
            if lower != 0 && (0..pages).contains(&(page + 1)) {
                self.apply((col + (page + 1) * fb_width) as usize, lower, color);
            }
            self.cooperative_yield();
        }
    }

    /// Draw an image already packed in the display's column-major layout.
    ///
    /// Extra bytes past `width * raster_height(height)` are ignored and a
    /// short image draws only what it has.
    #[inline]
    pub fn draw_fast_image(&mut self, x: i32, y: i32, width: i32, height: i32, image: &[u8]) {
        self.blit_columns(x, y, width, height, image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::Color;
    use std::cell::Cell;

    fn fb(width: u16, height: u16) -> FrameBuffer {
        FrameBuffer::new(width, height).unwrap()
    }

    /// Reference rasterizer: one `set_pixel` per set source bit.
    fn reference(
        width: u16,
        height: u16,
        x: i32,
        y: i32,
        src_height: i32,
        data: &[u8],
    ) -> FrameBuffer {
        let rows = raster_height(src_height);
        let mut out = fb(width, height);
        for (i, &byte) in data.iter().enumerate() {
            let col = x + (i / rows) as i32;
            let top = y + 8 * (i % rows) as i32;
            for bit in 0..8 {
                if byte & (1 << bit) != 0 {
                    out.set_pixel(col, top + bit);
                }
            }
        }
        out
    }

    #[test]
    fn raster_height_rounds_up() {
        assert_eq!(raster_height(1), 1);
        assert_eq!(raster_height(8), 1);
        assert_eq!(raster_height(9), 2);
        assert_eq!(raster_height(13), 2);
        assert_eq!(raster_height(0), 0);
        assert_eq!(raster_height(-4), 0);
    }

    #[test]
    fn aligned_blit_copies_bytes() {
        let mut fb = fb(16, 16);
        fb.blit_columns(2, 8, 3, 8, &[0x81, 0xFF, 0x18]);
        assert_eq!(&fb.pixels()[16 + 2..16 + 5], &[0x81, 0xFF, 0x18]);
        assert_eq!(fb.count_lit(), 2 + 8 + 2);
    }

    #[test]
    fn unaligned_blit_spills_into_next_page() {
        let mut fb = fb(8, 16);
        fb.blit_columns(0, 3, 1, 8, &[0xFF]);
        assert_eq!(fb.pixels()[0], 0xF8);
        assert_eq!(fb.pixels()[8], 0x07);
        assert!((3..11).all(|y| fb.pixel(0, y)));
    }

    #[test]
    fn two_page_glyph_is_column_major() {
        let mut fb = fb(8, 16);
        // Column 0: top byte then bottom byte. Column 1 likewise.
        fb.blit_columns(1, 0, 2, 16, &[0x01, 0x80, 0x02, 0x40]);
        assert!(fb.pixel(1, 0));
        assert!(fb.pixel(1, 15));
        assert!(fb.pixel(2, 1));
        assert!(fb.pixel(2, 14));
        assert_eq!(fb.count_lit(), 4);
    }

    #[test]
    fn glyph_above_top_edge_keeps_lower_half() {
        let mut fb = fb(8, 16);
        fb.blit_columns(0, -4, 1, 8, &[0xFF]);
        assert_eq!(fb.pixels()[0], 0x0F);
        assert_eq!(fb.count_lit(), 4);
    }

    #[test]
    fn bottom_page_spill_is_dropped() {
        let mut fb = fb(8, 16);
        fb.blit_columns(0, 12, 1, 8, &[0xFF]);
        assert_eq!(fb.pixels()[8], 0xF0);
        assert_eq!(fb.count_lit(), 4);
    }

    #[test]
    fn columns_outside_display_are_skipped() {
        let mut fb = fb(8, 8);
        fb.blit_columns(-1, 0, 3, 8, &[0x01, 0x02, 0x04]);
        assert_eq!(&fb.pixels()[..2], &[0x02, 0x04]);

        fb.clear();
        fb.blit_columns(6, 0, 3, 8, &[0x01, 0x02, 0x04]);
        assert_eq!(&fb.pixels()[6..], &[0x01, 0x02]);
    }

    #[test]
    fn fully_off_screen_blit_is_noop() {
        let mut fb = fb(8, 8);
        fb.blit_columns(8, 0, 2, 8, &[0xFF, 0xFF]);
        fb.blit_columns(-2, 0, 2, 8, &[0xFF, 0xFF]);
        fb.blit_columns(0, -9, 1, 8, &[0xFF]);
        fb.blit_columns(0, 8, 1, 8, &[0xFF]);
        assert_eq!(fb.count_lit(), 0);
    }

    #[test]
    fn blit_respects_color() {
        let mut fb = fb(8, 8);
        fb.fill(0xFF);
        fb.set_color(Color::Black);
        fb.blit_columns(0, 0, 1, 8, &[0x0F]);
        assert_eq!(fb.pixels()[0], 0xF0);

        fb.set_color(Color::Inverse);
        fb.blit_columns(1, 0, 1, 8, &[0x3C]);
        fb.blit_columns(1, 0, 1, 8, &[0x3C]);
        assert_eq!(fb.pixels()[1], 0xFF);
    }

    #[test]
    fn fast_image_ignores_surplus_bytes() {
        let mut fb = fb(8, 8);
        fb.draw_fast_image(0, 0, 2, 8, &[0x01, 0x01, 0xFF, 0xFF]);
        assert_eq!(fb.count_lit(), 2);

        fb.clear();
        fb.draw_fast_image(0, 0, 4, 8, &[0x01]);
        assert_eq!(fb.count_lit(), 1);
    }

    #[test]
    fn blit_at_coordinate_extremes() {
        let mut fb = fb(16, 16);
        fb.blit_columns(i32::MAX, 0, 8, 8, &[0xFF; 8]);
        fb.blit_columns(0, i32::MAX, 8, 8, &[0xFF; 8]);
        fb.blit_columns(i32::MIN, i32::MIN, i32::MAX, i32::MAX, &[0xFF; 64]);
        fb.draw_fast_image(i32::MAX - 1, i32::MAX - 1, i32::MAX, 16, &[0xFF; 4]);
        assert_eq!(fb.count_lit(), 0);

        // A very tall source keeps all four bytes in its first column.
        fb.blit_columns(-3, i32::MIN + 8, i32::MAX, i32::MAX, &[0xFF; 4]);
        assert_eq!(fb.count_lit(), 0);
        fb.blit_columns(-3, 0, i32::MAX, 8, &[0x01; 4]);
        assert_eq!(fb.count_lit(), 1);
        assert!(fb.pixel(0, 0));
    }

    thread_local! {
        static YIELDS: Cell<usize> = const { Cell::new(0) };
    }

    fn count_yield() {
        YIELDS.with(|c| c.set(c.get() + 1));
    }

    #[test]
    fn yield_hook_runs_per_visible_byte() {
        let mut fb = fb(8, 8);
        fb.set_yield_hook(Some(count_yield));
        YIELDS.with(|c| c.set(0));
        fb.blit_columns(6, 0, 4, 8, &[1, 2, 3, 4]);
        assert_eq!(YIELDS.with(Cell::get), 2);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn blit_matches_per_bit_reference(
                x in -20i32..40,
                y in -20i32..40,
                width in 1i32..12,
                height in 1i32..20,
                seed in proptest::collection::vec(any::<u8>(), 0..48),
            ) {
                let len = (width as usize * raster_height(height)).min(seed.len());
                let data = &seed[..len];
                let mut actual = fb(32, 24);
                actual.blit_columns(x, y, width, height, &seed);
                let expected = reference(32, 24, x, y, height, data);
                prop_assert!(actual.content_eq(&expected));
            }

            #[test]
            fn blit_outside_the_display_for_any_coordinates(
                x in any::<i32>(),
                y in any::<i32>(),
                width in any::<i32>(),
                height in any::<i32>(),
                seed in proptest::collection::vec(any::<u8>(), 0..48),
            ) {
                let mut fb = fb(32, 24);
                fb.blit_columns(x, y, width, height, &seed);
                fb.draw_fast_image(x, y, width, height, &seed);

                let (x, y) = (i64::from(x), i64::from(y));
                let bottom = y + 8 * raster_height(height) as i64;
                if x >= 32 || y >= 24 || x + i64::from(width) <= 0 || bottom <= 0 {
                    prop_assert_eq!(fb.count_lit(), 0);
                }
            }
        }
    }
}

#![forbid(unsafe_code)]

//! Shape drawing on the framebuffer.
//!
//! Every shape is expressed in terms of [`FrameBuffer::set_pixel`] and the
//! two span fills, so clipping and the current [`Color`] apply uniformly.
//! Shapes that fall partly or wholly off-screen are drawn as far as they
//! overlap the display. Every `i32` coordinate is accepted; the rasterizers
//! work in `i64` and skip rows and columns outside the display instead of
//! stepping through them.

use crate::framebuffer::{Color, FrameBuffer};
use bitflags::bitflags;
use oledfx_core::geometry::Point;

bitflags! {
    /// Selects which quarter-arcs of a circle to draw.
    ///
    /// Quadrants are numbered counter-clockwise starting at the top right,
    /// in screen coordinates (y grows downward).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Quadrants: u8 {
        const TOP_RIGHT = 0b0001;
        const TOP_LEFT = 0b0010;
        const BOTTOM_LEFT = 0b0100;
        const BOTTOM_RIGHT = 0b1000;

        /// Left half, used for the left cap of a rounded bar.
        const LEFT = Self::TOP_LEFT.bits() | Self::BOTTOM_LEFT.bits();
        /// Right half, used for the right cap of a rounded bar.
        const RIGHT = Self::TOP_RIGHT.bits() | Self::BOTTOM_RIGHT.bits();
        const TOP = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
        const BOTTOM = Self::BOTTOM_LEFT.bits() | Self::BOTTOM_RIGHT.bits();
    }
}

/// Shape drawing operations.
pub trait Draw {
    /// Draw a line between two points (inclusive) with Bresenham's
    /// algorithm.
    ///
    /// The result does not depend on the order of the endpoints.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);

    /// Draw the outline of a rectangle.
    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32);

    /// Fill a rectangle.
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32);

    /// Draw the outline of a circle with the midpoint algorithm.
    fn draw_circle(&mut self, x0: i32, y0: i32, radius: i32);

    /// Draw only the quarter-arcs of a circle selected by `quads`.
    ///
    /// The axis point between two adjacent selected quadrants is drawn too,
    /// so two half circles join into a closed outline.
    fn draw_circle_quads(&mut self, x0: i32, y0: i32, radius: i32, quads: Quadrants);

    /// Fill a circle using horizontal spans.
    fn fill_circle(&mut self, x0: i32, y0: i32, radius: i32);

    /// Draw the outline of a triangle.
    fn draw_triangle(&mut self, p0: Point, p1: Point, p2: Point);

    /// Fill a triangle with horizontal scanlines.
    fn fill_triangle(&mut self, p0: Point, p1: Point, p2: Point);

    /// Draw a rounded progress bar with the given outer dimensions.
    ///
    /// `progress` is a percentage; values above 100 are clamped. The bar is
    /// always drawn in [`Color::White`] and the previous color is restored
    /// afterwards.
    fn draw_progress_bar(&mut self, x: i32, y: i32, width: i32, height: i32, progress: u8);
}

impl Draw for FrameBuffer {
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let (mut x0, mut y0) = (i64::from(x0), i64::from(y0));
        let (mut x1, mut y1) = (i64::from(x1), i64::from(y1));

        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let (width, height) = (i64::from(self.width()), i64::from(self.height()));
        let (major, minor) = if steep { (height, width) } else { (width, height) };
        if x1 < 0 || x0 >= major {
            return;
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let ystep = if y0 < y1 { 1 } else { -1 };
        let mut err = dx / 2;
        let mut y = y0;

        // Jump straight to the first on-screen column. After `skip` steps
        // the error has dropped by `skip * dy` and been topped up by `dx`
        // once per minor step, which keeps it in `0..dx`.
        let start = x0.max(0);
        let skip = i128::from(start - x0);
        if skip > 0 {
            let owed = skip * i128::from(dy) - i128::from(err);
            let steps = if owed > 0 {
                (owed + i128::from(dx) - 1) / i128::from(dx)
            } else {
                0
            };
            err = (i128::from(err) - skip * i128::from(dy) + steps * i128::from(dx)) as i64;
            y += ystep * steps as i64;
        }

        let color = self.color();
        for x in start..=x1.min(major - 1) {
            if (0..minor).contains(&y) {
                if steep {
                    self.plot(y, x, color);
                } else {
                    self.plot(x, y, color);
                }
            } else if (y < 0) == (ystep < 0) {
                // Heading away from the display.
                break;
            }
            err -= dy;
            if err < 0 {
                y += ystep;
                err += dx;
            }
        }
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.draw_horizontal_line(x, y, width);
        self.draw_vertical_line(x, y, height);
        if let Ok(right) = i32::try_from(i64::from(x) + i64::from(width) - 1) {
            self.draw_vertical_line(right, y, height);
        }
        if let Ok(bottom) = i32::try_from(i64::from(y) + i64::from(height) - 1) {
            self.draw_horizontal_line(x, bottom, width);
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.block(i64::from(x), i64::from(y), i64::from(width), i64::from(height));
    }

    fn draw_circle(&mut self, x0: i32, y0: i32, radius: i32) {
        let (x0, y0, radius) = (i64::from(x0), i64::from(y0), i64::from(radius));
        if radius < 0 || self.misses_circle(x0, y0, radius) {
            return;
        }
        let color = self.color();
        if radius == 0 {
            self.plot(x0, y0, color);
            return;
        }

        let (mut x, mut y) = (0, radius);
        let mut dp = 1 - radius;
        loop {
            if dp < 0 {
                dp += 2 * x + 3;
            } else {
                dp += 2 * x - 2 * y + 5;
                y -= 1;
            }
            x += 1;

            self.plot(x0 + x, y0 + y, color);
            self.plot(x0 - x, y0 + y, color);
            self.plot(x0 + x, y0 - y, color);
            self.plot(x0 - x, y0 - y, color);
            self.plot(x0 + y, y0 + x, color);
            self.plot(x0 - y, y0 + x, color);
            self.plot(x0 + y, y0 - x, color);
            self.plot(x0 - y, y0 - x, color);

            if x >= y {
                break;
            }
        }

        self.plot(x0 + radius, y0, color);
        self.plot(x0, y0 + radius, color);
        self.plot(x0 - radius, y0, color);
        self.plot(x0, y0 - radius, color);
    }

    fn draw_circle_quads(&mut self, x0: i32, y0: i32, radius: i32, quads: Quadrants) {
        self.arcs(i64::from(x0), i64::from(y0), i64::from(radius), quads);
    }

    fn fill_circle(&mut self, x0: i32, y0: i32, radius: i32) {
        self.disc(i64::from(x0), i64::from(y0), i64::from(radius));
    }

    fn draw_triangle(&mut self, p0: Point, p1: Point, p2: Point) {
        self.draw_line(p0.x, p0.y, p1.x, p1.y);
        self.draw_line(p1.x, p1.y, p2.x, p2.y);
        self.draw_line(p2.x, p2.y, p0.x, p0.y);
    }

    fn fill_triangle(&mut self, p0: Point, p1: Point, p2: Point) {
        let mut v = [p0, p1, p2];
        v.sort_by_key(|p| p.y);
        let [(x0, y0), (x1, y1), (x2, y2)] = v.map(|p| (i64::from(p.x), i64::from(p.y)));

        let height = i64::from(self.height());
        if y2 < 0 || y0 >= height {
            return;
        }

        // All on one scanline.
        if y0 == y2 {
            let a = x0.min(x1).min(x2);
            let b = x0.max(x1).max(x2);
            self.span_between(a, b, y0);
            return;
        }

        // Upper part: long edge 0-2 against short edge 0-1. The y1 scanline
        // belongs here only when the bottom edge is flat. Rows above and
        // below the display are skipped without stepping through them.
        let last = if y1 == y2 { y1 } else { y1 - 1 };
        for y in y0.max(0)..=y2.min(height - 1) {
            let long = edge_x(x0, x2 - x0, y2 - y0, y - y0);
            let short = if y <= last {
                edge_x(x0, x1 - x0, y1 - y0, y - y0)
            } else {
                edge_x(x1, x2 - x1, y2 - y1, y - y1)
            };
            self.span_between(short, long, y);
        }
    }

    fn draw_progress_bar(&mut self, x: i32, y: i32, width: i32, height: i32, progress: u8) {
        if width <= 0 || height <= 0 {
            return;
        }
        let (x, y) = (i64::from(x), i64::from(y));
        let (width, height) = (i64::from(width), i64::from(height));
        let progress = i64::from(progress.min(100));
        let radius = height / 2;
        let (cx, cy) = (x + radius, y + radius);
        let inner_radius = radius - 2;
        let track = width - 2 * radius + 1;

        let previous = self.color();
        self.set_color(Color::White);

        self.arcs(cx, cy, radius, Quadrants::LEFT);
        self.span(cx, y, track);
        self.span(cx, y + height, track);
        self.arcs(x + width - radius, cy, radius, Quadrants::RIGHT);

        let filled = track * progress / 100;
        self.disc(cx, cy, inner_radius);
        self.block(cx + 1, y + 2, filled, height - 3);
        self.disc(cx + filled, cy, inner_radius);

        self.set_color(previous);
    }
}

/// X coordinate of an edge starting at `x`, `t` rows down a run of `dx`
/// over `dy`, rounded toward zero.
#[inline]
fn edge_x(x: i64, dx: i64, dy: i64, t: i64) -> i64 {
    x + (i128::from(dx) * i128::from(t) / i128::from(dy)) as i64
}

// Widened helpers. Shapes are rasterized in `i64` so that coordinates near
// the ends of the `i32` range clip instead of overflowing; only spans that
// survive clipping are narrowed back.
impl FrameBuffer {
    /// Horizontal span covering `a..=b` in either order.
    #[inline]
    fn span_between(&mut self, a: i64, b: i64, y: i64) {
        let (a, b) = if a > b { (b, a) } else { (a, b) };
        self.span(a, y, b - a + 1);
    }

    fn span(&mut self, x: i64, y: i64, length: i64) {
        let end = (x + length).min(i64::from(self.width()));
        let start = x.max(0);
        if start >= end {
            return;
        }
        if let Ok(y) = i32::try_from(y) {
            self.draw_horizontal_line(start as i32, y, (end - start) as i32);
        }
    }

    fn block(&mut self, x: i64, y: i64, width: i64, height: i64) {
        let (fb_width, fb_height) = (i64::from(self.width()), i64::from(self.height()));
        let (left, right) = (x.max(0), (x + width).min(fb_width));
        let (top, bottom) = (y.max(0), (y + height).min(fb_height));
        if left >= right || top >= bottom {
            return;
        }
        for col in left..right {
            self.draw_vertical_line(col as i32, top as i32, (bottom - top) as i32);
        }
    }

    /// Check if the bounding box of a circle lies entirely off-screen.
    fn misses_circle(&self, x0: i64, y0: i64, radius: i64) -> bool {
        x0 + radius < 0
            || y0 + radius < 0
            || x0 - radius >= i64::from(self.width())
            || y0 - radius >= i64::from(self.height())
    }

    fn arcs(&mut self, x0: i64, y0: i64, radius: i64, quads: Quadrants) {
        if radius < 0 || self.misses_circle(x0, y0, radius) {
            return;
        }
        let color = self.color();

        let (mut x, mut y) = (0, radius);
        let mut dp = 1 - radius;
        while x < y {
            if dp < 0 {
                dp += 2 * x + 3;
            } else {
                dp += 2 * x - 2 * y + 5;
                y -= 1;
            }
            x += 1;

            if quads.contains(Quadrants::TOP_RIGHT) {
                self.plot(x0 + x, y0 - y, color);
                self.plot(x0 + y, y0 - x, color);
            }
            if quads.contains(Quadrants::TOP_LEFT) {
                self.plot(x0 - y, y0 - x, color);
                self.plot(x0 - x, y0 - y, color);
            }
            if quads.contains(Quadrants::BOTTOM_LEFT) {
                self.plot(x0 - y, y0 + x, color);
                self.plot(x0 - x, y0 + y, color);
            }
            if quads.contains(Quadrants::BOTTOM_RIGHT) {
                self.plot(x0 + x, y0 + y, color);
                self.plot(x0 + y, y0 + x, color);
            }
        }

        if quads.contains(Quadrants::RIGHT) {
            self.plot(x0 + radius, y0, color);
        }
        if quads.contains(Quadrants::BOTTOM) {
            self.plot(x0, y0 + radius, color);
        }
        if quads.contains(Quadrants::LEFT) {
            self.plot(x0 - radius, y0, color);
        }
        if quads.contains(Quadrants::TOP) {
            self.plot(x0, y0 - radius, color);
        }
    }

    fn disc(&mut self, x0: i64, y0: i64, radius: i64) {
        if radius < 0 || self.misses_circle(x0, y0, radius) {
            return;
        }
        if radius == 0 {
            let color = self.color();
            self.plot(x0, y0, color);
            return;
        }

        let (mut x, mut y) = (0, radius);
        let mut dp = 1 - radius;
        loop {
            if dp < 0 {
                dp += 2 * x + 3;
            } else {
                dp += 2 * x - 2 * y + 5;
                y -= 1;
            }
            x += 1;

            self.span(x0 - x, y0 - y, 2 * x);
            self.span(x0 - x, y0 + y, 2 * x);
            self.span(x0 - y, y0 - x, 2 * y);
            self.span(x0 - y, y0 + x, 2 * y);

            if x >= y {
                break;
            }
        }
        self.span(x0 - radius, y0, 2 * radius);
    }
}

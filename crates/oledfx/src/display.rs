#![forbid(unsafe_code)]

//! The display engine.
//!
//! A [`Display`] owns a [`Transport`], the frame it renders into, an optional
//! shadow of the last presented frame, the active font and glyph mapper, and
//! the scroll log behind its character-sink interface.
//!
//! # Lifecycle
//!
//! ```text
//! new ──► init ──► draw / write ... ──► display ──► end
//!          │                                         │
//!          └─ allocate_buffers ─ init sequence ─ reset_display
//! ```
//!
//! Nothing touches the bus before [`Display::init`] (or
//! [`Display::allocate_buffers`]) connects the transport. After
//! [`Display::end`] the buffers and log are gone and `init` may be called
//! again.
//!
//! # Usage
//!
//! ```
//! use oledfx::{Display, DisplayConfig, Draw, Geometry, Headless};
//!
//! let mut display = Display::new(Headless::new(), DisplayConfig::new(Geometry::W128H32));
//! display.init().unwrap();
//!
//! if let Some(fb) = display.frame_mut() {
//!     fb.draw_rect(0, 0, 128, 32);
//! }
//! display.display().unwrap();
//! assert_eq!(display.transport().frames().len(), 2);
//! ```

use std::fmt;
use std::io;

use oledfx_core::geometry::Size;
use oledfx_core::{debug, warn};
use oledfx_render::{FrameBuffer, Transport};
use oledfx_text::{
    Font, GlyphMapper, Latin1Folding, ScrollLog, ScrollLogError, TextAlignment, Typesetter,
};

use crate::commands;
use crate::config::DisplayConfig;
use crate::error::DisplayError;

/// Fill byte for the shadow buffer after a reset. Every page then differs
/// from a cleared frame, so a diffing transport repaints the whole panel.
const SHADOW_RESET_FILL: u8 = 0x01;

pub struct Display<'f, T: Transport> {
    transport: T,
    config: DisplayConfig,
    frame: Option<FrameBuffer>,
    shadow: Option<FrameBuffer>,
    font: Option<Font<'f>>,
    mapper: Box<dyn GlyphMapper>,
    alignment: TextAlignment,
    log: Option<ScrollLog>,
    /// The log changed but its redraw has not reached the transport.
    pending_present: bool,
}

impl<T: Transport> fmt::Debug for Display<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Display")
            .field("config", &self.config)
            .field("allocated", &self.frame.is_some())
            .field("font", &self.font.map(|font| font.height()))
            .field("alignment", &self.alignment)
            .field("log", &self.log)
            .field("pending_present", &self.pending_present)
            .finish_non_exhaustive()
    }
}

impl<'f, T: Transport> Display<'f, T> {
    /// Wrap `transport`. No bytes are sent until [`init`](Self::init).
    pub fn new(transport: T, config: DisplayConfig) -> Self {
        Self {
            transport,
            config,
            frame: None,
            shadow: None,
            font: None,
            mapper: Box::new(Latin1Folding::new()),
            alignment: TextAlignment::default(),
            log: None,
            pending_present: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Panel size in pixels.
    #[inline]
    pub fn size(&self) -> Size {
        self.config.geometry().size()
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.size().width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.size().height
    }

    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the buffers and hand back the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.frame.is_some()
    }

    /// The frame being drawn, or `None` before allocation.
    #[inline]
    pub fn frame(&self) -> Option<&FrameBuffer> {
        self.frame.as_ref()
    }

    /// The frame being drawn. Shapes and bitmaps are drawn through this with
    /// the [`Draw`](oledfx_render::Draw) trait.
    #[inline]
    pub fn frame_mut(&mut self) -> Option<&mut FrameBuffer> {
        self.frame.as_mut()
    }

    /// Copy of the last presented frame, kept when double buffering.
    #[inline]
    pub fn shadow(&self) -> Option<&FrameBuffer> {
        self.shadow.as_ref()
    }

    // --- Lifecycle ------------------------------------------------------

    /// Connect the transport and allocate the frame (and shadow, when double
    /// buffering).
    ///
    /// Any scroll log is dropped. Existing buffers are reused. If the shadow
    /// cannot be allocated, a frame allocated by this call is released
    /// again.
    pub fn allocate_buffers(&mut self) -> Result<(), DisplayError<T::Error>> {
        self.log = None;
        self.pending_present = false;

        if let Err(err) = self.transport.connect() {
            warn!(error = %err, "display transport failed to connect");
            return Err(DisplayError::Connect(err));
        }

        let Size { width, height } = self.size();
        let fresh = self.frame.is_none();
        if fresh {
            self.frame = Some(FrameBuffer::with_header(
                width,
                height,
                self.transport.header_len(),
            )?);
        }

        if self.config.is_double_buffered() && self.shadow.is_none() {
            match FrameBuffer::new(width, height) {
                Ok(shadow) => self.shadow = Some(shadow),
                Err(err) => {
                    debug!(error = %err, "shadow allocation failed, releasing frame");
                    if fresh {
                        self.frame = None;
                    }
                    return Err(err.into());
                }
            }
        }

        debug!(
            width,
            height,
            double_buffer = self.shadow.is_some(),
            "display buffers allocated"
        );
        Ok(())
    }

    /// Allocate buffers, send the controller power-on sequence, and present
    /// a blank frame.
    pub fn init(&mut self) -> Result<(), DisplayError<T::Error>> {
        self.allocate_buffers()?;
        self.send_commands(&commands::init_sequence(self.config.geometry()))?;
        self.reset_display()
    }

    /// Clear the frame, invalidate the shadow, and present.
    pub fn reset_display(&mut self) -> Result<(), DisplayError<T::Error>> {
        self.clear();
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.fill(SHADOW_RESET_FILL);
        }
        self.display()
    }

    /// Release the buffers and the scroll log.
    pub fn end(&mut self) {
        self.frame = None;
        self.shadow = None;
        self.log = None;
        self.pending_present = false;
        debug!("display buffers released");
    }

    /// Hand the frame to the transport.
    pub fn display(&mut self) -> Result<(), DisplayError<T::Error>> {
        let frame = self.frame.as_mut().ok_or(DisplayError::NotAllocated)?;
        self.transport
            .present(frame, self.shadow.as_mut())
            .map_err(|err| {
                warn!(error = %err, "frame transfer failed");
                DisplayError::Transport(err)
            })
    }

    /// Clear the frame. Does nothing before allocation.
    pub fn clear(&mut self) {
        if let Some(frame) = self.frame.as_mut() {
            frame.clear();
        }
    }

    // --- Text -----------------------------------------------------------

    /// Use `font` for text and the scroll log.
    ///
    /// The scroll log is sized from the font, so its content is dropped and
    /// it is recreated on the next write.
    pub fn set_font(&mut self, font: Font<'f>) {
        self.font = Some(font);
        self.pending_present = false;
        if self.log.take().is_some() {
            debug!(height = font.height(), "font changed, scroll log dropped");
        }
    }

    #[inline]
    pub fn font(&self) -> Option<Font<'f>> {
        self.font
    }

    /// Replace the byte-to-glyph mapper. The default is [`Latin1Folding`].
    pub fn set_mapper(&mut self, mapper: impl GlyphMapper + 'static) {
        self.mapper = Box::new(mapper);
    }

    pub fn set_text_alignment(&mut self, alignment: TextAlignment) {
        self.alignment = alignment;
    }

    #[inline]
    pub fn text_alignment(&self) -> TextAlignment {
        self.alignment
    }

    /// Width in pixels of the widest line of `text`, or `0` with no font.
    pub fn string_width(&mut self, text: &str) -> u32 {
        match self.font {
            Some(font) => Typesetter::new(font, &mut *self.mapper).string_width(text),
            None => 0,
        }
    }

    /// Draw `text` at `(x, y)` with the current alignment.
    ///
    /// Returns the number of bytes drawn, or `0` with no font or before
    /// allocation.
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str) -> usize {
        self.with_typesetter(|ts, fb| ts.draw_string(fb, x, y, text))
            .unwrap_or(0)
    }

    /// Draw formatted text. See [`draw_string`](Self::draw_string).
    pub fn draw_fmt(&mut self, x: i32, y: i32, args: fmt::Arguments<'_>) -> usize {
        match args.as_str() {
            Some(text) => self.draw_string(x, y, text),
            None => self.draw_string(x, y, &args.to_string()),
        }
    }

    /// Word-wrap `text` to `max_width` pixels and draw it.
    ///
    /// Returns `0` when all lines fit on the display, otherwise the byte
    /// length of the first wrapped line.
    pub fn draw_string_max_width(&mut self, x: i32, y: i32, max_width: u32, text: &str) -> usize {
        self.with_typesetter(|ts, fb| ts.draw_string_max_width(fb, x, y, max_width, text))
            .unwrap_or(0)
    }

    fn with_typesetter<R>(
        &mut self,
        f: impl FnOnce(&mut Typesetter<'_, 'f>, &mut FrameBuffer) -> R,
    ) -> Option<R> {
        let font = self.font?;
        let frame = self.frame.as_mut()?;
        let mut ts = Typesetter::new(font, &mut *self.mapper).with_alignment(self.alignment);
        Some(f(&mut ts, frame))
    }

    // --- Scroll log -----------------------------------------------------

    /// Append one byte to the scroll log and redraw it.
    ///
    /// The log is created on first use, sized for the current font and
    /// display. Returns whether a glyph code was stored; dropped bytes
    /// (carriage returns, bytes the mapper rejects, characters past the line
    /// limit) leave the frame untouched.
    ///
    /// Without a font or before allocation this fails and the log is not
    /// touched. A transport error is reported after the byte has been
    /// stored; the next write or [`io::Write::flush`] presents it again.
    pub fn write_byte(&mut self, byte: u8) -> Result<bool, DisplayError<T::Error>> {
        let stored = self.append_log(&[byte])? == 1;
        if stored {
            self.present_log()?;
        }
        Ok(stored)
    }

    /// Append `bytes` to the scroll log, then redraw and present once.
    ///
    /// Returns the number of glyph codes stored. Fails like
    /// [`write_byte`](Self::write_byte).
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, DisplayError<T::Error>> {
        let stored = self.append_log(bytes)?;
        self.present_log()?;
        Ok(stored)
    }

    /// Clear the frame and the scroll log, then present.
    pub fn cls(&mut self) -> Result<(), DisplayError<T::Error>> {
        self.clear();
        if let Some(log) = self.log.as_mut() {
            log.clear();
        }
        self.display()
    }

    /// The scroll log, once something has been written.
    #[inline]
    pub fn scroll_log(&self) -> Option<&ScrollLog> {
        self.log.as_ref()
    }

    /// Store `bytes` in the scroll log without drawing. Nothing is stored
    /// unless a font is set and the buffers are allocated.
    fn append_log(&mut self, bytes: &[u8]) -> Result<usize, DisplayError<T::Error>> {
        let font = self.font.ok_or(ScrollLogError::NoFont)?;
        if self.frame.is_none() {
            return Err(DisplayError::NotAllocated);
        }

        let mut log = match self.log.take() {
            Some(log) => log,
            None => ScrollLog::for_display(&font, self.size())?,
        };
        let mut stored = 0;
        for &byte in bytes {
            if log.write(byte, &mut *self.mapper) {
                stored += 1;
            }
        }
        self.log = Some(log);
        Ok(stored)
    }

    /// Redraw the log and present it. The log stays pending until a present
    /// succeeds.
    fn present_log(&mut self) -> Result<(), DisplayError<T::Error>> {
        self.pending_present = true;
        self.redraw_log()?;
        self.pending_present = false;
        Ok(())
    }

    fn redraw_log(&mut self) -> Result<(), DisplayError<T::Error>> {
        let (Some(font), Some(log)) = (self.font, self.log.as_ref()) else {
            return Ok(());
        };
        let frame = self.frame.as_mut().ok_or(DisplayError::NotAllocated)?;
        frame.clear();
        log.render(frame, font);
        self.display()
    }

    // --- Controller commands --------------------------------------------

    fn send_commands(&mut self, bytes: &[u8]) -> Result<(), DisplayError<T::Error>> {
        for &byte in bytes {
            if let Err(err) = self.transport.send_command(byte) {
                warn!(command = byte, error = %err, "display command failed");
                return Err(DisplayError::Transport(err));
            }
        }
        Ok(())
    }

    pub fn display_on(&mut self) -> Result<(), DisplayError<T::Error>> {
        self.send_commands(&[commands::DISPLAY_ON])
    }

    pub fn display_off(&mut self) -> Result<(), DisplayError<T::Error>> {
        self.send_commands(&[commands::DISPLAY_OFF])
    }

    /// Show lit pixels dark and dark pixels lit. The frame is not changed.
    pub fn invert_display(&mut self) -> Result<(), DisplayError<T::Error>> {
        self.send_commands(&[commands::INVERT_DISPLAY])
    }

    pub fn normal_display(&mut self) -> Result<(), DisplayError<T::Error>> {
        self.send_commands(&[commands::NORMAL_DISPLAY])
    }

    /// Set contrast, precharge period, and VCOMH deselect level directly.
    pub fn set_contrast(
        &mut self,
        contrast: u8,
        precharge: u8,
        comdetect: u8,
    ) -> Result<(), DisplayError<T::Error>> {
        self.send_commands(&commands::contrast_sequence(contrast, precharge, comdetect))
    }

    /// Set brightness on a `0..=255` scale. `0` turns the panel fully dark.
    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), DisplayError<T::Error>> {
        let (contrast, precharge, comdetect) = commands::brightness_levels(brightness);
        self.set_contrast(contrast, precharge, comdetect)
    }

    pub fn reset_orientation(&mut self) -> Result<(), DisplayError<T::Error>> {
        self.send_commands(&commands::RESET_ORIENTATION)
    }

    /// Rotate the panel output by 180 degrees.
    pub fn flip_screen_vertically(&mut self) -> Result<(), DisplayError<T::Error>> {
        self.send_commands(&commands::FLIP_VERTICAL)
    }

    pub fn mirror_screen(&mut self) -> Result<(), DisplayError<T::Error>> {
        self.send_commands(&commands::MIRROR)
    }
}

impl<T: Transport> fmt::Write for Display<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes())
            .map(drop)
            .map_err(|_| fmt::Error)
    }

    /// Formats the whole message first, so one `write!` presents one frame.
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        match args.as_str() {
            Some(text) => fmt::Write::write_str(self, text),
            None => fmt::Write::write_str(self, &args.to_string()),
        }
    }
}

impl<T: Transport> io::Write for Display<'_, T> {
    /// Store all of `buf` in the scroll log and present it.
    ///
    /// Fails only when nothing was stored (no font, buffers not allocated).
    /// Once the bytes are in the log the full length is returned, and a
    /// failed present is left for [`flush`](io::Write::flush) to retry.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append_log(buf).map_err(io_error)?;
        if let Err(err) = self.present_log() {
            debug!(error = %err, "scroll log present deferred to flush");
        }
        Ok(buf.len())
    }

    /// Present a log write whose transfer failed.
    fn flush(&mut self) -> io::Result<()> {
        if self.pending_present {
            self.present_log().map_err(io_error)?;
        }
        Ok(())
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match args.as_str() {
            Some(text) => io::Write::write_all(self, text.as_bytes()),
            None => io::Write::write_all(self, args.to_string().as_bytes()),
        }
    }
}

fn io_error<E: fmt::Display>(err: DisplayError<E>) -> io::Error {
    io::Error::other(err.to_string())
}

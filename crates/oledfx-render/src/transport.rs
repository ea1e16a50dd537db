#![forbid(unsafe_code)]

//! Transport capability.
//!
//! The render kernel never talks to hardware. A [`Transport`] is injected
//! into the display engine and owns the bus: it connects, sends single
//! command bytes, and pushes packed frames. The framebuffer reserves
//! [`Transport::header_len`] bytes in front of the pixels so the transport
//! can prepend its control prefix without copying the frame.
//!
//! [`Headless`] records everything it is sent and is what the tests use in
//! place of a real bus.
//!
//! # Usage
//!
//! ```
//! use oledfx_render::transport::{Headless, Transport};
//! use oledfx_render::FrameBuffer;
//!
//! let mut bus = Headless::new().with_header_len(1);
//! bus.connect().unwrap();
//! bus.send_command(0xAF).unwrap();
//!
//! let mut frame = FrameBuffer::with_header(128, 64, bus.header_len()).unwrap();
//! frame.set_pixel(0, 0);
//! bus.present(&mut frame, None).unwrap();
//!
//! assert_eq!(bus.commands(), &[0xAF]);
//! assert_eq!(bus.frames()[0].len(), 1 + 1024);
//! ```

use std::fmt;

use crate::framebuffer::FrameBuffer;

/// Something that can carry commands and frame data to a display.
pub trait Transport {
    /// Bus error.
    type Error: std::error::Error;

    /// Bytes the transport needs reserved in front of every data frame.
    fn header_len(&self) -> usize {
        0
    }

    /// Open the bus. Called once before any command is sent.
    fn connect(&mut self) -> Result<(), Self::Error>;

    /// Send a single command byte.
    fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send raw data bytes.
    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Push a rendered frame to the display.
    ///
    /// `frame` includes the reserved header, which the transport may fill in
    /// before sending. When double buffering is enabled `shadow` holds what
    /// the display showed after the previous call; a transport that diffs
    /// frames is responsible for updating it. The default sends the whole
    /// frame and ignores the shadow.
    fn present(
        &mut self,
        frame: &mut FrameBuffer,
        shadow: Option<&mut FrameBuffer>,
    ) -> Result<(), Self::Error> {
        let _ = shadow;
        self.send_data(frame.frame())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn header_len(&self) -> usize {
        (**self).header_len()
    }

    fn connect(&mut self) -> Result<(), Self::Error> {
        (**self).connect()
    }

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        (**self).send_command(command)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).send_data(data)
    }

    fn present(
        &mut self,
        frame: &mut FrameBuffer,
        shadow: Option<&mut FrameBuffer>,
    ) -> Result<(), Self::Error> {
        (**self).present(frame, shadow)
    }
}

/// Errors reported by [`Headless`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlessError {
    /// `connect` was configured to fail.
    Refused,
    /// A command or frame was sent before a successful `connect`.
    NotConnected,
}

impl fmt::Display for HeadlessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refused => write!(f, "headless transport refused connection"),
            Self::NotConnected => write!(f, "headless transport is not connected"),
        }
    }
}

impl std::error::Error for HeadlessError {}

/// In-memory transport that records commands and frames.
#[derive(Debug, Clone, Default)]
pub struct Headless {
    header_len: usize,
    refuse_connect: bool,
    connected: bool,
    connects: usize,
    commands: Vec<u8>,
    frames: Vec<Vec<u8>>,
}

impl Headless {
    /// Create a transport with no header that accepts connections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `len` header bytes in every frame.
    #[must_use]
    pub fn with_header_len(mut self, len: usize) -> Self {
        self.header_len = len;
        self
    }

    /// Make every `connect` fail with [`HeadlessError::Refused`].
    #[must_use]
    pub fn refusing(mut self) -> Self {
        self.refuse_connect = true;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Drop the connection, as if the bus went away. Sends fail with
    /// [`HeadlessError::NotConnected`] until the next `connect`.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Number of successful `connect` calls.
    pub fn connects(&self) -> usize {
        self.connects
    }

    /// Every command byte sent, in order.
    pub fn commands(&self) -> &[u8] {
        &self.commands
    }

    /// Every data frame sent, in order, header included.
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// The most recent frame with its header stripped.
    pub fn last_pixels(&self) -> Option<&[u8]> {
        self.frames.last().map(|f| &f[self.header_len.min(f.len())..])
    }

    /// Forget recorded commands and frames. The connection is kept.
    pub fn clear_log(&mut self) {
        self.commands.clear();
        self.frames.clear();
    }
}

impl Transport for Headless {
    type Error = HeadlessError;

    fn header_len(&self) -> usize {
        self.header_len
    }

    fn connect(&mut self) -> Result<(), HeadlessError> {
        if self.refuse_connect {
            return Err(HeadlessError::Refused);
        }
        self.connected = true;
        self.connects += 1;
        Ok(())
    }

    fn send_command(&mut self, command: u8) -> Result<(), HeadlessError> {
        if !self.connected {
            return Err(HeadlessError::NotConnected);
        }
        self.commands.push(command);
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), HeadlessError> {
        if !self.connected {
            return Err(HeadlessError::NotConnected);
        }
        self.frames.push(data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_when_configured() {
        let mut bus = Headless::new().refusing();
        assert_eq!(bus.connect(), Err(HeadlessError::Refused));
        assert!(!bus.is_connected());
        assert_eq!(bus.send_command(0xAE), Err(HeadlessError::NotConnected));
    }

    #[test]
    fn disconnect_fails_sends_until_reconnect() {
        let mut bus = Headless::new();
        bus.connect().unwrap();
        bus.disconnect();
        assert_eq!(bus.send_data(&[1, 2]), Err(HeadlessError::NotConnected));
        bus.connect().unwrap();
        bus.send_data(&[1, 2]).unwrap();
        assert_eq!(bus.frames(), &[vec![1, 2]]);
        assert_eq!(bus.connects(), 2);
    }

    #[test]
    fn present_sends_header_and_pixels() {
        let mut bus = Headless::new().with_header_len(2);
        bus.connect().unwrap();
        let mut frame = FrameBuffer::with_header(8, 8, bus.header_len()).unwrap();
        frame.header_mut().copy_from_slice(&[0x40, 0x41]);
        frame.set_pixel(3, 0);
        bus.present(&mut frame, None).unwrap();

        assert_eq!(bus.frames().len(), 1);
        assert_eq!(&bus.frames()[0][..2], &[0x40, 0x41]);
        assert_eq!(bus.last_pixels().unwrap(), frame.pixels());
    }

    #[test]
    fn mutable_reference_forwards() {
        fn drive<T: Transport>(mut bus: T) -> Result<(), T::Error> {
            bus.connect()?;
            bus.send_command(0x8D)
        }

        let mut bus = Headless::new();
        drive(&mut bus).unwrap();
        assert_eq!(bus.commands(), &[0x8D]);
        assert_eq!(bus.connects(), 1);

        bus.clear_log();
        assert!(bus.commands().is_empty());
        assert!(bus.is_connected());
    }
}

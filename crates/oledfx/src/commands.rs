#![forbid(unsafe_code)]

//! Controller command bytes and sequences.
//!
//! The constants are the single-byte opcodes of the SSD1306/SH1106 family.
//! Sequences are built as byte lists so they can be checked without a bus
//! and sent with one loop.

use crate::config::Geometry;

pub const SET_LOW_COLUMN: u8 = 0x00;
pub const SET_HIGH_COLUMN: u8 = 0x10;
pub const MEMORY_MODE: u8 = 0x20;
pub const COLUMN_ADDR: u8 = 0x21;
pub const PAGE_ADDR: u8 = 0x22;
pub const DEACTIVATE_SCROLL: u8 = 0x2E;
pub const SET_START_LINE: u8 = 0x40;
pub const SET_CONTRAST: u8 = 0x81;
pub const CHARGE_PUMP: u8 = 0x8D;
pub const SEG_REMAP: u8 = 0xA0;
pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
pub const DISPLAY_ALL_ON: u8 = 0xA5;
pub const NORMAL_DISPLAY: u8 = 0xA6;
pub const INVERT_DISPLAY: u8 = 0xA7;
pub const SET_MULTIPLEX: u8 = 0xA8;
pub const DISPLAY_OFF: u8 = 0xAE;
pub const DISPLAY_ON: u8 = 0xAF;
pub const COM_SCAN_INC: u8 = 0xC0;
pub const COM_SCAN_DEC: u8 = 0xC8;
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
pub const SET_DISPLAY_CLOCK_DIV: u8 = 0xD5;
pub const SET_PRECHARGE: u8 = 0xD9;
pub const SET_COM_PINS: u8 = 0xDA;
pub const SET_VCOM_DETECT: u8 = 0xDB;

/// Charge-pump argument enabling the internal DC/DC converter.
const CHARGE_PUMP_ENABLE: u8 = 0x14;
/// Fastest oscillator setting, roughly 96 Hz refresh.
const CLOCK_DIV_FAST: u8 = 0xF0;
const PRECHARGE_DEFAULT: u8 = 0xF1;
const VCOM_DETECT_DEFAULT: u8 = 0x40;

/// Power-on sequence for `geometry`. Empty for [`Geometry::Raw`], whose
/// panel is configured by the caller.
pub fn init_sequence(geometry: Geometry) -> Vec<u8> {
    // Multiplex ratio is the panel height minus one.
    let (multiplex, com_pins, contrast) = match geometry {
        Geometry::Raw { .. } => return Vec::new(),
        Geometry::W128H64 => (63, 0x12, 0xCF),
        Geometry::W128H32 => (31, 0x02, 0x8F),
        Geometry::W64H48 => (47, 0x12, 0xCF),
        Geometry::W64H32 => (31, 0x12, 0xCF),
    };
    let start_line = if geometry == Geometry::W64H32 {
        0x00
    } else {
        SET_START_LINE
    };

    vec![
        DISPLAY_OFF,
        SET_DISPLAY_CLOCK_DIV,
        CLOCK_DIV_FAST,
        SET_MULTIPLEX,
        multiplex,
        SET_DISPLAY_OFFSET,
        0x00,
        start_line,
        CHARGE_PUMP,
        CHARGE_PUMP_ENABLE,
        MEMORY_MODE,
        0x00,
        SEG_REMAP,
        COM_SCAN_INC,
        SET_COM_PINS,
        com_pins,
        SET_CONTRAST,
        contrast,
        SET_PRECHARGE,
        PRECHARGE_DEFAULT,
        SET_VCOM_DETECT,
        VCOM_DETECT_DEFAULT,
        DISPLAY_ALL_ON_RESUME,
        NORMAL_DISPLAY,
        DEACTIVATE_SCROLL,
        DISPLAY_ON,
    ]
}

/// Contrast sequence: precharge period, contrast level, VCOMH deselect
/// level, then resume normal output.
pub fn contrast_sequence(contrast: u8, precharge: u8, comdetect: u8) -> [u8; 9] {
    [
        SET_PRECHARGE,
        precharge,
        SET_CONTRAST,
        contrast,
        SET_VCOM_DETECT,
        comdetect,
        DISPLAY_ALL_ON_RESUME,
        NORMAL_DISPLAY,
        DISPLAY_ON,
    ]
}

/// Contrast, precharge and VCOMH levels for a brightness in `0..=255`.
///
/// Contrast follows a two-piece linear curve that reaches 255 at full
/// brightness; precharge drops to 0 when the brightness is 0 so the panel
/// goes fully dark.
pub fn brightness_levels(brightness: u8) -> (u8, u8, u8) {
    let b = f32::from(brightness);
    let contrast = if brightness < 128 {
        b * 1.171
    } else {
        b * 1.171 - 43.0
    };
    let precharge = if brightness == 0 { 0 } else { PRECHARGE_DEFAULT };
    // Float-to-int `as` truncates, and saturates at 255 for the top step.
    (contrast as u8, precharge, brightness / 8)
}

pub const RESET_ORIENTATION: [u8; 2] = [SEG_REMAP, COM_SCAN_INC];
pub const FLIP_VERTICAL: [u8; 2] = [SEG_REMAP | 0x01, COM_SCAN_DEC];
pub const MIRROR: [u8; 2] = [SEG_REMAP, COM_SCAN_DEC];

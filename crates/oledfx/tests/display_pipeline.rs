use std::fmt::Write as _;

use oledfx::{Display, DisplayConfig, Draw, Font, Geometry, Headless, TextAlignment};
use oledfx_text::FontBuilder;

/// 8px font from ' ' to '~': a 3px blank space and solid 5px glyphs.
fn font_blob() -> Vec<u8> {
    FontBuilder::new(8, b' ').blank(3).solid_run(94, 5).build()
}

fn lit_rows(display: &Display<'_, &mut Headless>, x: i32) -> Vec<i32> {
    let fb = display.frame().unwrap();
    (0..i32::from(fb.height())).filter(|&y| fb.pixel(x, y)).collect()
}

#[test]
fn scroll_log_keeps_the_newest_lines_on_screen() {
    let blob = font_blob();
    let mut bus = Headless::new();
    let mut display = Display::new(&mut bus, DisplayConfig::new(Geometry::W128H64));
    display.init().unwrap();
    display.set_font(Font::parse(&blob).unwrap());

    for n in 1..=9 {
        writeln!(display, "line{n}").unwrap();
    }

    let log = display.scroll_log().unwrap();
    assert_eq!(log.max_lines(), 8);
    assert_eq!(log.line_count(), 8);
    let first = log.lines().next().unwrap();
    assert_eq!(first, b"line2");

    // Eight 8px lines fill the 64px panel exactly, so nothing is shifted.
    assert_eq!(lit_rows(&display, 0), (0..64).collect::<Vec<_>>());
    drop(display);

    // The blank frame from init, then one per `writeln!`.
    assert_eq!(bus.frames().len(), 10);
    assert!(bus.last_pixels().unwrap().iter().any(|&b| b != 0));
}

#[test]
fn scroll_log_on_short_panel_shifts_partial_line_off_the_top() {
    let blob = FontBuilder::new(10, b' ').blank(3).solid_run(94, 5).build();
    let mut bus = Headless::new();
    let mut display = Display::new(&mut bus, DisplayConfig::new(Geometry::W64H32));
    display.init().unwrap();
    display.set_font(Font::parse(&blob).unwrap());

    display.write_bytes(b"a\nb\nc\n").unwrap();
    assert_eq!(display.scroll_log().unwrap().line_count(), 3);
    assert_eq!(lit_rows(&display, 0), (0..30).collect::<Vec<_>>());

    // Fourth line fills every slot: (10 - 32 % 10) % 10 = 8px shift.
    display.write_bytes(b"d\n").unwrap();
    assert_eq!(lit_rows(&display, 0), (0..32).collect::<Vec<_>>());
}

#[test]
fn log_rendering_ignores_text_alignment() {
    let blob = font_blob();
    let mut bus = Headless::new();
    let mut display = Display::new(&mut bus, DisplayConfig::new(Geometry::W128H32));
    display.init().unwrap();
    display.set_font(Font::parse(&blob).unwrap());
    display.set_text_alignment(TextAlignment::Center);

    display.write_bytes(b"x").unwrap();
    assert!(display.frame().unwrap().pixel(0, 0));
    assert_eq!(display.text_alignment(), TextAlignment::Center);
}

#[test]
fn wrapped_text_reports_vertical_overflow() {
    let blob = font_blob();
    let mut bus = Headless::new();
    let mut display = Display::new(&mut bus, DisplayConfig::new(Geometry::W128H32));
    display.init().unwrap();
    display.set_font(Font::parse(&blob).unwrap());

    assert_eq!(display.draw_string_max_width(0, 0, 128, "fits"), 0);

    display.clear();
    let long = "word ".repeat(30);
    let first = display.draw_string_max_width(0, 0, 40, &long);
    assert!(first > 0 && first <= 10, "first line length {first}");
    assert!(display.frame().unwrap().pixel(0, 31));
}

#[test]
fn shapes_and_text_share_one_frame() {
    let blob = font_blob();
    let mut bus = Headless::new();
    let mut display = Display::new(&mut bus, DisplayConfig::new(Geometry::W128H64));
    display.init().unwrap();
    display.set_font(Font::parse(&blob).unwrap());

    display.frame_mut().unwrap().draw_rect(0, 0, 128, 64);
    assert_eq!(display.draw_string(10, 10, "ok"), 2);
    display.display().unwrap();
    drop(display);

    let pixels = bus.last_pixels().unwrap();
    // Top-left corner of the border, and text in page 1 at column 10.
    assert_eq!(pixels[0], 0xFF);
    assert_ne!(pixels[128 + 10], 0);
}

#[test]
fn cls_then_write_starts_at_the_top() {
    let blob = font_blob();
    let mut bus = Headless::new();
    let mut display = Display::new(&mut bus, DisplayConfig::new(Geometry::W128H64));
    display.init().unwrap();
    display.set_font(Font::parse(&blob).unwrap());

    display.write_bytes(b"one\ntwo\nthree").unwrap();
    display.cls().unwrap();
    display.write_bytes(b"z").unwrap();
    assert_eq!(lit_rows(&display, 0), (0..8).collect::<Vec<_>>());
    assert_eq!(display.scroll_log().unwrap().as_bytes(), b"z");
}

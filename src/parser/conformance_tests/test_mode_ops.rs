// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! DECSET/DECRST behavior: alternate screen, visibility, columns, origin,
//! autowrap, and charset shifting.

use pretty_assertions::assert_eq;

use super::feed_new;
use crate::{
    parser::AnsiParser,
    screen::{Pos, Screen},
};

#[test]
fn alt_screen_round_trip() {
    let screen = feed_new(24, 80, "ABC\x1b[?1049hXYZ\x1b[?1049l");
    assert_eq!(screen.row_text(0), "ABC");
    assert_eq!(screen.cursor, Pos { x: 3, y: 0 });
    assert!(!screen.in_alternate_screen());
}

#[test]
fn alt_screen_starts_blank_and_discards_its_contents() {
    let mut screen = Screen::new(24, 80);
    let mut parser = AnsiParser::new();
    parser.feed(&mut screen, "primary\x1b[?1049h");
    assert!(screen.in_alternate_screen());
    assert_eq!(screen.row_text(0), "");

    parser.feed(&mut screen, "alt contents\x1b[?1049l");
    assert_eq!(screen.row_text(0), "primary");
    // Nothing drawn inside the alternate screen leaks back out.
    assert_eq!(screen.data_buffer.len(), 1);
}

#[test]
fn mode_toggles_are_idempotent() {
    let once = feed_new(24, 80, "\x1b[?2004h");
    let twice = feed_new(24, 80, "\x1b[?2004h\x1b[?2004h");
    assert_eq!(once.mode, twice.mode);
    assert!(twice.bracketed_paste_enabled());

    let off_once = feed_new(24, 80, "\x1b[?2004h\x1b[?2004l");
    let off_twice = feed_new(24, 80, "\x1b[?2004h\x1b[?2004l\x1b[?2004l");
    assert_eq!(off_once.mode, off_twice.mode);
    assert!(!off_twice.bracketed_paste_enabled());
}

#[test]
fn cursor_visibility_follows_dectcem() {
    let screen = feed_new(24, 80, "\x1b[?25l");
    assert!(!screen.show_cursor);
    let screen = feed_new(24, 80, "\x1b[?25l\x1b[?25h");
    assert!(screen.show_cursor);
}

#[test]
fn application_cursor_mode_is_tracked() {
    let screen = feed_new(24, 80, "\x1b[?1h");
    assert!(screen.in_application_mode());
    let screen = feed_new(24, 80, "\x1b[?1h\x1b[?1l");
    assert!(!screen.in_application_mode());
}

#[test]
fn mouse_protocol_flags_are_tracked() {
    let screen = feed_new(24, 80, "\x1b[?1000h\x1b[?1006h");
    assert!(screen.mouse_support_enabled());
    assert!(screen.sgr_mouse_support_enabled());
    assert!(!screen.urxvt_mouse_support_enabled());
}

#[test]
fn deccolm_switches_width_and_clears() {
    let screen = feed_new(24, 80, "wide\x1b[?3h");
    assert_eq!(screen.columns, 132);
    assert_eq!(screen.cursor, Pos { x: 0, y: 0 });
    assert_eq!(screen.row_text(0), "");

    let screen = feed_new(24, 80, "\x1b[?3h\x1b[?3l");
    assert_eq!(screen.columns, 80);
}

#[test]
fn origin_mode_keeps_the_cursor_in_the_region() {
    let screen = feed_new(24, 80, "\x1b[5;10r\x1b[?6h\x1b[1;1HX");
    // Row 1 is region-relative: absolute row 4.
    assert_eq!(screen.cell(4, 0).grapheme(), "X");
}

#[test]
fn autowrap_can_be_disabled() {
    let screen = feed_new(24, 10, "\x1b[?7l0123456789XYZ");
    assert_eq!(screen.row_text(0), "012345678Z");
    assert_eq!(screen.cursor.y, 0);
}

#[test]
fn line_drawing_charset_via_esc_and_shift() {
    // Designate G0 as graphics: `lqk` becomes a box corner run.
    let screen = feed_new(24, 80, "\x1b(0lqk");
    assert_eq!(screen.row_text(0), "┌─┐");

    // G1 designation + SO/SI shifting.
    let screen = feed_new(24, 80, "\x1b)0ab\x0eqq\x0fab");
    assert_eq!(screen.row_text(0), "ab──ab");
}

#[test]
fn reset_restores_initial_state() {
    let screen = feed_new(24, 80, "hi\x1b[5;10r\x1b[?6h\x1b[31m\x1bc");
    assert_eq!(screen.row_text(0), "");
    assert_eq!(screen.cursor, Pos { x: 0, y: 0 });
    assert_eq!(screen.margins, None);
    assert!(!screen.in_application_mode());
    assert_eq!(screen.current_style(), "");
}

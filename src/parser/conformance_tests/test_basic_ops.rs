// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Plain text, control codes, cursor motion, and character/line editing.

use pretty_assertions::assert_eq;

use super::feed_new;
use crate::{
    parser::{AnsiParser, protocols::CsiSequence},
    screen::{Pos, Screen},
};

#[test]
fn hello_world() {
    let screen = feed_new(24, 80, "Hello\r\nWorld\n");
    assert_eq!(screen.row_text(0), "Hello");
    assert_eq!(screen.row_text(1), "World");
    assert_eq!(screen.cursor, Pos { x: 0, y: 2 });
    assert_eq!(screen.max_y, 2);
}

#[test]
fn chunk_split_equivalence() {
    // The same stream must produce the same screen no matter where it is
    // split, including mid-escape-sequence.
    let input = "ab\x1b[38;2;255;128;0mX\x1b[0m\r\n\x1b[3;5HY字\x1b[1;1Hz";

    let whole = feed_new(24, 80, input);

    for split in 1..input.len() {
        if !input.is_char_boundary(split) {
            continue;
        }
        let mut screen = Screen::new(24, 80);
        let mut parser = AnsiParser::new();
        parser.feed(&mut screen, &input[..split]);
        parser.feed(&mut screen, &input[split..]);

        assert_eq!(screen.data_buffer, whole.data_buffer, "split at {split}");
        assert_eq!(screen.cursor, whole.cursor, "split at {split}");
    }
}

#[test]
fn cursor_motion_sequences() {
    let screen = feed_new(24, 80, "A\x1b[2CB\x1b[1AD");
    // 'A' at (0,0); forward 2; 'B' at (3,0); up is clamped at row 0; 'D'.
    assert_eq!(screen.cell(0, 0).grapheme(), "A");
    assert_eq!(screen.cell(0, 3).grapheme(), "B");
    assert_eq!(screen.cell(0, 4).grapheme(), "D");
    assert_eq!(screen.cursor, Pos { x: 5, y: 0 });
}

#[test]
fn absolute_positioning() {
    let screen = feed_new(24, 80, "Start\x1b[2;3HMid\x1b[1;1HHome\x1b[4dV");
    assert_eq!(screen.row_text(0), "Homet");
    assert_eq!(screen.cell(1, 2).grapheme(), "M");
    // VPA row 4, column preserved from after "Home".
    assert_eq!(screen.cell(3, 4).grapheme(), "V");
}

#[test]
fn backspace_and_tab() {
    let screen = feed_new(24, 80, "ab\x08X\tY");
    assert_eq!(screen.row_text(0), "aX      Y");
    assert_eq!(screen.cursor.x, 9);
}

#[test]
fn carriage_return_overwrites() {
    let screen = feed_new(24, 80, "12345\rab");
    assert_eq!(screen.row_text(0), "ab345");
}

#[test]
fn insert_and_delete_characters() {
    let input = format!("abcdef\x1b[1;2H{}", CsiSequence::DeleteChar(2));
    let screen = feed_new(24, 80, &input);
    assert_eq!(screen.row_text(0), "adef");

    let input = format!("abc\x1b[1;1H{}", CsiSequence::InsertChar(2));
    let screen = feed_new(24, 80, &input);
    assert_eq!(screen.row_text(0), "  abc");
}

#[test]
fn erase_characters_blank_in_place() {
    let input = format!("abcdef\x1b[1;2H{}", CsiSequence::EraseChar(3));
    let screen = feed_new(24, 80, &input);
    assert_eq!(screen.row_text(0), "a   ef");
}

#[test]
fn insert_and_delete_lines() {
    let input = format!(
        "one\r\ntwo\r\nthree\x1b[2;1H{}",
        CsiSequence::InsertLine(1)
    );
    let screen = feed_new(24, 80, &input);
    assert_eq!(screen.row_text(0), "one");
    assert_eq!(screen.row_text(1), "");
    assert_eq!(screen.row_text(2), "two");
    assert_eq!(screen.row_text(3), "three");

    let input = format!(
        "one\r\ntwo\r\nthree\x1b[1;1H{}",
        CsiSequence::DeleteLine(1)
    );
    let screen = feed_new(24, 80, &input);
    assert_eq!(screen.row_text(0), "two");
    assert_eq!(screen.row_text(1), "three");
    assert_eq!(screen.row_text(2), "");
}

#[test]
fn erase_display_and_line() {
    let screen = feed_new(24, 80, "aaa\r\nbbb\r\nccc\x1b[2;2H\x1b[J");
    assert_eq!(screen.row_text(0), "aaa");
    assert_eq!(screen.row_text(1), "b");
    assert_eq!(screen.row_text(2), "");

    let screen = feed_new(24, 80, "abcdef\x1b[1;4H\x1b[1K");
    assert_eq!(screen.row_text(0), "    ef");

    let screen = feed_new(24, 80, "aaa\r\nbbb\x1b[2J");
    assert_eq!(screen.row_text(0), "");
    assert_eq!(screen.row_text(1), "");
}

#[test]
fn alignment_display_fills_with_e() {
    let screen = feed_new(3, 5, "\x1b#8");
    assert_eq!(screen.viewport_text(), vec!["EEEEE", "EEEEE", "EEEEE"]);
}

#[test]
fn wide_and_combining_text() {
    let screen = feed_new(24, 80, "日本e\u{0301}");
    assert_eq!(screen.cell(0, 0).grapheme(), "日");
    assert!(screen.cell(0, 1).is_sentinel());
    assert_eq!(screen.cell(0, 2).grapheme(), "本");
    assert_eq!(screen.cell(0, 4).grapheme(), "e\u{0301}");
    assert_eq!(screen.cursor.x, 5);
}

#[test]
fn cursor_bounds_hold_for_hostile_motion() {
    let screen = feed_new(24, 80, "\x1b[999;999H\x1b[500C\x1b[500B\x1b[999A\x1b[999D");
    assert!(screen.cursor.x < 80);
    assert_eq!(screen.cursor, Pos { x: 0, y: 0 });
}

#[test]
fn malformed_sequences_are_swallowed() {
    // Unknown CSI final, unknown ESC final, and a stray DCS string: none may
    // disturb the text around them.
    let screen = feed_new(24, 80, "ok\x1b[12;34z\x1b_ignored\x1b\\\x1bP1;2qdata\x1b\\!");
    assert_eq!(screen.row_text(0), "ok!");
}

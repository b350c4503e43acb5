// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Scroll regions, scrollback, and resize/reflow driven through the parser.

use pretty_assertions::assert_eq;

use super::feed_new;
use crate::{
    parser::AnsiParser,
    screen::{Margins, Screen},
};

#[test]
fn autowrap_then_reflow_to_wider() {
    let mut screen = Screen::new(5, 10);
    let mut parser = AnsiParser::new();
    parser.feed(&mut screen, &"A".repeat(25));

    assert_eq!(screen.row_text(0), "A".repeat(10));
    assert_eq!(screen.row_text(1), "A".repeat(10));
    assert_eq!(screen.row_text(2), "A".repeat(5));
    let wrapped: Vec<usize> = screen.wrapped_lines.iter().copied().collect();
    assert_eq!(wrapped, vec![1, 2]);

    screen.resize(5, 25);
    assert_eq!(screen.row_text(0), "A".repeat(25));
    assert!(screen.wrapped_lines.is_empty());
}

#[test]
fn reflow_keeps_the_cursor_grapheme() {
    let mut screen = Screen::new(5, 10);
    let mut parser = AnsiParser::new();
    parser.feed(&mut screen, "0123456789abcde\x1b[2;3H");
    let before = screen.cell(screen.cursor.y, screen.cursor.x).text.clone();

    screen.resize(5, 7);
    let after = screen.cell(screen.cursor.y, screen.cursor.x).text.clone();
    assert_eq!(before, after);
}

#[test]
fn margins_scroll_like_a_pager_status_line() {
    // Classic layout: content scrolls in rows 1..=3 while row 4 stays put.
    let mut screen = Screen::new(5, 20);
    let mut parser = AnsiParser::new();
    parser.feed(&mut screen, "\x1b[5;5HSTATUS\x1b[1;4r\x1b[1;1H");
    assert_eq!(screen.margins, Some(Margins { top: 0, bottom: 3 }));

    parser.feed(&mut screen, "l1\r\nl2\r\nl3\r\nl4\r\nl5\r\nl6");
    // Four content rows: the last four lines; the status row is untouched.
    assert_eq!(screen.row_text(0), "l3");
    assert_eq!(screen.row_text(1), "l4");
    assert_eq!(screen.row_text(2), "l5");
    assert_eq!(screen.row_text(3), "l6");
    assert!(screen.row_text(4).contains("STATUS"));
}

#[test]
fn reverse_index_scrolls_down_at_the_top() {
    let screen = feed_new(5, 20, "aaa\r\nbbb\x1b[1;1H\x1bMnew");
    assert_eq!(screen.row_text(0), "new");
    assert_eq!(screen.row_text(1), "aaa");
    assert_eq!(screen.row_text(2), "bbb");
}

#[test]
fn scroll_up_and_down_sequences() {
    let screen = feed_new(3, 20, "aaa\r\nbbb\r\nccc\x1b[1S");
    assert_eq!(screen.row_text(0), "bbb");
    assert_eq!(screen.row_text(1), "ccc");
    assert_eq!(screen.row_text(2), "");

    let screen = feed_new(3, 20, "aaa\r\nbbb\r\nccc\x1b[1;1H\x1b[1T");
    assert_eq!(screen.row_text(0), "");
    assert_eq!(screen.row_text(1), "aaa");
    assert_eq!(screen.row_text(2), "bbb");
}

#[test]
fn scrollback_is_bounded() {
    let mut screen = Screen::new(4, 20).with_history_limit(100);
    let mut parser = AnsiParser::new();
    for i in 0..1000 {
        parser.feed(&mut screen, &format!("line {i}\r\n"));
    }
    let oldest = *screen.data_buffer.keys().next().unwrap();
    // Amortized eviction: at most history_limit plus one cleanup interval
    // of slack.
    assert!(screen.cursor.y - oldest <= 200);
    // The most recent output is intact.
    assert_eq!(screen.row_text(999), "line 999");
}

#[test]
fn erase_display_three_clears_scrollback() {
    let mut screen = Screen::new(3, 20);
    let mut parser = AnsiParser::new();
    for i in 0..10 {
        parser.feed(&mut screen, &format!("{i}\r\n"));
    }
    parser.feed(&mut screen, "\x1b[3J");
    assert!(screen.data_buffer.is_empty());
    assert_eq!(screen.cursor.y, 0);
    assert_eq!(screen.max_y, 0);
}

#[test]
fn resize_notifies_nothing_but_state() {
    // Resize clears margins and keeps tab stops.
    let mut screen = feed_new(10, 80, "\x1b[2;5r");
    assert!(screen.margins.is_some());
    screen.resize(12, 90);
    assert_eq!(screen.margins, None);
    assert!(screen.tabstops.contains(&88));
}

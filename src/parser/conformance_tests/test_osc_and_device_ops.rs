// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! OSC strings, device reports, and the screen event queue.

use pretty_assertions::assert_eq;

use crate::{
    parser::AnsiParser,
    screen::{Screen, ScreenEvent},
};

fn feed_and_drain(input: &str) -> (Screen, Vec<ScreenEvent>) {
    let mut screen = Screen::new(24, 80);
    let mut parser = AnsiParser::new();
    parser.feed(&mut screen, input);
    let events = screen.take_events();
    (screen, events)
}

#[test]
fn osc_zero_sets_title_and_icon_bel_terminated() {
    let (screen, events) = feed_and_drain("\x1b]0;vim - main.rs\x07");
    assert_eq!(screen.title, "vim - main.rs");
    assert_eq!(screen.icon_name, "vim - main.rs");
    assert!(events.contains(&ScreenEvent::TitleChanged("vim - main.rs".into())));
}

#[test]
fn osc_two_sets_title_st_terminated() {
    let (screen, _) = feed_and_drain("\x1b]2;status\x1b\\after");
    assert_eq!(screen.title, "status");
    assert_eq!(screen.icon_name, "");
    assert_eq!(screen.row_text(0), "after");
}

#[test]
fn osc_one_sets_only_the_icon_name() {
    let (screen, _) = feed_and_drain("\x1b]1;icon\x07");
    assert_eq!(screen.icon_name, "icon");
    assert_eq!(screen.title, "");
}

#[test]
fn osc_eight_emits_a_hyperlink_event() {
    let (_, events) = feed_and_drain("\x1b]8;;https://example.com\x07link\x1b]8;;\x07");
    assert_eq!(
        events,
        vec![ScreenEvent::Hyperlink { uri: "https://example.com".into() }]
    );
}

#[test]
fn dsr_six_queues_a_cursor_report() {
    let (_, events) = feed_and_drain("\x1b[3;7H\x1b[6n");
    assert_eq!(events, vec![ScreenEvent::Response("\x1b[3;7R".into())]);
}

#[test]
fn dsr_five_reports_ok() {
    let (_, events) = feed_and_drain("\x1b[5n");
    assert_eq!(events, vec![ScreenEvent::Response("\x1b[0n".into())]);
}

#[test]
fn device_attributes_response() {
    let (_, events) = feed_and_drain("\x1b[c");
    assert_eq!(events, vec![ScreenEvent::Response("\x1b[>84;0;0c".into())]);
}

#[test]
fn bell_is_a_single_event() {
    let (_, events) = feed_and_drain("a\x07b");
    assert_eq!(events, vec![ScreenEvent::Bell]);
}

#[test]
fn tab_stop_sequences() {
    // HTS at column 3, clear all default stops first.
    let mut screen = Screen::new(24, 80);
    let mut parser = AnsiParser::new();
    parser.feed(&mut screen, "\x1b[3gab\x1bH\rX\tY");
    // Stop set at column 2 (after "ab"); tab from column 1 lands there.
    assert_eq!(screen.row_text(0), "XbY");
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! SGR styling through the parser, including extended colors and the
//! DECSC/DECRC attribute round trip.

use pretty_assertions::assert_eq;

use super::feed_new;

#[test]
fn truecolor_foreground() {
    let screen = feed_new(24, 80, "\x1b[38;2;255;128;0mX\x1b[0mY");
    let styled = screen.cell(0, 0);
    assert!(styled.style.contains("#ff8000"));
    assert!(!styled.style.contains("bold"));
    let plain = screen.cell(0, 1);
    assert_eq!(&*plain.style, "");
}

#[test]
fn colon_separated_truecolor() {
    let screen = feed_new(24, 80, "\x1b[38:2:255:128:0mX");
    assert!(screen.cell(0, 0).style.contains("#ff8000"));
}

#[test]
fn indexed_256_colors() {
    let screen = feed_new(24, 80, "\x1b[38;5;196m\x1b[48;5;232mX");
    let cell = screen.cell(0, 0);
    assert!(cell.style.contains("#ff0000"));
    assert!(cell.style.contains("bg:#080808"));
}

#[test]
fn basic_and_bright_colors() {
    let screen = feed_new(24, 80, "\x1b[31mr\x1b[91mb\x1b[44mg");
    assert!(screen.cell(0, 0).style.contains("#800000"));
    assert!(screen.cell(0, 1).style.contains("#ff0000"));
    let both = screen.cell(0, 2);
    assert!(both.style.contains("#ff0000"));
    assert!(both.style.contains("bg:#000080"));
}

#[test]
fn attribute_flags_accumulate_and_reset() {
    let screen = feed_new(24, 80, "\x1b[1;4;7mX\x1b[27mY\x1b[mZ");
    let x = screen.cell(0, 0);
    assert!(x.style.contains("bold"));
    assert!(x.style.contains("underline"));
    assert!(x.style.contains("reverse"));
    let y = screen.cell(0, 1);
    assert!(y.style.contains("bold"));
    assert!(!y.style.contains("reverse"));
    assert_eq!(&*screen.cell(0, 2).style, "");
}

#[test]
fn styles_are_interned_per_screen() {
    let screen = feed_new(24, 80, "\x1b[1mAB");
    let a = screen.cell(0, 0);
    let b = screen.cell(0, 1);
    assert!(std::sync::Arc::ptr_eq(&a.style, &b.style));
}

#[test]
fn savepoint_round_trip_via_sequences() {
    let screen = feed_new(
        24,
        80,
        "\x1b[5;5H\x1b[1;38;2;255;128;0m\x1b7\x1b[15;20H\x1b[0m\x1b8X",
    );
    // DECRC restored position (5,5) and the bold orange attributes.
    let cell = screen.cell(4, 4);
    assert_eq!(cell.grapheme(), "X");
    assert!(cell.style.contains("#ff8000"));
    assert!(cell.style.contains("bold"));
}

#[test]
fn csi_save_restore_twins() {
    let screen = feed_new(24, 80, "\x1b[3;3H\x1b[s\x1b[10;10H\x1b[uX");
    assert_eq!(screen.cell(2, 2).grapheme(), "X");
}

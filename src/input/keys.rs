// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Abstract key -> VT100 input byte translation.
//!
//! A pure mapping: the host's key decoder produces a [`TerminalKey`], and
//! [`key_to_bytes`] renders the byte sequence the child process expects.
//! Arrow and Home/End keys are mode-aware:
//!
//! | Key  | Normal (CSI) | Application (SS3) |
//! |------|--------------|-------------------|
//! | Up   | `ESC [ A`    | `ESC O A`         |
//! | Down | `ESC [ B`    | `ESC O B`         |
//! | Home | `ESC [ H`    | `ESC O H`         |
//!
//! Applications toggle the mode with DECCKM (`CSI ? 1 h/l`); the process
//! driver reads the current mode off the screen when a key is written.
//! Printable characters pass through as UTF-8; unknown function keys map to
//! nothing at all.

use std::borrow::Cow;

/// Cursor key encoding selected by DECCKM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorKeyMode {
    /// ANSI encoding: `ESC [` prefix.
    #[default]
    Normal,
    /// SS3 encoding: `ESC O` prefix.
    Application,
}

/// Abstract key identifiers the translator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKey {
    Char(char),
    Enter,
    Tab,
    BackTab,
    Backspace,
    Escape,
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    /// F1..=F12; anything else maps to empty.
    F(u8),
}

/// Translate a key press into the bytes to write to the child's stdin.
#[must_use]
pub fn key_to_bytes(key: TerminalKey, mode: CursorKeyMode) -> Cow<'static, [u8]> {
    use CursorKeyMode::{Application, Normal};

    match key {
        TerminalKey::Char(ch) => {
            let mut buf = [0u8; 4];
            Cow::Owned(ch.encode_utf8(&mut buf).as_bytes().to_vec())
        }
        TerminalKey::Enter => Cow::Borrowed(b"\r"),
        TerminalKey::Tab => Cow::Borrowed(b"\t"),
        TerminalKey::BackTab => Cow::Borrowed(b"\x1b[Z"),
        TerminalKey::Backspace => Cow::Borrowed(b"\x7f"),
        TerminalKey::Escape => Cow::Borrowed(b"\x1b"),

        TerminalKey::Up => match mode {
            Normal => Cow::Borrowed(b"\x1b[A"),
            Application => Cow::Borrowed(b"\x1bOA"),
        },
        TerminalKey::Down => match mode {
            Normal => Cow::Borrowed(b"\x1b[B"),
            Application => Cow::Borrowed(b"\x1bOB"),
        },
        TerminalKey::Right => match mode {
            Normal => Cow::Borrowed(b"\x1b[C"),
            Application => Cow::Borrowed(b"\x1bOC"),
        },
        TerminalKey::Left => match mode {
            Normal => Cow::Borrowed(b"\x1b[D"),
            Application => Cow::Borrowed(b"\x1bOD"),
        },
        TerminalKey::Home => match mode {
            Normal => Cow::Borrowed(b"\x1b[H"),
            Application => Cow::Borrowed(b"\x1bOH"),
        },
        TerminalKey::End => match mode {
            Normal => Cow::Borrowed(b"\x1b[F"),
            Application => Cow::Borrowed(b"\x1bOF"),
        },

        TerminalKey::PageUp => Cow::Borrowed(b"\x1b[5~"),
        TerminalKey::PageDown => Cow::Borrowed(b"\x1b[6~"),
        TerminalKey::Insert => Cow::Borrowed(b"\x1b[2~"),
        TerminalKey::Delete => Cow::Borrowed(b"\x1b[3~"),

        // xterm function keys: SS3 for F1-F4, `CSI n ~` beyond.
        TerminalKey::F(n) => match n {
            1 => Cow::Borrowed(b"\x1bOP"),
            2 => Cow::Borrowed(b"\x1bOQ"),
            3 => Cow::Borrowed(b"\x1bOR"),
            4 => Cow::Borrowed(b"\x1bOS"),
            5 => Cow::Borrowed(b"\x1b[15~"),
            6 => Cow::Borrowed(b"\x1b[17~"),
            7 => Cow::Borrowed(b"\x1b[18~"),
            8 => Cow::Borrowed(b"\x1b[19~"),
            9 => Cow::Borrowed(b"\x1b[20~"),
            10 => Cow::Borrowed(b"\x1b[21~"),
            11 => Cow::Borrowed(b"\x1b[23~"),
            12 => Cow::Borrowed(b"\x1b[24~"),
            _ => Cow::Borrowed(b""),
        },
    }
}

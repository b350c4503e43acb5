// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! End-to-end conformance tests: raw byte streams through the parser into a
//! screen, asserting on observable screen state.

mod test_basic_ops;
mod test_mode_ops;
mod test_osc_and_device_ops;
mod test_scroll_and_reflow;
mod test_sgr_ops;

use crate::{parser::AnsiParser, screen::Screen};

/// Build a screen and feed it one stream.
pub(crate) fn feed_new(lines: usize, columns: usize, input: &str) -> Screen {
    let mut screen = Screen::new(lines, columns);
    let mut parser = AnsiParser::new();
    parser.feed(&mut screen, input);
    screen
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! In-memory terminal state.
//!
//! [`Screen`] models what a physical terminal of `lines` x `columns` cells
//! would be displaying, plus unbounded-downward scrollback. The stream parser
//! drives it through the semantic operations defined across this module's
//! files:
//!
//! - [`cursor_ops`]: motion, bounds clamping, DECSC/DECRC savepoints
//! - [`char_ops`]: drawing, ICH/DCH/ECH, EL/ED, DECALN
//! - [`line_ops`]: IL/DL
//! - [`scroll_ops`]: IND/RI/NEL, linefeed, SU/SD, history eviction
//! - [`mode_ops`]: SM/RM incl. the alternate screen, charset designation
//! - [`sgr_ops`]: SGR attribute and color handling
//! - [`tab_ops`]: HT, HTS, TBC
//! - [`device_ops`]: BEL, DSR, DA, title/icon, hyperlinks
//! - [`reflow`]: resize and logical-line rewrapping
//!
//! # Coordinates
//!
//! Rows are absolute: row 0 is the first row ever written and indexes grow
//! without bound as output scrolls. The visible window starts at
//! [`Screen::line_offset`]. `max_y` tracks the largest row ever written and,
//! with `lines`, determines the viewport.
//!
//! # Storage
//!
//! The grid is a sparse mapping `row index -> (column index -> Cell)`. After
//! a long session, live rows sit far from row 0 with everything above the
//! history limit evicted; sparse rows keep that cheap. Absent cells read as
//! unstyled spaces.

pub mod char_ops;
pub mod cursor_ops;
pub mod device_ops;
pub mod line_ops;
pub mod mode_ops;
pub mod reflow;
pub mod scroll_ops;
pub mod sgr_ops;
pub mod tab_ops;

use std::collections::{BTreeMap, BTreeSet};

use crate::core::{
    Cell, CharsetTable, ModeSet,
    modes::{BRACKETED_PASTE, DECAWM_AUTO_WRAP, DECCKM_APPLICATION_CURSOR,
            DECSCNM_REVERSE_VIDEO, DECTCEM_SHOW_CURSOR, LNM_NEWLINE, MOUSE_REPORT_SGR,
            MOUSE_REPORT_URXVT, MOUSE_REPORT_X10},
    style::{Attrs, StyleHandle, StyleInterner},
};

/// Scrollback retention when the host does not configure one.
pub const DEFAULT_HISTORY_LIMIT: usize = 2000;

/// Tab stops are pre-seeded every this many columns...
pub const TAB_STOP_INTERVAL: usize = 8;
/// ...up to this column, so stops survive a later widening of the screen.
pub const TAB_STOP_LIMIT: usize = 1000;

/// How many `index` calls may pass between scrollback eviction sweeps.
pub(crate) const HISTORY_CLEANUP_INTERVAL: u32 = 100;

/// One sparse row: column index -> cell.
pub type SparseRow = BTreeMap<usize, Cell>;
/// The sparse grid: row index -> row.
pub type SparseBuffer = BTreeMap<usize, SparseRow>;

/// Mutable cursor position in absolute grid coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

/// An explicit scroll region, both rows inclusive, 0-based,
/// viewport-relative. `None` on the screen means the full screen scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: usize,
    pub bottom: usize,
}

/// Frozen cursor context pushed by DECSC and popped by DECRC.
#[derive(Debug, Clone)]
pub(crate) struct Savepoint {
    pub cursor: Pos,
    pub g0_charset: CharsetTable,
    pub g1_charset: CharsetTable,
    pub charset: usize,
    pub origin: bool,
    pub autowrap: bool,
    pub attrs: Attrs,
    pub style: StyleHandle,
}

/// Everything swapped out when entering the alternate screen and restored on
/// exit.
#[derive(Debug)]
pub(crate) struct AltScreenBackup {
    pub mode: ModeSet,
    pub margins: Option<Margins>,
    pub charset: usize,
    pub g0_charset: CharsetTable,
    pub g1_charset: CharsetTable,
    pub tabstops: BTreeSet<usize>,
    pub data_buffer: SparseBuffer,
    pub cursor: Pos,
    pub max_y: usize,
    pub wrapped_lines: BTreeSet<usize>,
    pub show_cursor: bool,
}

/// Host-visible side effects queued by screen operations and drained by the
/// process driver after each feed. The screen itself never talks to the
/// backend; `Response` payloads are what must reach the child's stdin
/// (DSR / DA replies).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    Bell,
    TitleChanged(String),
    IconNameChanged(String),
    Hyperlink { uri: String },
    Response(String),
}

/// The terminal screen state machine.
#[derive(Debug)]
pub struct Screen {
    /// Visible height in rows. Single source of truth for the viewport.
    pub lines: usize,
    /// Visible width in columns.
    pub columns: usize,
    /// Sparse cell grid, scrollback included.
    pub data_buffer: SparseBuffer,
    /// Cursor in absolute grid coordinates.
    pub cursor: Pos,
    /// Largest row index ever written.
    pub max_y: usize,
    /// DECTCEM state, for the renderer.
    pub show_cursor: bool,
    /// Rows that were started by autowrap rather than an explicit linefeed.
    pub wrapped_lines: BTreeSet<usize>,
    /// Active mode flags (see [`crate::core::modes`] for the encoding).
    pub mode: ModeSet,
    /// DECSTBM scroll region, if any.
    pub margins: Option<Margins>,
    /// Horizontal tab stops.
    pub tabstops: BTreeSet<usize>,
    /// Window title from OSC 0/2.
    pub title: String,
    /// Icon name from OSC 0/1.
    pub icon_name: String,
    /// Scrollback retention cap.
    pub history_limit: usize,

    pub(crate) charset: usize,
    pub(crate) g0_charset: CharsetTable,
    pub(crate) g1_charset: CharsetTable,
    pub(crate) attrs: Attrs,
    pub(crate) style: StyleHandle,
    pub(crate) styles: StyleInterner,
    pub(crate) savepoints: Vec<Savepoint>,
    pub(crate) alt_screen_backup: Option<AltScreenBackup>,
    pub(crate) history_cleanup_counter: u32,
    pending_events: Vec<ScreenEvent>,
}

impl Screen {
    #[must_use]
    pub fn new(lines: usize, columns: usize) -> Self {
        let styles = StyleInterner::default();
        let style = styles.empty();
        let mut screen = Screen {
            lines,
            columns,
            data_buffer: SparseBuffer::new(),
            cursor: Pos::default(),
            max_y: 0,
            show_cursor: true,
            wrapped_lines: BTreeSet::new(),
            mode: ModeSet::new(),
            margins: None,
            tabstops: BTreeSet::new(),
            title: String::new(),
            icon_name: String::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            charset: 0,
            g0_charset: CharsetTable::Latin1,
            g1_charset: CharsetTable::Vt100Graphics,
            attrs: Attrs::default(),
            style,
            styles,
            savepoints: Vec::new(),
            alt_screen_backup: None,
            history_cleanup_counter: 0,
            pending_events: Vec::new(),
        };
        screen.reset();
        screen
    }

    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Reset the terminal to its initial state (RIS, `ESC c`).
    ///
    /// Clears the grid, homes the cursor, re-seeds tab stops, and restores
    /// the default mode flags (autowrap on, cursor visible). Terminal modes
    /// and tab stops are reset too; neither the VT220 nor the VT102 manual
    /// says so, but xterm does it.
    pub fn reset(&mut self) {
        self.reset_screen_state();

        self.title.clear();
        self.icon_name.clear();

        self.mode.clear();
        self.mode.insert(DECAWM_AUTO_WRAP);
        self.mode.insert(DECTCEM_SHOW_CURSOR);
        // Bare `\n` goes to the start of the next line. Children that want
        // index-only linefeeds reset LNM explicitly.
        self.mode.insert(LNM_NEWLINE);

        // G0 Latin-1, G1 line drawing, G0 active. Latin-1 over CP437 as the
        // default: accented characters must pass through untranslated.
        self.charset = 0;
        self.g0_charset = CharsetTable::Latin1;
        self.g1_charset = CharsetTable::Vt100Graphics;

        self.tabstops = (TAB_STOP_INTERVAL..TAB_STOP_LIMIT)
            .step_by(TAB_STOP_INTERVAL)
            .collect();

        self.alt_screen_backup = None;
    }

    /// Reset grid-level state. Also called when switching to or from the
    /// alternate screen buffer.
    pub(crate) fn reset_screen_state(&mut self) {
        self.data_buffer = SparseBuffer::new();
        self.cursor = Pos::default();
        self.wrapped_lines = BTreeSet::new();
        self.attrs = Attrs::default();
        self.style = self.styles.empty();
        self.margins = None;
        self.max_y = 0;
        self.show_cursor = true;
    }

    /// Index of the first visible row.
    ///
    /// `max_y` counts from 0 while `lines` counts from 1: with `max_y == 14`
    /// and `lines == 15` exactly the rows `0..=14` are in use and the offset
    /// is 0.
    #[must_use]
    pub fn line_offset(&self) -> usize {
        let slack = self.max_y as isize - self.lines as isize + 1;
        (self.cursor.y as isize).min(slack).max(0) as usize
    }

    /// The cell at an absolute position; absent cells read as unstyled
    /// spaces.
    #[must_use]
    pub fn cell(&self, y: usize, x: usize) -> Cell {
        self.data_buffer
            .get(&y)
            .and_then(|row| row.get(&x))
            .cloned()
            .unwrap_or_default()
    }

    /// The text of one absolute row, trailing blanks stripped. Wide-cell
    /// sentinels contribute nothing. Intended for tests and simple hosts; a
    /// real renderer walks `data_buffer` directly.
    #[must_use]
    pub fn row_text(&self, y: usize) -> String {
        let Some(row) = self.data_buffer.get(&y) else {
            return String::new();
        };
        let Some(&last) = row.keys().next_back() else {
            return String::new();
        };
        let mut out = String::new();
        for x in 0..=last {
            match row.get(&x) {
                Some(cell) => out.push_str(cell.grapheme()),
                None => out.push(' '),
            }
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// The visible rows, top to bottom.
    #[must_use]
    pub fn viewport_text(&self) -> Vec<String> {
        let offset = self.line_offset();
        (offset..offset + self.lines).map(|y| self.row_text(y)).collect()
    }

    // Mode queries used by the driver and host.

    /// True when the application switched the cursor keys to application
    /// mode (arrows must be sent as SS3 sequences).
    #[must_use]
    pub fn in_application_mode(&self) -> bool { self.mode.contains(DECCKM_APPLICATION_CURSOR) }

    #[must_use]
    pub fn mouse_support_enabled(&self) -> bool { self.mode.contains(MOUSE_REPORT_X10) }

    #[must_use]
    pub fn urxvt_mouse_support_enabled(&self) -> bool { self.mode.contains(MOUSE_REPORT_URXVT) }

    #[must_use]
    pub fn sgr_mouse_support_enabled(&self) -> bool { self.mode.contains(MOUSE_REPORT_SGR) }

    #[must_use]
    pub fn bracketed_paste_enabled(&self) -> bool { self.mode.contains(BRACKETED_PASTE) }

    /// The whole screen is set to reverse video (DECSCNM).
    #[must_use]
    pub fn has_reverse_video(&self) -> bool { self.mode.contains(DECSCNM_REVERSE_VIDEO) }

    #[must_use]
    pub fn in_alternate_screen(&self) -> bool { self.alt_screen_backup.is_some() }

    /// The style string currently selected by SGR state.
    #[must_use]
    pub fn current_style(&self) -> &str { &self.style }

    pub(crate) fn push_event(&mut self, event: ScreenEvent) { self.pending_events.push(event); }

    /// Drain the side effects queued since the last call.
    pub fn take_events(&mut self) -> Vec<ScreenEvent> { std::mem::take(&mut self.pending_events) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_screen_has_default_modes_and_tabstops() {
        let screen = Screen::new(24, 80);
        assert!(screen.mode.contains(DECAWM_AUTO_WRAP));
        assert!(screen.mode.contains(DECTCEM_SHOW_CURSOR));
        assert!(screen.show_cursor);
        assert!(screen.tabstops.contains(&8));
        assert!(screen.tabstops.contains(&992));
        assert!(!screen.tabstops.contains(&0));
        assert_eq!(screen.cursor, Pos { x: 0, y: 0 });
    }

    #[test]
    fn line_offset_tracks_cursor_and_max_y() {
        let mut screen = Screen::new(5, 10);
        assert_eq!(screen.line_offset(), 0);

        // Fill 8 rows; the viewport slides down to keep the cursor visible.
        screen.cursor.y = 7;
        screen.max_y = 7;
        assert_eq!(screen.line_offset(), 3);

        // Cursor above the natural offset pins the viewport to the cursor.
        screen.cursor.y = 1;
        assert_eq!(screen.line_offset(), 1);
    }

    #[test]
    fn absent_cells_read_as_spaces() {
        let screen = Screen::new(24, 80);
        assert_eq!(screen.cell(3, 7).grapheme(), " ");
        assert_eq!(screen.row_text(3), "");
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mode set/reset (SM/RM, DECSET/DECRST), charset designation, margins, and
//! the alternate screen buffer.

use std::mem;

use super::{AltScreenBackup, Margins, Screen};
use crate::core::{
    CharsetTable,
    modes::{ALT_SCREEN_BUFFER, DECCOLM_132_COLUMNS, DECOM_ORIGIN, DECTCEM_SHOW_CURSOR,
            PRIVATE_MODE_SHIFT},
};

impl Screen {
    /// SM / DECSET. `codes` are raw wire codes; `private` marks the `?`
    /// prefix and shifts them into the private range (see
    /// [`crate::core::modes`]).
    pub fn set_mode(&mut self, codes: &[u32], private: bool) {
        let codes: Vec<u32> = if private {
            codes.iter().map(|&code| code << PRIVATE_MODE_SHIFT).collect()
        } else {
            codes.to_vec()
        };

        for &code in &codes {
            self.mode.insert(code);
        }

        // DECCOLM: switch to 132 columns, clear, and home.
        if codes.contains(&DECCOLM_132_COLUMNS) {
            self.resize(self.lines, 132);
            self.erase_in_display(2);
            self.cursor_position(None, None);
        }

        // DECOM homes the cursor too; vttest insists.
        if codes.contains(&DECOM_ORIGIN) {
            self.cursor_position(None, None);
        }

        if codes.contains(&DECTCEM_SHOW_CURSOR) {
            self.show_cursor = true;
        }

        // `?1049h`: enter the alternate screen. A second set while already
        // inside is a no-op, so set-set behaves like set.
        if codes.contains(&ALT_SCREEN_BUFFER) && self.alt_screen_backup.is_none() {
            self.enter_alternate_screen();
        }
    }

    /// RM / DECRST. Mirrors [`Screen::set_mode`].
    pub fn reset_mode(&mut self, codes: &[u32], private: bool) {
        let codes: Vec<u32> = if private {
            codes.iter().map(|&code| code << PRIVATE_MODE_SHIFT).collect()
        } else {
            codes.to_vec()
        };

        for &code in &codes {
            self.mode.remove(code);
        }

        if codes.contains(&DECCOLM_132_COLUMNS) {
            self.resize(self.lines, 80);
            self.erase_in_display(2);
            self.cursor_position(None, None);
        }

        if codes.contains(&DECOM_ORIGIN) {
            self.cursor_position(None, None);
        }

        if codes.contains(&DECTCEM_SHOW_CURSOR) {
            self.show_cursor = false;
        }

        if codes.contains(&ALT_SCREEN_BUFFER) && self.alt_screen_backup.is_some() {
            self.exit_alternate_screen();
        }
    }

    /// Snapshot the primary screen and start fresh. SGR attributes are
    /// deliberately not part of the snapshot: they persist across the switch,
    /// as they do in xterm.
    fn enter_alternate_screen(&mut self) {
        let backup = AltScreenBackup {
            mode: self.mode.clone(),
            margins: self.margins,
            charset: self.charset,
            g0_charset: self.g0_charset,
            g1_charset: self.g1_charset,
            tabstops: self.tabstops.clone(),
            data_buffer: mem::take(&mut self.data_buffer),
            cursor: self.cursor,
            max_y: self.max_y,
            wrapped_lines: mem::take(&mut self.wrapped_lines),
            show_cursor: self.show_cursor,
        };
        self.alt_screen_backup = Some(backup);
        self.reset_screen_state();
    }

    /// Restore the primary screen snapshot. Margins do not survive the
    /// round trip; the application re-establishes them if it wants any.
    fn exit_alternate_screen(&mut self) {
        let Some(backup) = self.alt_screen_backup.take() else {
            return;
        };
        self.mode = backup.mode;
        self.charset = backup.charset;
        self.g0_charset = backup.g0_charset;
        self.g1_charset = backup.g1_charset;
        self.tabstops = backup.tabstops;
        self.data_buffer = backup.data_buffer;
        self.cursor = backup.cursor;
        self.max_y = backup.max_y;
        self.wrapped_lines = backup.wrapped_lines;
        self.show_cursor = backup.show_cursor;
        self.margins = None;
    }

    /// SI: activate G0.
    pub fn shift_in(&mut self) { self.charset = 0; }

    /// SO: activate G1.
    pub fn shift_out(&mut self) { self.charset = 1; }

    /// `ESC ( F` / `ESC ) F`: designate G0 or G1. Unknown set codes are
    /// ignored.
    pub fn set_charset(&mut self, code: char, slot: char) {
        let Some(table) = CharsetTable::from_designator(code) else {
            return;
        };
        match slot {
            '(' => self.g0_charset = table,
            ')' => self.g1_charset = table,
            _ => {}
        }
    }

    /// DECSTBM: select the scrolling region. Arguments are 1-based and
    /// inclusive. Both missing is ignored; a full reset arrives as a bare
    /// `CSI r`, which the parser routes to [`Screen::reset_margins`].
    pub fn set_margins(&mut self, top: Option<usize>, bottom: Option<usize>) {
        if top.is_none() && bottom.is_none() {
            return;
        }

        let current = self.margins.unwrap_or(Margins {
            top: 0,
            bottom: self.lines.saturating_sub(1),
        });

        let top = top.map_or(current.top, |value| value.saturating_sub(1));
        let bottom = bottom.map_or(current.bottom, |value| value.saturating_sub(1));

        let top = top.min(self.lines.saturating_sub(1));
        let bottom = bottom.min(self.lines.saturating_sub(1));

        // DECSTBM is supposed to ignore regions narrower than two rows, but
        // aptitude relies on them scrolling anyway. Practicality beats
        // purity; we only require top < bottom.
        if bottom > top {
            self.margins = Some(Margins { top, bottom });
            // The cursor homes whenever the scrolling region changes.
            self.cursor_position(None, None);
        }
    }

    /// `CSI r` with no arguments: back to full-screen scrolling.
    pub fn reset_margins(&mut self) {
        self.margins = None;
        self.cursor_position(None, None);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        core::modes::{BRACKETED_PASTE, DECTCEM_SHOW_CURSOR},
        screen::Pos,
    };

    #[test]
    fn private_codes_are_shifted_on_the_way_in() {
        let mut screen = Screen::new(24, 80);
        screen.set_mode(&[2004], true);
        assert!(screen.mode.contains(BRACKETED_PASTE));
        assert!(screen.bracketed_paste_enabled());
        screen.reset_mode(&[2004], true);
        assert!(!screen.bracketed_paste_enabled());
    }

    #[test]
    fn dectcem_toggles_cursor_visibility() {
        let mut screen = Screen::new(24, 80);
        assert!(screen.show_cursor);
        screen.reset_mode(&[DECTCEM_SHOW_CURSOR], false);
        assert!(!screen.show_cursor);
        screen.set_mode(&[DECTCEM_SHOW_CURSOR], false);
        assert!(screen.show_cursor);
    }

    #[test]
    fn alternate_screen_round_trip_restores_everything() {
        let mut screen = Screen::new(24, 80);
        screen.draw("ABC");
        let saved_cursor = screen.cursor;

        screen.set_mode(&[1049], true);
        assert!(screen.in_alternate_screen());
        assert_eq!(screen.row_text(0), "");
        assert_eq!(screen.cursor, Pos { x: 0, y: 0 });

        screen.draw("XYZ");
        screen.reset_mode(&[1049], true);
        assert!(!screen.in_alternate_screen());
        assert_eq!(screen.row_text(0), "ABC");
        assert_eq!(screen.cursor, saved_cursor);
    }

    #[test]
    fn alternate_screen_set_twice_keeps_the_primary_backup() {
        let mut screen = Screen::new(24, 80);
        screen.draw("primary");
        screen.set_mode(&[1049], true);
        screen.draw("alt");
        screen.set_mode(&[1049], true); // must not re-snapshot
        screen.reset_mode(&[1049], true);
        assert_eq!(screen.row_text(0), "primary");
    }

    #[test]
    fn history_is_not_evicted_in_the_alternate_screen() {
        let mut screen = Screen::new(3, 10).with_history_limit(10);
        screen.set_mode(&[1049], true);
        for i in 0..300 {
            screen.draw(&format!("{i}"));
            screen.carriage_return();
            screen.linefeed();
        }
        // Every row written in the alternate screen is still present.
        assert!(screen.data_buffer.contains_key(&0));
    }

    #[test]
    fn margins_home_the_cursor_and_validate() {
        let mut screen = Screen::new(24, 80);
        screen.cursor_position(Some(10), Some(10));
        screen.set_margins(Some(3), Some(10));
        assert_eq!(screen.margins, Some(Margins { top: 2, bottom: 9 }));
        assert_eq!(screen.cursor, Pos { x: 0, y: 0 });

        // Inverted regions are rejected.
        screen.set_margins(Some(10), Some(3));
        assert_eq!(screen.margins, Some(Margins { top: 2, bottom: 9 }));

        screen.reset_margins();
        assert_eq!(screen.margins, None);
    }

    #[test]
    fn charset_designation_and_shift() {
        let mut screen = Screen::new(24, 80);
        screen.draw("q");
        assert_eq!(screen.cell(0, 0).grapheme(), "q");

        screen.shift_out(); // G1 is line drawing by default
        screen.draw("q");
        assert_eq!(screen.cell(0, 1).grapheme(), "─");

        screen.shift_in();
        screen.set_charset('0', '(');
        screen.draw("x");
        assert_eq!(screen.cell(0, 2).grapheme(), "│");
    }
}

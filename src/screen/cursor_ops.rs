// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Cursor motion, bounds clamping, and the DECSC/DECRC savepoint stack.
//!
//! All explicit motion is clamped through [`Screen::ensure_bounds`]. Note
//! that `linefeed`/`index` are *not* motion in this sense: they may push the
//! cursor onto a brand new row below `max_y`, which is how scrollback grows.

use super::{Margins, Savepoint, Screen};
use crate::core::modes::{DECAWM_AUTO_WRAP, DECOM_ORIGIN};

impl Screen {
    /// Clamp the cursor into the addressable area.
    ///
    /// With `use_margins` (or while DECOM is set) the vertical range is the
    /// scroll region; otherwise the whole viewport. Horizontally the cursor
    /// always ends within `[0, columns)`.
    pub fn ensure_bounds(&mut self, use_margins: bool) {
        let (top, bottom) = match self.margins {
            Some(margins) if use_margins || self.mode.contains(DECOM_ORIGIN) => {
                (margins.top, margins.bottom)
            }
            _ => (0, self.lines.saturating_sub(1)),
        };
        let offset = self.line_offset();
        self.cursor.x = self.cursor.x.min(self.columns.saturating_sub(1));
        self.cursor.y = self.cursor.y.clamp(top + offset, bottom + offset);
    }

    /// CR: move to the beginning of the current line.
    pub fn carriage_return(&mut self) { self.cursor.x = 0; }

    /// BS: one column left, stopping at the left margin.
    pub fn backspace(&mut self) { self.cursor_back(1); }

    /// CUU: up `count` lines in the same column, stopping at the top margin.
    pub fn cursor_up(&mut self, count: usize) {
        self.cursor.y = self.cursor.y.saturating_sub(count.max(1));
        self.ensure_bounds(true);
    }

    /// CPL: up `count` lines, to column 1.
    pub fn cursor_up1(&mut self, count: usize) {
        self.cursor_up(count);
        self.carriage_return();
    }

    /// CUD: down `count` lines in the same column, stopping at the bottom
    /// margin.
    pub fn cursor_down(&mut self, count: usize) {
        let Margins { bottom, .. } = self
            .margins
            .unwrap_or(Margins { top: 0, bottom: self.lines.saturating_sub(1) });
        let offset = self.line_offset();
        self.cursor.y = (self.cursor.y + count.max(1)).min(bottom + offset);
        if self.cursor.y > self.max_y {
            self.max_y = self.cursor.y;
        }
    }

    /// CNL: down `count` lines, to column 1.
    pub fn cursor_down1(&mut self, count: usize) {
        self.cursor_down(count);
        self.carriage_return();
    }

    /// CUB: left `count` columns, stopping at the left margin.
    pub fn cursor_back(&mut self, count: usize) {
        self.cursor.x = self.cursor.x.saturating_sub(count.max(1));
        self.ensure_bounds(false);
    }

    /// CUF: right `count` columns, stopping at the right margin.
    pub fn cursor_forward(&mut self, count: usize) {
        self.cursor.x += count.max(1);
        self.ensure_bounds(false);
    }

    /// CUP/HVP: absolute addressing. Arguments are 1-based; `None` means the
    /// parameter was omitted and defaults to 1.
    ///
    /// While DECOM is set, the row is relative to the top margin and the
    /// cursor may not leave the scroll region: requests outside it are
    /// ignored outright.
    pub fn cursor_position(&mut self, line: Option<usize>, column: Option<usize>) {
        let column0 = column.unwrap_or(1).max(1) - 1;
        let mut line0 = line.unwrap_or(1).max(1) - 1;

        if let Some(margins) = self.margins {
            if self.mode.contains(DECOM_ORIGIN) {
                line0 += margins.top;
                if !(margins.top..=margins.bottom).contains(&line0) {
                    return;
                }
            }
        }

        let offset = self.line_offset();
        self.cursor.x = column0;
        self.cursor.y = line0 + offset;
        self.ensure_bounds(false);
    }

    /// CHA: move to a 1-based column in the current line.
    pub fn cursor_to_column(&mut self, column: Option<usize>) {
        self.cursor.x = column.unwrap_or(1).max(1) - 1;
        self.ensure_bounds(false);
    }

    /// VPA: move to a 1-based line in the current column.
    pub fn cursor_to_line(&mut self, line: Option<usize>) {
        let offset = self.line_offset();
        self.cursor.y = line.unwrap_or(1).max(1) - 1 + offset;

        if self.mode.contains(DECOM_ORIGIN) {
            if let Some(margins) = self.margins {
                self.cursor.y += margins.top;
            }
        }

        self.ensure_bounds(false);
    }

    /// DECSC: push the cursor plus charset/origin/autowrap/attribute context.
    pub fn save_cursor(&mut self) {
        self.savepoints.push(Savepoint {
            cursor: self.cursor,
            g0_charset: self.g0_charset,
            g1_charset: self.g1_charset,
            charset: self.charset,
            origin: self.mode.contains(DECOM_ORIGIN),
            autowrap: self.mode.contains(DECAWM_AUTO_WRAP),
            attrs: self.attrs,
            style: self.style.clone(),
        });
    }

    /// DECRC: pop the most recent savepoint. With an empty stack the cursor
    /// homes and origin mode resets, per the VT100 manual.
    pub fn restore_cursor(&mut self) {
        if let Some(savepoint) = self.savepoints.pop() {
            self.g0_charset = savepoint.g0_charset;
            self.g1_charset = savepoint.g1_charset;
            self.charset = savepoint.charset;
            self.attrs = savepoint.attrs;
            self.style = savepoint.style;

            if savepoint.origin {
                self.set_mode(&[DECOM_ORIGIN], false);
            } else {
                self.reset_mode(&[DECOM_ORIGIN], false);
            }
            if savepoint.autowrap {
                self.set_mode(&[DECAWM_AUTO_WRAP], false);
            } else {
                self.reset_mode(&[DECAWM_AUTO_WRAP], false);
            }

            self.cursor = savepoint.cursor;
            self.ensure_bounds(true);
        } else {
            self.reset_mode(&[DECOM_ORIGIN], false);
            self.cursor_position(None, None);
        }
    }
}

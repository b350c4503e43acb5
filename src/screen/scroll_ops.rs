// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Vertical movement that can scroll: IND, RI, LF, NEL, SU/SD, plus the
//! amortized scrollback eviction.
//!
//! Scrolling has two regimes. Without margins, `index` simply walks the
//! cursor down onto fresh rows; old rows stay behind as scrollback and the
//! viewport follows the cursor. With margins set, rows are physically moved
//! within the region and nothing enters scrollback.

use super::{HISTORY_CLEANUP_INTERVAL, Margins, Screen};
use crate::core::modes::LNM_NEWLINE;

impl Screen {
    /// IND: move down one line, scrolling at the bottom of the region.
    pub fn index(&mut self) {
        match self.margins {
            None => {
                // Scrolling over the full height keeps history: just move
                // onto the next row.
                self.cursor.y += 1;
                if self.cursor.y > self.max_y {
                    self.max_y = self.cursor.y;
                }

                self.history_cleanup_counter += 1;
                if self.history_cleanup_counter == HISTORY_CLEANUP_INTERVAL {
                    self.remove_old_lines_from_history();
                    self.history_cleanup_counter = 0;
                }
            }
            Some(Margins { top, bottom }) => {
                let offset = self.line_offset();
                if self.cursor.y - offset == bottom {
                    self.shift_region_up(top, bottom, offset);
                } else {
                    self.cursor_down(1);
                }
            }
        }
    }

    /// RI: move up one line, scrolling at the top of the region.
    pub fn reverse_index(&mut self) {
        let Margins { top, bottom } = self
            .margins
            .unwrap_or(Margins { top: 0, bottom: self.lines.saturating_sub(1) });
        let offset = self.line_offset();

        if self.cursor.y - offset == top {
            self.shift_region_down(top, bottom, offset);
        } else {
            self.cursor_up(1);
        }
    }

    /// LF: an index, plus a carriage return when LNM is set.
    pub fn linefeed(&mut self) {
        self.index();
        if self.mode.contains(LNM_NEWLINE) {
            self.carriage_return();
        }
    }

    /// NEL (`ESC E`): always go to the left margin of the next line,
    /// regardless of LNM.
    pub fn next_line(&mut self) {
        self.index();
        self.carriage_return();
        self.ensure_bounds(false);
    }

    /// SU (`CSI n S`): scroll the region up `count` lines without moving the
    /// cursor.
    pub fn scroll_up(&mut self, count: usize) {
        let Margins { top, bottom } = self
            .margins
            .unwrap_or(Margins { top: 0, bottom: self.lines.saturating_sub(1) });
        let offset = self.line_offset();
        for _ in 0..count.max(1) {
            self.shift_region_up(top, bottom, offset);
        }
    }

    /// SD (`CSI n T`): scroll the region down `count` lines without moving
    /// the cursor.
    pub fn scroll_down(&mut self, count: usize) {
        let Margins { top, bottom } = self
            .margins
            .unwrap_or(Margins { top: 0, bottom: self.lines.saturating_sub(1) });
        let offset = self.line_offset();
        for _ in 0..count.max(1) {
            self.shift_region_down(top, bottom, offset);
        }
    }

    /// Move every row of the region up one; the top row is lost and the
    /// bottom row becomes blank.
    fn shift_region_up(&mut self, top: usize, bottom: usize, offset: usize) {
        for line in top..bottom {
            match self.data_buffer.remove(&(line + offset + 1)) {
                Some(row) => {
                    self.data_buffer.insert(line + offset, row);
                }
                None => {
                    self.data_buffer.remove(&(line + offset));
                }
            }
        }
        self.data_buffer.remove(&(bottom + offset));
    }

    /// Move every row of the region down one; the bottom row is lost and the
    /// top row becomes blank.
    fn shift_region_down(&mut self, top: usize, bottom: usize, offset: usize) {
        for line in (top..bottom).rev() {
            match self.data_buffer.remove(&(line + offset)) {
                Some(row) => {
                    self.data_buffer.insert(line + offset + 1, row);
                }
                None => {
                    self.data_buffer.remove(&(line + offset + 1));
                }
            }
        }
        self.data_buffer.remove(&(top + offset));
    }

    /// Evict scrollback rows beyond the history limit. Runs amortized from
    /// `index`; never applies to the alternate screen.
    pub(crate) fn remove_old_lines_from_history(&mut self) {
        if self.in_alternate_screen() {
            return;
        }
        let remove_above = self.cursor.y.saturating_sub(self.history_limit);
        let doomed: Vec<usize> = self
            .data_buffer
            .range(..remove_above)
            .map(|(&row, _)| row)
            .collect();
        for row in doomed {
            self.data_buffer.remove(&row);
        }
    }

    /// Drop everything above the viewport.
    pub fn clear_history(&mut self) {
        let offset = self.line_offset();
        let doomed: Vec<usize> =
            self.data_buffer.range(..offset).map(|(&row, _)| row).collect();
        for row in doomed {
            self.data_buffer.remove(&row);
        }
    }
}

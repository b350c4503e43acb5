// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Drawing and character-level editing.
//!
//! `draw` is the hot path: it runs once per printable code point a child
//! process emits. The editing operations (ICH/DCH/ECH, EL/ED) work directly
//! on the current row's sparse column map.

use unicode_width::UnicodeWidthChar;

use super::{Screen, SparseRow};
use crate::core::{
    Cell,
    modes::{DECAWM_AUTO_WRAP, IRM_INSERT},
};

impl Screen {
    /// Draw a run of printable characters. `text` must not contain control
    /// codes; the parser routes those through `execute` instead.
    pub fn draw(&mut self, text: &str) {
        for ch in text.chars() {
            self.draw_char(ch);
        }
    }

    /// Draw one printable code point at the cursor.
    pub fn draw_char(&mut self, ch: char) {
        // 1. Active charset translation.
        let ch = if self.charset == 1 {
            self.g1_charset.translate(ch)
        } else {
            self.g0_charset.translate(ch)
        };
        let width = UnicodeWidthChar::width(ch).unwrap_or(0);

        // 2. Past the right margin: wrap or overstrike the last column.
        if self.cursor.x >= self.columns {
            if self.mode.contains(DECAWM_AUTO_WRAP) {
                self.carriage_return();
                self.linefeed();
                self.wrapped_lines.insert(self.cursor.y);
            } else {
                self.cursor.x = self.cursor.x.saturating_sub(width);
            }
        }

        // 3. Insert mode shifts the tail of the row right first.
        if self.mode.contains(IRM_INSERT) {
            self.insert_characters(width.max(1));
        }

        // 4. Place the cell.
        let style = self.style.clone();
        let cursor = self.cursor;
        let row = self.data_buffer.entry(cursor.y).or_default();
        match width {
            1 => {
                row.insert(cursor.x, Cell::new(ch, 1, style));
            }
            2 => {
                row.insert(cursor.x, Cell::new(ch, 2, style.clone()));
                row.insert(cursor.x + 1, Cell::sentinel(style));
            }
            0 => {
                // Combining mark: fold into the preceding cell's grapheme,
                // keeping that cell's style.
                if cursor.x > 0 {
                    row.entry(cursor.x - 1)
                        .or_insert_with(Cell::default)
                        .push_combining(ch);
                }
            }
            _ => {}
        }

        // 5. Advance. Not via cursor_forward: wrapping must observe the raw
        // overflow position on the next draw.
        self.cursor.x += width;

        // 6. Track the deepest row written.
        if self.cursor.y > self.max_y {
            self.max_y = self.cursor.y;
        }
    }

    /// ICH: insert blank space at the cursor by shifting the tail of the row
    /// right. The cursor does not move.
    pub fn insert_characters(&mut self, count: usize) {
        let count = count.max(1);
        let x = self.cursor.x;
        let Some(row) = self.data_buffer.get_mut(&self.cursor.y) else {
            return;
        };
        let tail: Vec<usize> = row.range(x..).map(|(&column, _)| column).collect();
        for &column in tail.iter().rev() {
            if let Some(cell) = row.remove(&column) {
                row.insert(column + count, cell);
            }
        }
    }

    /// DCH: delete `count` cells at the cursor; the rest of the row shifts
    /// left.
    pub fn delete_characters(&mut self, count: usize) {
        let count = count.max(1);
        let x = self.cursor.x;
        let Some(row) = self.data_buffer.get_mut(&self.cursor.y) else {
            return;
        };
        let doomed: Vec<usize> = row.range(x..x + count).map(|(&column, _)| column).collect();
        for column in doomed {
            row.remove(&column);
        }
        let tail: Vec<usize> = row.range(x + count..).map(|(&column, _)| column).collect();
        for column in tail {
            if let Some(cell) = row.remove(&column) {
                row.insert(column - count, cell);
            }
        }
    }

    /// ECH: blank `count` cells starting at the cursor, without shifting.
    /// The erased cells keep their previous style; libvte, xterm, and ROTE
    /// all ignore the manuals here and so do we.
    pub fn erase_characters(&mut self, count: usize) {
        let count = count.max(1);
        let end = (self.cursor.x + count).min(self.columns);
        let row = self.data_buffer.entry(self.cursor.y).or_default();
        for column in self.cursor.x..end {
            let style = row
                .get(&column)
                .map_or_else(crate::core::style::default_style, |cell| cell.style.clone());
            row.insert(column, Cell::blank_with_style(style));
        }
    }

    /// EL: erase within the cursor row. `type_of` 0 = cursor to end of line,
    /// 1 = beginning of line to cursor, 2 = whole line.
    pub fn erase_in_line(&mut self, type_of: usize) {
        let x = self.cursor.x;
        match type_of {
            2 => {
                self.data_buffer.remove(&self.cursor.y);
            }
            0 | 1 => {
                if let Some(row) = self.data_buffer.get_mut(&self.cursor.y) {
                    row.retain(|&column, _| if type_of == 0 { column < x } else { column > x });
                }
            }
            _ => {}
        }
    }

    /// ED: erase within the display. `type_of` 0 = cursor to end of screen,
    /// 1 = beginning of screen to cursor, 2 = whole display, 3 = scrollback
    /// too (resets the cursor row and `max_y`).
    pub fn erase_in_display(&mut self, type_of: usize) {
        let Some(&max_line) = self.data_buffer.keys().next_back() else {
            return;
        };

        if type_of == 3 {
            self.data_buffer.clear();
            self.cursor.y = 0;
            self.max_y = 0;
            return;
        }

        let offset = self.line_offset();
        let y = self.cursor.y;
        let doomed: Vec<usize> = match type_of {
            0 => self.data_buffer.range(y + 1..=max_line),
            1 => self.data_buffer.range(offset..y),
            2 => self.data_buffer.range(offset..=max_line),
            _ => return,
        }
        .map(|(&row, _)| row)
        .collect();
        for row in doomed {
            self.data_buffer.remove(&row);
        }

        // Types 0 and 1 share the cursor row with the kept half.
        if type_of == 0 || type_of == 1 {
            self.erase_in_line(type_of);
        }
    }

    /// DECALN (`ESC # 8`): fill the viewport with `E` for screen alignment.
    pub fn alignment_display(&mut self) {
        let offset = self.line_offset();
        let style = self.styles.empty();
        for y in 0..self.lines {
            let row: &mut SparseRow = self.data_buffer.entry(y + offset).or_default();
            for x in 0..self.columns {
                row.insert(x, Cell::new('E', 1, style.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::screen::Pos;

    #[test]
    fn draw_advances_and_tracks_max_y() {
        let mut screen = Screen::new(24, 80);
        screen.draw("Hello");
        assert_eq!(screen.row_text(0), "Hello");
        assert_eq!(screen.cursor, Pos { x: 5, y: 0 });
        assert_eq!(screen.max_y, 0);
    }

    #[test]
    fn autowrap_starts_a_wrapped_row() {
        let mut screen = Screen::new(5, 10);
        screen.draw(&"A".repeat(25));
        assert_eq!(screen.row_text(0), "A".repeat(10));
        assert_eq!(screen.row_text(1), "A".repeat(10));
        assert_eq!(screen.row_text(2), "A".repeat(5));
        assert!(screen.wrapped_lines.contains(&1));
        assert!(screen.wrapped_lines.contains(&2));
        assert_eq!(screen.cursor, Pos { x: 5, y: 2 });
    }

    #[test]
    fn without_autowrap_the_last_column_overstrikes() {
        let mut screen = Screen::new(5, 10);
        screen.reset_mode(&[7], true); // DECAWM off
        screen.draw("ABCDEFGHIJKLM");
        assert_eq!(screen.row_text(0), "ABCDEFGHIM");
        assert_eq!(screen.cursor.y, 0);
        assert!(screen.wrapped_lines.is_empty());
    }

    #[test]
    fn wide_characters_occupy_two_cells_with_a_sentinel() {
        let mut screen = Screen::new(24, 80);
        screen.draw("字");
        assert_eq!(screen.cell(0, 0).grapheme(), "字");
        assert_eq!(screen.cell(0, 0).width, 2);
        assert!(screen.cell(0, 1).is_sentinel());
        assert_eq!(screen.cursor.x, 2);
    }

    #[test]
    fn combining_marks_fold_into_the_previous_cell() {
        let mut screen = Screen::new(24, 80);
        screen.draw("e\u{0301}x");
        assert_eq!(screen.cell(0, 0).grapheme(), "e\u{0301}");
        assert_eq!(screen.cell(0, 1).grapheme(), "x");
        assert_eq!(screen.cursor.x, 2);
    }

    #[test]
    fn insert_mode_shifts_the_tail_right() {
        let mut screen = Screen::new(24, 80);
        screen.draw("abc");
        screen.carriage_return();
        screen.set_mode(&[IRM_INSERT], false);
        screen.draw("X");
        assert_eq!(screen.row_text(0), "Xabc");
    }

    #[test]
    fn delete_characters_shifts_left() {
        let mut screen = Screen::new(24, 80);
        screen.draw("abcdef");
        screen.cursor.x = 1;
        screen.delete_characters(2);
        assert_eq!(screen.row_text(0), "adef");
    }

    #[test]
    fn erase_characters_keeps_the_style() {
        let mut screen = Screen::new(24, 80);
        screen.select_graphic_rendition(&[48, 5, 21]);
        screen.draw("abc");
        screen.cursor.x = 0;
        screen.select_graphic_rendition(&[0]);
        screen.erase_characters(2);
        assert_eq!(screen.cell(0, 0).grapheme(), " ");
        assert!(screen.cell(0, 0).style.contains("bg:#0000ff"));
        assert_eq!(screen.cell(0, 2).grapheme(), "c");
    }

    #[test]
    fn erase_in_line_variants() {
        let mut screen = Screen::new(24, 80);
        screen.draw("abcdef");
        screen.cursor.x = 3;
        screen.erase_in_line(0);
        assert_eq!(screen.row_text(0), "abc");

        let mut screen = Screen::new(24, 80);
        screen.draw("abcdef");
        screen.cursor.x = 2;
        screen.erase_in_line(1);
        assert_eq!(screen.row_text(0), "   def");

        let mut screen = Screen::new(24, 80);
        screen.draw("abcdef");
        screen.erase_in_line(2);
        assert_eq!(screen.row_text(0), "");
    }

    #[test]
    fn erase_in_display_type_three_clears_scrollback() {
        let mut screen = Screen::new(2, 10);
        for _ in 0..10 {
            screen.draw("x");
            screen.carriage_return();
            screen.linefeed();
        }
        assert!(screen.max_y > 0);
        screen.erase_in_display(3);
        assert!(screen.data_buffer.is_empty());
        assert_eq!(screen.cursor.y, 0);
        assert_eq!(screen.max_y, 0);
    }

    #[test]
    fn erase_in_display_keeps_scrollback_above_the_viewport() {
        let mut screen = Screen::new(2, 10);
        for i in 0..6 {
            screen.draw(&format!("row{i}"));
            screen.carriage_return();
            if i < 5 {
                screen.linefeed();
            }
        }
        // Viewport shows rows 4..=5; rows 0..=3 are history.
        assert_eq!(screen.line_offset(), 4);
        screen.erase_in_display(2);
        assert_eq!(screen.row_text(3), "row3");
        assert_eq!(screen.row_text(4), "");
        assert_eq!(screen.row_text(5), "");
    }

    #[test]
    fn alignment_display_fills_the_viewport() {
        let mut screen = Screen::new(3, 4);
        screen.alignment_display();
        assert_eq!(screen.row_text(0), "EEEE");
        assert_eq!(screen.row_text(2), "EEEE");
    }
}

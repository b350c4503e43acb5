// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Resize and dynamic reflow.
//!
//! On a width change, rows that were produced by autowrap are rejoined with
//! their predecessors into logical lines, trailing unstyled whitespace is
//! stripped (unless it holds the cursor), and the logical lines are broken
//! again at the new width. The cursor travels with the character it was on.
//!
//! Wide-cell sentinels are not copied positionally: they are skipped during
//! unwrapping and re-created next to their cell when it is re-emitted, which
//! keeps the "sentinel at x+1" invariant intact across arbitrary width
//! changes.

use std::mem;

use super::{Pos, Screen, SparseBuffer};
use crate::core::Cell;

impl Screen {
    /// Change the terminal dimensions. Margins are cleared, `max_y` is
    /// trimmed so content cannot hide above a shrunken viewport, and the
    /// buffer is reflowed to the new width.
    pub fn resize(&mut self, lines: usize, columns: usize) {
        if lines == 0 || columns == 0 {
            return;
        }
        if self.lines == lines && self.columns == columns {
            return;
        }
        self.lines = lines;
        self.columns = columns;

        self.margins = None;

        // If the height shrank and there are rows below cursor + lines,
        // pull max_y in. Without this, clearing the screen followed by a
        // height reduction leaves the cursor pinned at the top with content
        // hidden below.
        self.max_y = self.max_y.min(self.cursor.y + lines - 1);

        self.reflow();
    }

    fn reflow(&mut self) {
        let width = self.columns;
        if self.data_buffer.is_empty() {
            self.wrapped_lines.clear();
            return;
        }

        let Pos { x: cursor_x, y: cursor_y } = self.cursor;
        let cursor_grapheme = self.cell(cursor_y, cursor_x).text.clone();

        let data_buffer = mem::take(&mut self.data_buffer);
        let first_row = *data_buffer.keys().next().unwrap_or(&0);
        let last_row = *data_buffer.keys().next_back().unwrap_or(&0);

        // Unwrap into logical lines, remembering where the cursor lands.
        // Absent rows in the range (erased lines) become one-cell blank
        // lines so vertical structure survives; `max_y` depends on it after
        // a `clear`.
        let mut logical_lines: Vec<Vec<Cell>> = Vec::new();
        let mut line: Vec<Cell> = Vec::new();
        let mut cursor_logical: Option<(usize, usize)> = None;

        for row_index in first_row..=last_row {
            let row = data_buffer.get(&row_index);
            let row_last = row.and_then(|cells| cells.keys().next_back().copied()).unwrap_or(0);
            for column_index in 0..=row_last {
                if cursor_y == row_index && cursor_x == column_index {
                    cursor_logical = Some((logical_lines.len(), line.len()));
                }
                let cell = row
                    .and_then(|cells| cells.get(&column_index))
                    .cloned()
                    .unwrap_or_default();
                if cell.is_sentinel() {
                    continue;
                }
                line.push(cell);
            }
            if !self.wrapped_lines.contains(&(row_index + 1)) {
                logical_lines.push(mem::take(&mut line));
            }
        }
        if !line.is_empty() {
            logical_lines.push(line);
        }

        // Strip trailing unstyled whitespace, stopping short of the cursor
        // cell. Lines keep at least one cell.
        for (line_index, line) in logical_lines.iter_mut().enumerate() {
            while line.len() > 1 {
                let Some(last) = line.last() else { break };
                if !last.is_unstyled_whitespace() {
                    break;
                }
                if cursor_logical == Some((line_index, line.len() - 1)) {
                    break;
                }
                line.pop();
            }
        }

        // Re-wrap at the new width.
        let mut new_buffer = SparseBuffer::new();
        self.wrapped_lines.clear();
        let mut new_row_index = first_row;
        let mut new_column_index = 0usize;
        let mut new_cursor: Option<Pos> = None;

        for (line_index, line) in logical_lines.iter().enumerate() {
            for (cell_index, cell) in line.iter().enumerate() {
                let cell_width = cell.width as usize;
                if new_column_index + cell_width > width {
                    new_row_index += 1;
                    new_column_index = 0;
                    self.wrapped_lines.insert(new_row_index);
                }
                if cursor_logical == Some((line_index, cell_index)) {
                    new_cursor = Some(Pos { x: new_column_index, y: new_row_index });
                }
                let row = new_buffer.entry(new_row_index).or_default();
                row.insert(new_column_index, cell.clone());
                if cell.width == 2 {
                    row.insert(new_column_index + 1, Cell::sentinel(cell.style.clone()));
                }
                new_column_index += cell_width;
            }
            new_row_index += 1;
            new_column_index = 0;
        }

        // A cursor sitting past the end of its row has no cell to follow;
        // it stays where it was.
        let cursor = new_cursor.unwrap_or(Pos { x: cursor_x, y: cursor_y });

        // Shrinking the height must not leave content far below the cursor.
        let row_limit = cursor.y + self.lines;
        let doomed: Vec<usize> =
            new_buffer.range(row_limit + 1..).map(|(&row, _)| row).collect();
        for row in doomed {
            new_buffer.remove(&row);
        }

        self.data_buffer = new_buffer;
        self.cursor = cursor;

        if new_cursor.is_some() {
            // The cursor travelled with its character; anything else is a
            // rewrap logic error.
            let now = self.cell(self.cursor.y, self.cursor.x).text;
            debug_assert_eq!(
                cursor_grapheme, now,
                "reflow moved the cursor off its character"
            );
            if cursor_grapheme != now {
                tracing::error!(
                    "reflow moved the cursor off its character: {cursor_grapheme:?} -> {now:?}"
                );
            }
        }

        self.max_y = self.data_buffer.keys().next_back().copied().unwrap_or(0);
        self.max_y = self.max_y.min(self.cursor.y + self.lines - 1);
        self.max_y = self.max_y.max(self.cursor.y);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn widening_rejoins_wrapped_lines() {
        let mut screen = Screen::new(5, 10);
        screen.draw(&"A".repeat(25));
        assert_eq!(screen.wrapped_lines.len(), 2);

        screen.resize(5, 25);
        assert_eq!(screen.row_text(0), "A".repeat(25));
        assert_eq!(screen.row_text(1), "");
        assert!(screen.wrapped_lines.is_empty());
    }

    #[test]
    fn narrowing_wraps_long_lines() {
        let mut screen = Screen::new(5, 20);
        screen.draw("0123456789");
        screen.resize(5, 4);
        assert_eq!(screen.row_text(0), "0123");
        assert_eq!(screen.row_text(1), "4567");
        assert_eq!(screen.row_text(2), "89");
        assert!(screen.wrapped_lines.contains(&1));
        assert!(screen.wrapped_lines.contains(&2));
    }

    #[test]
    fn round_trip_restores_wrapped_lines() {
        let mut screen = Screen::new(5, 10);
        screen.draw(&"B".repeat(23));
        let original: Vec<usize> = screen.wrapped_lines.iter().copied().collect();

        screen.resize(5, 40);
        screen.resize(5, 10);
        let restored: Vec<usize> = screen.wrapped_lines.iter().copied().collect();
        assert_eq!(original, restored);
        assert_eq!(screen.row_text(2), "B".repeat(3));
    }

    #[test]
    fn cursor_travels_with_its_character() {
        let mut screen = Screen::new(5, 10);
        screen.draw(&"C".repeat(15));
        screen.draw("X");
        // Cursor is just after 'X'; park it on 'X' instead.
        screen.cursor.x -= 1;
        let before = screen.cell(screen.cursor.y, screen.cursor.x).text.clone();

        screen.resize(5, 30);
        let after = screen.cell(screen.cursor.y, screen.cursor.x).text.clone();
        assert_eq!(before, after);
        assert_eq!(screen.cursor, Pos { x: 15, y: 0 });
    }

    #[test]
    fn separate_lines_stay_separate() {
        let mut screen = Screen::new(5, 10);
        screen.draw("one");
        screen.carriage_return();
        screen.linefeed();
        screen.draw("two");
        screen.resize(5, 40);
        assert_eq!(screen.row_text(0), "one");
        assert_eq!(screen.row_text(1), "two");
    }

    #[test]
    fn wide_cells_keep_their_sentinels_after_reflow() {
        let mut screen = Screen::new(5, 4);
        screen.draw("字字字");
        // Width 4 holds two wide cells per row.
        assert!(screen.wrapped_lines.contains(&1));

        screen.resize(5, 10);
        assert_eq!(screen.cell(0, 0).grapheme(), "字");
        assert!(screen.cell(0, 1).is_sentinel());
        assert_eq!(screen.cell(0, 2).grapheme(), "字");
        assert!(screen.cell(0, 3).is_sentinel());
        assert_eq!(screen.cell(0, 4).grapheme(), "字");
        assert!(screen.cell(0, 5).is_sentinel());
    }

    #[test]
    fn wide_cell_never_straddles_the_margin() {
        let mut screen = Screen::new(5, 10);
        screen.draw("abc字");
        screen.resize(5, 4);
        // '字' does not fit in the single cell left on row 0.
        assert_eq!(screen.row_text(0), "abc");
        assert_eq!(screen.cell(1, 0).grapheme(), "字");
        assert!(screen.cell(1, 1).is_sentinel());
    }

    #[test]
    fn styled_trailing_whitespace_is_preserved() {
        let mut screen = Screen::new(5, 10);
        screen.draw("ab");
        screen.select_graphic_rendition(&[48, 5, 21]);
        screen.draw(" ");
        screen.select_graphic_rendition(&[0]);
        screen.resize(5, 20);
        assert!(screen.cell(0, 2).style.contains("bg:"));
    }

    #[test]
    fn resize_to_same_size_is_a_no_op() {
        let mut screen = Screen::new(5, 10);
        screen.draw("hello");
        let before = screen.data_buffer.clone();
        screen.resize(5, 10);
        assert_eq!(screen.data_buffer, before);
    }

    #[test]
    fn blank_lines_survive_reflow() {
        let mut screen = Screen::new(10, 10);
        screen.draw("top");
        screen.carriage_return();
        screen.linefeed();
        screen.linefeed();
        screen.draw("bottom");
        screen.resize(10, 20);
        assert_eq!(screen.row_text(0), "top");
        assert_eq!(screen.row_text(1), "");
        assert_eq!(screen.row_text(2), "bottom");
    }
}

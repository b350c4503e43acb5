// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Line insertion and deletion (IL/DL).
//!
//! Both operate on whole rows within the scroll region and only when the
//! cursor row is inside it. Rows use absolute indices; the region bounds are
//! viewport-relative, so everything is offset by [`Screen::line_offset`].

use super::{Margins, Screen};

impl Screen {
    /// IL: insert `count` blank lines at the cursor row. Rows at and below
    /// the cursor move down; rows pushed past the bottom margin are lost.
    /// Ends with a carriage return.
    pub fn insert_lines(&mut self, count: usize) {
        let count = count.max(1);
        let Margins { top, bottom } = self
            .margins
            .unwrap_or(Margins { top: 0, bottom: self.lines.saturating_sub(1) });
        let offset = self.line_offset();
        let cursor_row = self.cursor.y - offset;

        if !(top..=bottom).contains(&cursor_row) {
            return;
        }

        for dest in (cursor_row..=bottom).rev() {
            if dest < cursor_row + count {
                self.data_buffer.remove(&(dest + offset));
            } else {
                match self.data_buffer.remove(&(dest - count + offset)) {
                    Some(row) => {
                        self.data_buffer.insert(dest + offset, row);
                    }
                    None => {
                        self.data_buffer.remove(&(dest + offset));
                    }
                }
            }
        }

        self.carriage_return();
    }

    /// DL: delete `count` lines starting at the cursor row. Rows below move
    /// up; blank rows appear at the bottom of the scroll region.
    pub fn delete_lines(&mut self, count: usize) {
        let count = count.max(1);
        let Margins { top, bottom } = self
            .margins
            .unwrap_or(Margins { top: 0, bottom: self.lines.saturating_sub(1) });
        let offset = self.line_offset();
        let cursor_row = self.cursor.y - offset;

        if !(top..=bottom).contains(&cursor_row) {
            return;
        }

        for dest in cursor_row..=bottom {
            let source = dest + count;
            if source > bottom {
                self.data_buffer.remove(&(dest + offset));
            } else {
                match self.data_buffer.get(&(source + offset)).cloned() {
                    Some(row) => {
                        self.data_buffer.insert(dest + offset, row);
                    }
                    None => {
                        self.data_buffer.remove(&(dest + offset));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn screen_with_rows(rows: &[&str]) -> Screen {
        let mut screen = Screen::new(6, 10);
        for (i, row) in rows.iter().enumerate() {
            screen.cursor_position(Some(i + 1), Some(1));
            screen.draw(row);
        }
        screen
    }

    #[test]
    fn insert_lines_pushes_rows_down() {
        let mut screen = screen_with_rows(&["aaa", "bbb", "ccc"]);
        screen.cursor_position(Some(2), Some(4));
        screen.insert_lines(1);
        assert_eq!(screen.row_text(0), "aaa");
        assert_eq!(screen.row_text(1), "");
        assert_eq!(screen.row_text(2), "bbb");
        assert_eq!(screen.row_text(3), "ccc");
        // IL performs a carriage return.
        assert_eq!(screen.cursor.x, 0);
    }

    #[test]
    fn insert_lines_drops_rows_past_the_bottom() {
        let mut screen = screen_with_rows(&["a", "b", "c", "d", "e", "f"]);
        screen.cursor_position(Some(1), Some(1));
        screen.insert_lines(2);
        assert_eq!(screen.row_text(0), "");
        assert_eq!(screen.row_text(1), "");
        assert_eq!(screen.row_text(2), "a");
        assert_eq!(screen.row_text(5), "d");
    }

    #[test]
    fn delete_lines_pulls_rows_up() {
        let mut screen = screen_with_rows(&["aaa", "bbb", "ccc"]);
        screen.cursor_position(Some(1), Some(1));
        screen.delete_lines(1);
        assert_eq!(screen.row_text(0), "bbb");
        assert_eq!(screen.row_text(1), "ccc");
        assert_eq!(screen.row_text(2), "");
    }

    #[test]
    fn line_edits_outside_the_region_are_ignored() {
        let mut screen = screen_with_rows(&["aaa", "bbb", "ccc"]);
        screen.set_margins(Some(1), Some(2));
        screen.cursor.y = 2; // below the region
        screen.insert_lines(1);
        screen.delete_lines(1);
        assert_eq!(screen.row_text(0), "aaa");
        assert_eq!(screen.row_text(1), "bbb");
        assert_eq!(screen.row_text(2), "ccc");
    }

    #[test]
    fn delete_lines_respects_the_scroll_region() {
        let mut screen = screen_with_rows(&["aaa", "bbb", "ccc", "ddd"]);
        screen.set_margins(Some(1), Some(3));
        screen.cursor_position(Some(1), Some(1));
        screen.delete_lines(1);
        // Rows inside the region shift; row 3 (outside) is untouched.
        assert_eq!(screen.row_text(0), "bbb");
        assert_eq!(screen.row_text(1), "ccc");
        assert_eq!(screen.row_text(2), "");
        assert_eq!(screen.row_text(3), "ddd");
    }
}

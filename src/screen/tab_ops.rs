// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Horizontal tab stops (HT, HTS, TBC).

use super::Screen;

impl Screen {
    /// HT: move to the next tab stop, or the last column when none remain.
    pub fn tab(&mut self) {
        let next = self
            .tabstops
            .range(self.cursor.x + 1..)
            .next()
            .copied()
            .unwrap_or(self.columns.saturating_sub(1));
        self.cursor.x = next.min(self.columns.saturating_sub(1));
    }

    /// HTS (`ESC H`): set a tab stop at the cursor column.
    pub fn set_tab_stop(&mut self) { self.tabstops.insert(self.cursor.x); }

    /// TBC: clear the stop at the cursor (`type_of` 0) or all stops (3).
    pub fn clear_tab_stop(&mut self, type_of: usize) {
        match type_of {
            0 => {
                self.tabstops.remove(&self.cursor.x);
            }
            3 => self.tabstops.clear(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tab_jumps_to_eight_column_stops() {
        let mut screen = Screen::new(24, 80);
        screen.draw("abc");
        screen.tab();
        assert_eq!(screen.cursor.x, 8);
        screen.tab();
        assert_eq!(screen.cursor.x, 16);
    }

    #[test]
    fn tab_past_the_last_stop_hits_the_right_edge() {
        let mut screen = Screen::new(24, 20);
        screen.cursor.x = 17;
        screen.tab();
        assert_eq!(screen.cursor.x, 19);
    }

    #[test]
    fn custom_stops_and_clearing() {
        let mut screen = Screen::new(24, 80);
        screen.clear_tab_stop(3);
        screen.cursor.x = 5;
        screen.set_tab_stop();
        screen.cursor.x = 0;
        screen.tab();
        assert_eq!(screen.cursor.x, 5);
        screen.clear_tab_stop(0);
        screen.cursor.x = 0;
        screen.tab();
        assert_eq!(screen.cursor.x, 79);
    }

    #[test]
    fn stops_survive_resize() {
        let mut screen = Screen::new(24, 80);
        screen.resize(24, 120);
        screen.cursor.x = 100;
        screen.tab();
        assert_eq!(screen.cursor.x, 104);
    }
}

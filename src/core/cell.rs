// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A single screen position.
//!
//! Cells are value-like and cheap to copy: the grapheme lives in a
//! [`SmallString`] (inline for anything up to four bytes, which covers all of
//! the BMP) and the style is an interned [`StyleHandle`].
//!
//! Width rules:
//! - width 1: ordinary characters
//! - width 2: East Asian wide characters; a zero-width sentinel cell (empty
//!   grapheme) always occupies the following column
//! - width 0: only the sentinel itself; combining marks are folded into the
//!   preceding cell's grapheme instead of occupying a cell

use smallstr::SmallString;

use super::style::{StyleHandle, default_style};

/// Inline storage for a cell's grapheme.
pub type CellText = SmallString<[u8; 4]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// The grapheme displayed in this cell. May hold several code points
    /// after combining-mark folding. Empty for wide-cell sentinels.
    pub text: CellText,
    /// Columns this cell occupies: 0 (sentinel), 1, or 2.
    pub width: u8,
    /// Interned style string; empty = default style.
    pub style: StyleHandle,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            text: CellText::from_str(" "),
            width: 1,
            style: default_style(),
        }
    }
}

impl Cell {
    #[must_use]
    pub fn new(ch: char, width: u8, style: StyleHandle) -> Self {
        let mut text = CellText::new();
        text.push(ch);
        Cell { text, width, style }
    }

    /// The zero-width placeholder stored after a double-width cell. The empty
    /// grapheme is distinct from every printable character, so a renderer
    /// diffing cells will repaint when the wide character is overwritten.
    #[must_use]
    pub fn sentinel(style: StyleHandle) -> Self {
        Cell {
            text: CellText::new(),
            width: 0,
            style,
        }
    }

    /// A blank cell that keeps an existing style (ECH erases content but the
    /// erased cells keep their previous background).
    #[must_use]
    pub fn blank_with_style(style: StyleHandle) -> Self {
        Cell {
            text: CellText::from_str(" "),
            width: 1,
            style,
        }
    }

    #[must_use]
    pub fn grapheme(&self) -> &str { self.text.as_str() }

    #[must_use]
    pub fn is_sentinel(&self) -> bool { self.text.is_empty() }

    /// True for cells that reflow may strip from the end of a logical line.
    #[must_use]
    pub fn is_unstyled_whitespace(&self) -> bool {
        !self.text.is_empty()
            && self.style.is_empty()
            && self.text.as_str().chars().all(char::is_whitespace)
    }

    /// Fold a zero-width combining mark into this cell's grapheme. The cell's
    /// style and width are preserved.
    pub fn push_combining(&mut self, ch: char) { self.text.push(ch); }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_cell_is_an_unstyled_space() {
        let cell = Cell::default();
        assert_eq!(cell.grapheme(), " ");
        assert_eq!(cell.width, 1);
        assert!(cell.is_unstyled_whitespace());
    }

    #[test]
    fn sentinel_is_empty_and_zero_width() {
        let cell = Cell::sentinel(default_style());
        assert!(cell.is_sentinel());
        assert_eq!(cell.width, 0);
        assert!(!cell.is_unstyled_whitespace());
    }

    #[test]
    fn combining_marks_extend_the_grapheme() {
        let mut cell = Cell::new('e', 1, default_style());
        cell.push_combining('\u{0301}');
        assert_eq!(cell.grapheme(), "e\u{0301}");
        assert_eq!(cell.width, 1);
    }
}

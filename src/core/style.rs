// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Drawing attributes, colors, and the interned style-string cache.
//!
//! SGR (Select Graphic Rendition) state is accumulated into [`Attrs`] and
//! rendered into a short style string (for example `"#ff8000 bg:#000080 bold"`)
//! whenever it changes. The string is interned through [`StyleInterner`] so
//! that cells carry a cheap `Arc<str>` handle and cell comparisons reduce to
//! pointer-and-length checks in the common case.
//!
//! Colors arrive from the wire in three shapes (16-color ANSI, 256-color
//! index, 24-bit RGB) and are all reduced to a canonical `#rrggbb` form when
//! the style string is built.

use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Interned style string. The empty string is the default (unstyled) style.
pub type StyleHandle = Arc<str>;

/// Upper bound on distinct interned style strings kept alive at once.
///
/// Real terminal sessions use a handful of styles; the cap only matters for
/// adversarial input that cycles through truecolor values.
pub const STYLE_CACHE_CAPACITY: usize = 1_000_000;

/// Returns the shared default (unstyled) style handle.
#[must_use]
pub fn default_style() -> StyleHandle { Arc::from("") }

/// A color as selected by an SGR sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermColor {
    /// One of the 16 base ANSI colors (0-7 normal, 8-15 bright).
    Ansi(u8),
    /// An index into the xterm 256-color palette.
    Indexed(u8),
    /// A 24-bit truecolor value.
    Rgb(u8, u8, u8),
}

impl TermColor {
    /// Reduce to the canonical `#rrggbb` form used in style strings.
    #[must_use]
    pub fn as_hex(&self) -> String {
        let (r, g, b) = match *self {
            TermColor::Ansi(index) => xterm_palette(index),
            TermColor::Indexed(index) => xterm_palette(index),
            TermColor::Rgb(r, g, b) => (r, g, b),
        };
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// The 16 base entries of the xterm 256-color palette.
const ANSI_BASE_COLORS: [(u8, u8, u8); 16] = [
    (0x00, 0x00, 0x00), // black
    (0x80, 0x00, 0x00), // red
    (0x00, 0x80, 0x00), // green
    (0x80, 0x80, 0x00), // yellow
    (0x00, 0x00, 0x80), // blue
    (0x80, 0x00, 0x80), // magenta
    (0x00, 0x80, 0x80), // cyan
    (0xc0, 0xc0, 0xc0), // white
    (0x80, 0x80, 0x80), // bright black
    (0xff, 0x00, 0x00), // bright red
    (0x00, 0xff, 0x00), // bright green
    (0xff, 0xff, 0x00), // bright yellow
    (0x00, 0x00, 0xff), // bright blue
    (0xff, 0x00, 0xff), // bright magenta
    (0x00, 0xff, 0xff), // bright cyan
    (0xff, 0xff, 0xff), // bright white
];

/// Resolve an xterm 256-color index to RGB.
///
/// Entries 0-15 are the base colors, 16-231 the 6x6x6 color cube, and
/// 232-255 the grayscale ramp.
#[must_use]
pub fn xterm_palette(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => ANSI_BASE_COLORS[index as usize],
        16..=231 => {
            let offset = index as usize - 16;
            let level = |component: usize| -> u8 {
                if component == 0 {
                    0
                } else {
                    (55 + 40 * component) as u8
                }
            };
            (
                level(offset / 36),
                level((offset / 6) % 6),
                level(offset % 6),
            )
        }
        232..=255 => {
            let gray = 8 + 10 * (index - 232);
            (gray, gray, gray)
        }
    }
}

/// Current drawing attributes, mutated by SGR parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attrs {
    pub fg: Option<TermColor>,
    pub bg: Option<TermColor>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub blink: bool,
    pub reverse: bool,
    pub hidden: bool,
}

impl Attrs {
    /// Reset every attribute to its default, as SGR 0 does.
    pub fn reset(&mut self) { *self = Attrs::default(); }

    /// Render into the canonical style string.
    ///
    /// The token order is fixed (foreground, background, then flags) so that
    /// equal attribute sets always intern to the same string.
    #[must_use]
    pub fn to_style_string(&self) -> String {
        let mut out = String::new();
        if let Some(fg) = &self.fg {
            out.push_str(&fg.as_hex());
        }
        if let Some(bg) = &self.bg {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str("bg:");
            out.push_str(&bg.as_hex());
        }
        for (flag, token) in [
            (self.bold, "bold"),
            (self.italic, "italic"),
            (self.underline, "underline"),
            (self.blink, "blink"),
            (self.reverse, "reverse"),
            (self.hidden, "hidden"),
        ] {
            if flag {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(token);
            }
        }
        out
    }
}

/// Size-bounded intern cache for style strings.
///
/// Per-screen rather than process-wide: the single-loop model means no
/// synchronization is needed, and dropping a screen drops its cache.
#[derive(Debug)]
pub struct StyleInterner {
    map: FxHashMap<String, StyleHandle>,
    capacity: usize,
    empty: StyleHandle,
}

impl Default for StyleInterner {
    fn default() -> Self { StyleInterner::new(STYLE_CACHE_CAPACITY) }
}

impl StyleInterner {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        StyleInterner {
            map: FxHashMap::default(),
            capacity: capacity.max(1),
            empty: default_style(),
        }
    }

    /// Shared handle for the unstyled style.
    #[must_use]
    pub fn empty(&self) -> StyleHandle { self.empty.clone() }

    /// Intern a style string, returning a shared handle.
    pub fn intern(&mut self, style: &str) -> StyleHandle {
        if style.is_empty() {
            return self.empty.clone();
        }
        if let Some(handle) = self.map.get(style) {
            return handle.clone();
        }
        // Simple cap: evict wholesale instead of tracking recency. Interned
        // handles held by live cells stay valid; only the cache restarts.
        if self.map.len() >= self.capacity {
            self.map.clear();
        }
        let handle: StyleHandle = Arc::from(style);
        self.map.insert(style.to_string(), handle.clone());
        handle
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn truecolor_reduces_to_hex() {
        assert_eq!(TermColor::Rgb(255, 128, 0).as_hex(), "#ff8000");
    }

    #[test]
    fn ansi_and_indexed_share_the_palette() {
        assert_eq!(TermColor::Ansi(1).as_hex(), "#800000");
        assert_eq!(TermColor::Indexed(1).as_hex(), "#800000");
        // Cube entry 196 is pure red.
        assert_eq!(TermColor::Indexed(196).as_hex(), "#ff0000");
        // Grayscale ramp.
        assert_eq!(TermColor::Indexed(232).as_hex(), "#080808");
        assert_eq!(TermColor::Indexed(255).as_hex(), "#eeeeee");
    }

    #[test]
    fn style_string_token_order_is_stable() {
        let attrs = Attrs {
            fg: Some(TermColor::Rgb(255, 128, 0)),
            bg: Some(TermColor::Ansi(4)),
            bold: true,
            underline: true,
            ..Attrs::default()
        };
        assert_eq!(attrs.to_style_string(), "#ff8000 bg:#000080 bold underline");
    }

    #[test]
    fn default_attrs_render_empty() {
        assert_eq!(Attrs::default().to_style_string(), "");
    }

    #[test]
    fn interner_dedupes_and_respects_cap() {
        let mut interner = StyleInterner::new(2);
        let a1 = interner.intern("bold");
        let a2 = interner.intern("bold");
        assert!(Arc::ptr_eq(&a1, &a2));

        // Exceeding the cap clears the cache but existing handles stay valid.
        let _b = interner.intern("italic");
        let _c = interner.intern("underline");
        assert_eq!(&*a1, "bold");
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! SGR (Select Graphic Rendition) handling: colors and text attributes.

use super::Screen;
use crate::core::TermColor;

// SGR parameter codes. 38/48 open an extended color selection whose next
// parameter picks the flavor.
const SGR_RESET: u16 = 0;
const SGR_BOLD: u16 = 1;
const SGR_ITALIC: u16 = 3;
const SGR_UNDERLINE: u16 = 4;
const SGR_BLINK: u16 = 5;
const SGR_RAPID_BLINK: u16 = 6;
const SGR_REVERSE: u16 = 7;
const SGR_HIDDEN: u16 = 8;
const SGR_RESET_BOLD: u16 = 22;
const SGR_RESET_ITALIC: u16 = 23;
const SGR_RESET_UNDERLINE: u16 = 24;
const SGR_RESET_BLINK: u16 = 25;
const SGR_RESET_REVERSE: u16 = 27;
const SGR_RESET_HIDDEN: u16 = 28;
const SGR_FG_EXTENDED: u16 = 38;
const SGR_FG_DEFAULT: u16 = 39;
const SGR_BG_EXTENDED: u16 = 48;
const SGR_BG_DEFAULT: u16 = 49;
const EXTENDED_256: u16 = 5;
const EXTENDED_RGB: u16 = 2;

impl Screen {
    /// Apply a full SGR parameter list. An empty list means reset, like
    /// `CSI m`. Unknown codes are ignored.
    ///
    /// The computed attributes are rendered into a short interned style
    /// string so later cell comparisons stay cheap.
    pub fn select_graphic_rendition(&mut self, params: &[u16]) {
        let params: &[u16] = if params.is_empty() { &[SGR_RESET] } else { params };

        let mut index = 0;
        while index < params.len() {
            let param = params[index];
            index += 1;
            match param {
                SGR_RESET => self.attrs.reset(),
                SGR_BOLD => self.attrs.bold = true,
                SGR_ITALIC => self.attrs.italic = true,
                SGR_UNDERLINE => self.attrs.underline = true,
                // Fast blink folds into blink.
                SGR_BLINK | SGR_RAPID_BLINK => self.attrs.blink = true,
                SGR_REVERSE => self.attrs.reverse = true,
                SGR_HIDDEN => self.attrs.hidden = true,
                SGR_RESET_BOLD => self.attrs.bold = false,
                SGR_RESET_ITALIC => self.attrs.italic = false,
                SGR_RESET_UNDERLINE => self.attrs.underline = false,
                SGR_RESET_BLINK => self.attrs.blink = false,
                SGR_RESET_REVERSE => self.attrs.reverse = false,
                SGR_RESET_HIDDEN => self.attrs.hidden = false,
                30..=37 => self.attrs.fg = Some(TermColor::Ansi((param - 30) as u8)),
                SGR_FG_DEFAULT => self.attrs.fg = None,
                40..=47 => self.attrs.bg = Some(TermColor::Ansi((param - 40) as u8)),
                SGR_BG_DEFAULT => self.attrs.bg = None,
                90..=97 => self.attrs.fg = Some(TermColor::Ansi((param - 90 + 8) as u8)),
                100..=107 => self.attrs.bg = Some(TermColor::Ansi((param - 100 + 8) as u8)),
                SGR_FG_EXTENDED | SGR_BG_EXTENDED => {
                    let Some(color) = extended_color(params, &mut index) else {
                        // Truncated selection: consume nothing further and
                        // leave the color untouched.
                        break;
                    };
                    if param == SGR_FG_EXTENDED {
                        self.attrs.fg = Some(color);
                    } else {
                        self.attrs.bg = Some(color);
                    }
                }
                _ => {
                    tracing::trace!("SGR {param}: unsupported parameter ignored");
                }
            }
        }

        self.style = self.styles.intern(&self.attrs.to_style_string());
    }
}

/// Parse the tail of a 38/48 extended color selection, advancing `index`
/// past the consumed parameters.
fn extended_color(params: &[u16], index: &mut usize) -> Option<TermColor> {
    let flavor = *params.get(*index)?;
    *index += 1;
    match flavor {
        EXTENDED_256 => {
            let value = *params.get(*index)?;
            *index += 1;
            Some(TermColor::Indexed(value.min(255) as u8))
        }
        EXTENDED_RGB => {
            let r = *params.get(*index)?;
            let g = *params.get(*index + 1)?;
            let b = *params.get(*index + 2)?;
            *index += 3;
            Some(TermColor::Rgb(
                r.min(255) as u8,
                g.min(255) as u8,
                b.min(255) as u8,
            ))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn basic_colors_and_flags() {
        let mut screen = Screen::new(24, 80);
        screen.select_graphic_rendition(&[1, 31, 44]);
        assert!(screen.attrs.bold);
        assert_eq!(screen.attrs.fg, Some(TermColor::Ansi(1)));
        assert_eq!(screen.attrs.bg, Some(TermColor::Ansi(4)));
        assert_eq!(screen.current_style(), "#800000 bg:#000080 bold");
    }

    #[test]
    fn bright_colors_map_to_the_upper_half() {
        let mut screen = Screen::new(24, 80);
        screen.select_graphic_rendition(&[91]);
        assert_eq!(screen.attrs.fg, Some(TermColor::Ansi(9)));
    }

    #[test]
    fn truecolor_and_256_color() {
        let mut screen = Screen::new(24, 80);
        screen.select_graphic_rendition(&[38, 2, 255, 128, 0]);
        assert_eq!(screen.current_style(), "#ff8000");

        screen.select_graphic_rendition(&[48, 5, 196]);
        assert_eq!(screen.current_style(), "#ff8000 bg:#ff0000");
    }

    #[test]
    fn reset_clears_everything() {
        let mut screen = Screen::new(24, 80);
        screen.select_graphic_rendition(&[1, 4, 38, 5, 10]);
        screen.select_graphic_rendition(&[0]);
        assert_eq!(screen.current_style(), "");
        assert_eq!(screen.attrs, crate::core::Attrs::default());
    }

    #[test]
    fn empty_parameter_list_is_a_reset() {
        let mut screen = Screen::new(24, 80);
        screen.select_graphic_rendition(&[1]);
        screen.select_graphic_rendition(&[]);
        assert!(!screen.attrs.bold);
    }

    #[test]
    fn partial_resets_only_touch_their_flag() {
        let mut screen = Screen::new(24, 80);
        screen.select_graphic_rendition(&[1, 4, 5, 7]);
        screen.select_graphic_rendition(&[24]);
        assert!(screen.attrs.bold);
        assert!(!screen.attrs.underline);
        assert!(screen.attrs.blink);
        assert!(screen.attrs.reverse);
    }

    #[test]
    fn fast_blink_folds_to_blink() {
        let mut screen = Screen::new(24, 80);
        screen.select_graphic_rendition(&[6]);
        assert!(screen.attrs.blink);
    }

    #[test]
    fn truncated_extended_color_is_ignored() {
        let mut screen = Screen::new(24, 80);
        screen.select_graphic_rendition(&[38, 2, 10]);
        assert_eq!(screen.attrs.fg, None);
        screen.select_graphic_rendition(&[38]);
        assert_eq!(screen.attrs.fg, None);
    }

    #[test]
    fn unknown_codes_are_ignored() {
        let mut screen = Screen::new(24, 80);
        screen.select_graphic_rendition(&[1, 99, 31]);
        assert!(screen.attrs.bold);
        assert_eq!(screen.attrs.fg, Some(TermColor::Ansi(1)));
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`vte::Perform`] implementation: routes parsed sequences to [`Screen`]
//! operations.
//!
//! ```text
//! Child process (vim, bash, ...)
//!         |
//!     Backend (byte stream)
//!         |
//!     vte::Parser (tokenizes: print / execute / csi / esc / osc)
//!         |
//!     ScreenPerformer  [THIS MODULE]
//!         |
//!     Screen state (grid, cursor, modes, scrollback)
//! ```
//!
//! The performer is transient: one is created per `feed` call, borrowing the
//! screen. All persistent state lives on the screen; the `vte::Parser`
//! itself (which must survive chunk boundaries to finish split sequences)
//! lives in [`super::AnsiParser`].

use vte::{Params, Perform};

use super::{params::ParamsExt, protocols::{csi_codes, esc_codes}};
use crate::screen::Screen;

pub(crate) struct ScreenPerformer<'a> {
    pub screen: &'a mut Screen,
}

impl Perform for ScreenPerformer<'_> {
    fn print(&mut self, ch: char) { self.screen.draw_char(ch); }

    fn execute(&mut self, byte: u8) {
        match byte {
            esc_codes::BELL => self.screen.bell(),
            esc_codes::BACKSPACE => self.screen.backspace(),
            esc_codes::TAB => self.screen.tab(),
            esc_codes::LINE_FEED | esc_codes::VERTICAL_TAB | esc_codes::FORM_FEED => {
                self.screen.linefeed();
            }
            esc_codes::CARRIAGE_RETURN => self.screen.carriage_return(),
            esc_codes::SHIFT_OUT => self.screen.shift_out(),
            esc_codes::SHIFT_IN => self.screen.shift_in(),
            _ => {}
        }
    }

    fn csi_dispatch(
        &mut self,
        params: &Params,
        intermediates: &[u8],
        _ignore: bool,
        dispatch_char: char,
    ) {
        let screen = &mut *self.screen;
        match dispatch_char {
            csi_codes::CUU_CURSOR_UP => screen.cursor_up(params.nth_non_zero(0) as usize),
            csi_codes::CUD_CURSOR_DOWN => {
                screen.cursor_down(params.nth_non_zero(0) as usize);
            }
            csi_codes::CUF_CURSOR_FORWARD => {
                screen.cursor_forward(params.nth_non_zero(0) as usize);
            }
            csi_codes::CUB_CURSOR_BACKWARD => {
                screen.cursor_back(params.nth_non_zero(0) as usize);
            }
            csi_codes::CNL_CURSOR_NEXT_LINE => {
                screen.cursor_down1(params.nth_non_zero(0) as usize);
            }
            csi_codes::CPL_CURSOR_PREV_LINE => {
                screen.cursor_up1(params.nth_non_zero(0) as usize);
            }
            csi_codes::CHA_CURSOR_COLUMN => {
                screen.cursor_to_column(Some(params.nth_non_zero(0) as usize));
            }
            csi_codes::CUP_CURSOR_POSITION | csi_codes::HVP_CURSOR_POSITION => {
                screen.cursor_position(
                    Some(params.nth_non_zero(0) as usize),
                    Some(params.nth_non_zero(1) as usize),
                );
            }
            csi_codes::VPA_VERTICAL_POSITION => {
                screen.cursor_to_line(Some(params.nth_non_zero(0) as usize));
            }
            csi_codes::ED_ERASE_DISPLAY => {
                screen.erase_in_display(params.nth_opt(0).unwrap_or(0) as usize);
            }
            csi_codes::EL_ERASE_LINE => {
                screen.erase_in_line(params.nth_opt(0).unwrap_or(0) as usize);
            }
            csi_codes::ICH_INSERT_CHAR => {
                screen.insert_characters(params.nth_non_zero(0) as usize);
            }
            csi_codes::DCH_DELETE_CHAR => {
                screen.delete_characters(params.nth_non_zero(0) as usize);
            }
            csi_codes::ECH_ERASE_CHAR => {
                screen.erase_characters(params.nth_non_zero(0) as usize);
            }
            csi_codes::IL_INSERT_LINE => {
                screen.insert_lines(params.nth_non_zero(0) as usize);
            }
            csi_codes::DL_DELETE_LINE => {
                screen.delete_lines(params.nth_non_zero(0) as usize);
            }
            csi_codes::SU_SCROLL_UP => screen.scroll_up(params.nth_non_zero(0) as usize),
            csi_codes::SD_SCROLL_DOWN => {
                screen.scroll_down(params.nth_non_zero(0) as usize);
            }
            csi_codes::DECSTBM_SET_MARGINS => {
                let top = params.nth_opt(0);
                let bottom = params.nth_opt(1);
                // `CSI r`, `CSI 0 r`, and `CSI 0;0 r` all reset to
                // full-screen scrolling.
                match (top, bottom) {
                    (None | Some(0), None) | (Some(0), Some(0)) => screen.reset_margins(),
                    _ => screen.set_margins(
                        top.map(|value| value as usize),
                        bottom.map(|value| value as usize),
                    ),
                }
            }
            csi_codes::SM_SET_MODE | csi_codes::RM_RESET_MODE => {
                let private = intermediates.contains(&csi_codes::PRIVATE_MODE_MARKER);
                let codes: Vec<u32> =
                    params.flatten().iter().map(|&code| u32::from(code)).collect();
                if dispatch_char == csi_codes::SM_SET_MODE {
                    screen.set_mode(&codes, private);
                } else {
                    screen.reset_mode(&codes, private);
                }
            }
            csi_codes::SGR_SET_GRAPHICS => {
                screen.select_graphic_rendition(&params.flatten());
            }
            csi_codes::DSR_DEVICE_STATUS => {
                screen.report_device_status(params.nth_opt(0).unwrap_or(0) as usize);
            }
            csi_codes::DA_DEVICE_ATTRIBUTES => screen.report_device_attributes(),
            csi_codes::SCP_SAVE_CURSOR => screen.save_cursor(),
            csi_codes::RCP_RESTORE_CURSOR => screen.restore_cursor(),
            csi_codes::TBC_TAB_CLEAR => {
                screen.clear_tab_stop(params.nth_opt(0).unwrap_or(0) as usize);
            }
            _ => {
                tracing::warn!("CSI {dispatch_char}: unknown final byte, sequence ignored");
            }
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        match intermediates {
            [] => match byte {
                esc_codes::DECSC_SAVE_CURSOR => self.screen.save_cursor(),
                esc_codes::DECRC_RESTORE_CURSOR => self.screen.restore_cursor(),
                esc_codes::IND_INDEX => self.screen.index(),
                esc_codes::RI_REVERSE_INDEX => self.screen.reverse_index(),
                esc_codes::NEL_NEXT_LINE => self.screen.next_line(),
                esc_codes::HTS_TAB_SET => self.screen.set_tab_stop(),
                esc_codes::RIS_RESET => self.screen.reset(),
                _ => {}
            },
            esc_codes::G0_CHARSET_INTERMEDIATE => {
                self.screen.set_charset(byte as char, '(');
            }
            esc_codes::G1_CHARSET_INTERMEDIATE => {
                self.screen.set_charset(byte as char, ')');
            }
            esc_codes::SHARP_INTERMEDIATE => {
                if byte == esc_codes::DECALN_ALIGNMENT {
                    self.screen.alignment_display();
                }
            }
            _ => {}
        }
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        let Some(code) = params.first().and_then(|code| std::str::from_utf8(code).ok())
        else {
            return;
        };
        match code {
            // OSC 0 sets both; OSC 1 the icon name; OSC 2 the title.
            "0" | "1" | "2" => {
                let Some(text) = params.get(1).map(|text| String::from_utf8_lossy(text))
                else {
                    return;
                };
                if code != "2" {
                    self.screen.set_icon_name(&text);
                }
                if code != "1" {
                    self.screen.set_title(&text);
                }
            }
            // OSC 8 ; params ; URI
            "8" => {
                if let Some(uri) = params.get(2).map(|uri| String::from_utf8_lossy(uri)) {
                    if !uri.is_empty() {
                        self.screen.set_hyperlink(&uri);
                    }
                }
            }
            _ => {}
        }
    }

    // DCS sequences (sixel, ReGIS, protocol extensions) are consumed and
    // ignored, as are SOS/PM/APC strings.
    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _c: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}
}

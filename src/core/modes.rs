// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Terminal mode flags (SM/RM and DECSET/DECRST).
//!
//! ANSI modes (`CSI n h`) and DEC private modes (`CSI ? n l`) share one set.
//! To keep a private code from colliding with an ANSI code of the same
//! number, private codes are stored shifted left by [`PRIVATE_MODE_SHIFT`]
//! bits. Every `DEC*` constant below is **pre-shifted**; raw codes parsed off
//! the wire with a `?` prefix go through [`shift_private`] before they touch
//! the set.
//!
//! Example: checking application-cursor mode means asking whether
//! `1 << 5` is in the set, not `1` (which would be ANSI mode 1, GATM).

use rustc_hash::FxHashSet;

/// Bit offset applied to DEC private mode codes before storage.
pub const PRIVATE_MODE_SHIFT: u32 = 5;

/// Shift a raw private mode code into its storage form.
#[must_use]
pub const fn shift_private(code: u16) -> u32 { (code as u32) << PRIVATE_MODE_SHIFT }

// ANSI modes (stored unshifted).

/// IRM: insert (set) vs replace (reset) on `draw`.
pub const IRM_INSERT: u32 = 4;
/// LNM: linefeed also performs a carriage return when set.
pub const LNM_NEWLINE: u32 = 20;

// DEC private modes (stored pre-shifted).

/// DECCKM: application cursor keys (arrows send SS3 sequences).
pub const DECCKM_APPLICATION_CURSOR: u32 = shift_private(1);
/// DECCOLM: 132-column mode; toggling clears the screen and homes the cursor.
pub const DECCOLM_132_COLUMNS: u32 = shift_private(3);
/// DECSCNM: whole-screen reverse video.
pub const DECSCNM_REVERSE_VIDEO: u32 = shift_private(5);
/// DECOM: origin mode; row addressing is scroll-region-relative.
pub const DECOM_ORIGIN: u32 = shift_private(6);
/// DECAWM: autowrap at the right margin.
pub const DECAWM_AUTO_WRAP: u32 = shift_private(7);
/// DECTCEM: text cursor enable (visibility).
pub const DECTCEM_SHOW_CURSOR: u32 = shift_private(25);
/// X10 mouse reporting.
pub const MOUSE_REPORT_X10: u32 = shift_private(1000);
/// SGR extended mouse reporting.
pub const MOUSE_REPORT_SGR: u32 = shift_private(1006);
/// urxvt extended mouse reporting.
pub const MOUSE_REPORT_URXVT: u32 = shift_private(1015);
/// Alternate screen buffer sentinel (save/restore screen + cursor).
pub const ALT_SCREEN_BUFFER: u32 = shift_private(1049);
/// Bracketed paste.
pub const BRACKETED_PASTE: u32 = shift_private(2004);

/// The set of currently active mode flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeSet {
    active: FxHashSet<u32>,
}

impl ModeSet {
    #[must_use]
    pub fn new() -> Self { ModeSet::default() }

    #[must_use]
    pub fn contains(&self, mode: u32) -> bool { self.active.contains(&mode) }

    pub fn insert(&mut self, mode: u32) { self.active.insert(mode); }

    pub fn remove(&mut self, mode: u32) { self.active.remove(&mode); }

    pub fn clear(&mut self) { self.active.clear(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_codes_do_not_collide_with_ansi_codes() {
        // ANSI mode 4 (IRM) vs private mode 4 (DECSCLM) must be distinct.
        assert_ne!(IRM_INSERT, shift_private(4));
        assert_eq!(DECAWM_AUTO_WRAP, 7 << 5);
    }

    #[test]
    fn set_semantics_are_idempotent() {
        let mut modes = ModeSet::new();
        modes.insert(DECAWM_AUTO_WRAP);
        modes.insert(DECAWM_AUTO_WRAP);
        assert!(modes.contains(DECAWM_AUTO_WRAP));
        modes.remove(DECAWM_AUTO_WRAP);
        modes.remove(DECAWM_AUTO_WRAP);
        assert!(!modes.contains(DECAWM_AUTO_WRAP));
    }
}

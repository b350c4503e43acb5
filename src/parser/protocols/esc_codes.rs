// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Direct ESC (non-CSI) codes and C0 control bytes.
//!
//! ESC sequences predate CSI and carry no parameters: `ESC final`, or
//! `ESC intermediate final` for charset designation (`ESC ( F`, `ESC ) F`)
//! and the DEC screen-alignment test (`ESC # 8`).

use std::fmt::{self, Display};

// C0 control bytes, dispatched through `execute`.

/// BEL (0x07): ring the bell.
pub const BELL: u8 = 0x07;
/// BS (0x08): cursor one column left.
pub const BACKSPACE: u8 = 0x08;
/// HT (0x09): next tab stop.
pub const TAB: u8 = 0x09;
/// LF (0x0A): linefeed.
pub const LINE_FEED: u8 = 0x0a;
/// VT (0x0B): treated as linefeed.
pub const VERTICAL_TAB: u8 = 0x0b;
/// FF (0x0C): treated as linefeed.
pub const FORM_FEED: u8 = 0x0c;
/// CR (0x0D): to the start of the line.
pub const CARRIAGE_RETURN: u8 = 0x0d;
/// SO (0x0E): activate G1.
pub const SHIFT_OUT: u8 = 0x0e;
/// SI (0x0F): activate G0.
pub const SHIFT_IN: u8 = 0x0f;

// ESC finals.

/// ESC 7 (DECSC): save cursor and context.
pub const DECSC_SAVE_CURSOR: u8 = b'7';
/// ESC 8 (DECRC): restore cursor and context.
pub const DECRC_RESTORE_CURSOR: u8 = b'8';
/// ESC D (IND): index down, scrolling at the bottom margin.
pub const IND_INDEX: u8 = b'D';
/// ESC M (RI): reverse index, scrolling at the top margin.
pub const RI_REVERSE_INDEX: u8 = b'M';
/// ESC E (NEL): next line; unlike LF this always goes to the left margin.
pub const NEL_NEXT_LINE: u8 = b'E';
/// ESC H (HTS): set a tab stop at the cursor.
pub const HTS_TAB_SET: u8 = b'H';
/// ESC c (RIS): reset to initial state.
pub const RIS_RESET: u8 = b'c';

// Intermediates.

/// `ESC (`: designate G0.
pub const G0_CHARSET_INTERMEDIATE: &[u8] = b"(";
/// `ESC )`: designate G1.
pub const G1_CHARSET_INTERMEDIATE: &[u8] = b")";
/// `ESC #`: DEC line/screen test prefix.
pub const SHARP_INTERMEDIATE: &[u8] = b"#";
/// `ESC # 8` (DECALN): fill the screen with `E`.
pub const DECALN_ALIGNMENT: u8 = b'8';

/// Builder for ESC sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscSequence {
    SaveCursor,
    RestoreCursor,
    Index,
    ReverseIndex,
    NextLine,
    TabSet,
    Reset,
    /// `ESC ( F`
    DesignateG0(char),
    /// `ESC ) F`
    DesignateG1(char),
    AlignmentDisplay,
}

impl Display for EscSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x1b")?;
        match self {
            EscSequence::SaveCursor => write!(f, "7"),
            EscSequence::RestoreCursor => write!(f, "8"),
            EscSequence::Index => write!(f, "D"),
            EscSequence::ReverseIndex => write!(f, "M"),
            EscSequence::NextLine => write!(f, "E"),
            EscSequence::TabSet => write!(f, "H"),
            EscSequence::Reset => write!(f, "c"),
            EscSequence::DesignateG0(code) => write!(f, "({code}"),
            EscSequence::DesignateG1(code) => write!(f, "){code}"),
            EscSequence::AlignmentDisplay => write!(f, "#8"),
        }
    }
}

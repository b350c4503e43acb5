// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Control Sequence Introducer (CSI) codes.
//!
//! CSI sequences follow the pattern `ESC [ params final`, optionally with a
//! `?` marker after the bracket for DEC private modes. The final byte
//! selects the operation; parameters are semicolon-separated numbers whose
//! defaults are operation-specific (1 for counts and positions, 0 for
//! selector-style parameters like ED/EL).
//!
//! The [`CsiSequence`] builder mirrors the dispatch table: tests (and hosts
//! that need to synthesize terminal input) can format a sequence instead of
//! hand-writing escape bytes.

use std::fmt::{self, Display};

// Cursor movement.

/// CSI A: cursor up (CUU).
pub const CUU_CURSOR_UP: char = 'A';
/// CSI B: cursor down (CUD).
pub const CUD_CURSOR_DOWN: char = 'B';
/// CSI C: cursor forward (CUF).
pub const CUF_CURSOR_FORWARD: char = 'C';
/// CSI D: cursor backward (CUB).
pub const CUB_CURSOR_BACKWARD: char = 'D';
/// CSI E: cursor next line (CNL) - down n lines, to column 1.
pub const CNL_CURSOR_NEXT_LINE: char = 'E';
/// CSI F: cursor previous line (CPL) - up n lines, to column 1.
pub const CPL_CURSOR_PREV_LINE: char = 'F';
/// CSI G: cursor horizontal absolute (CHA).
pub const CHA_CURSOR_COLUMN: char = 'G';
/// CSI H: cursor position (CUP).
pub const CUP_CURSOR_POSITION: char = 'H';
/// CSI f: horizontal and vertical position (HVP); same as CUP.
pub const HVP_CURSOR_POSITION: char = 'f';
/// CSI d: vertical position absolute (VPA).
pub const VPA_VERTICAL_POSITION: char = 'd';

// Erasing.

/// CSI J: erase in display (ED). 0 = cursor to end, 1 = start to cursor,
/// 2 = whole display, 3 = display and scrollback.
pub const ED_ERASE_DISPLAY: char = 'J';
/// CSI K: erase in line (EL). 0 = cursor to end, 1 = start to cursor,
/// 2 = whole line.
pub const EL_ERASE_LINE: char = 'K';

// Editing.

/// CSI @: insert blank characters (ICH).
pub const ICH_INSERT_CHAR: char = '@';
/// CSI P: delete characters (DCH).
pub const DCH_DELETE_CHAR: char = 'P';
/// CSI X: erase characters (ECH); blanks without shifting.
pub const ECH_ERASE_CHAR: char = 'X';
/// CSI L: insert lines (IL).
pub const IL_INSERT_LINE: char = 'L';
/// CSI M: delete lines (DL).
pub const DL_DELETE_LINE: char = 'M';

// Scrolling and margins.

/// CSI S: scroll up (SU).
pub const SU_SCROLL_UP: char = 'S';
/// CSI T: scroll down (SD).
pub const SD_SCROLL_DOWN: char = 'T';
/// CSI r: set top and bottom margins (DECSTBM).
pub const DECSTBM_SET_MARGINS: char = 'r';

// Modes, tabs, reports.

/// CSI h: set mode (SM); with `?`, DECSET.
pub const SM_SET_MODE: char = 'h';
/// CSI l: reset mode (RM); with `?`, DECRST.
pub const RM_RESET_MODE: char = 'l';
/// CSI g: tab clear (TBC). 0 = at cursor, 3 = all.
pub const TBC_TAB_CLEAR: char = 'g';
/// CSI m: select graphic rendition (SGR).
pub const SGR_SET_GRAPHICS: char = 'm';
/// CSI n: device status report (DSR). 5 = status, 6 = cursor position.
pub const DSR_DEVICE_STATUS: char = 'n';
/// CSI c: device attributes (DA).
pub const DA_DEVICE_ATTRIBUTES: char = 'c';
/// CSI s: save cursor position (SCP); CSI twin of `ESC 7`.
pub const SCP_SAVE_CURSOR: char = 's';
/// CSI u: restore cursor position (RCP); CSI twin of `ESC 8`.
pub const RCP_RESTORE_CURSOR: char = 'u';

/// Marker byte for DEC private modes, e.g. `CSI ? 1049 h`.
pub const PRIVATE_MODE_MARKER: u8 = b'?';

/// Builder for CSI sequences, used by tests and input synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsiSequence {
    CursorUp(u16),
    CursorDown(u16),
    CursorForward(u16),
    CursorBackward(u16),
    CursorNextLine(u16),
    CursorPrevLine(u16),
    CursorColumn(u16),
    /// 1-based row and column.
    CursorPosition { row: u16, col: u16 },
    VerticalPosition(u16),
    EraseDisplay(u16),
    EraseLine(u16),
    InsertChar(u16),
    DeleteChar(u16),
    EraseChar(u16),
    InsertLine(u16),
    DeleteLine(u16),
    ScrollUp(u16),
    ScrollDown(u16),
    SetMargins { top: Option<u16>, bottom: Option<u16> },
    Sgr(Vec<u16>),
    DeviceStatusReport(u16),
    DeviceAttributes,
    SaveCursor,
    RestoreCursor,
    EnablePrivateMode(u16),
    DisablePrivateMode(u16),
    TabClear(u16),
}

impl Display for CsiSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x1b[")?;
        match self {
            CsiSequence::CursorUp(n) => write!(f, "{n}{CUU_CURSOR_UP}"),
            CsiSequence::CursorDown(n) => write!(f, "{n}{CUD_CURSOR_DOWN}"),
            CsiSequence::CursorForward(n) => write!(f, "{n}{CUF_CURSOR_FORWARD}"),
            CsiSequence::CursorBackward(n) => write!(f, "{n}{CUB_CURSOR_BACKWARD}"),
            CsiSequence::CursorNextLine(n) => write!(f, "{n}{CNL_CURSOR_NEXT_LINE}"),
            CsiSequence::CursorPrevLine(n) => write!(f, "{n}{CPL_CURSOR_PREV_LINE}"),
            CsiSequence::CursorColumn(n) => write!(f, "{n}{CHA_CURSOR_COLUMN}"),
            CsiSequence::CursorPosition { row, col } => {
                write!(f, "{row};{col}{CUP_CURSOR_POSITION}")
            }
            CsiSequence::VerticalPosition(n) => write!(f, "{n}{VPA_VERTICAL_POSITION}"),
            CsiSequence::EraseDisplay(n) => write!(f, "{n}{ED_ERASE_DISPLAY}"),
            CsiSequence::EraseLine(n) => write!(f, "{n}{EL_ERASE_LINE}"),
            CsiSequence::InsertChar(n) => write!(f, "{n}{ICH_INSERT_CHAR}"),
            CsiSequence::DeleteChar(n) => write!(f, "{n}{DCH_DELETE_CHAR}"),
            CsiSequence::EraseChar(n) => write!(f, "{n}{ECH_ERASE_CHAR}"),
            CsiSequence::InsertLine(n) => write!(f, "{n}{IL_INSERT_LINE}"),
            CsiSequence::DeleteLine(n) => write!(f, "{n}{DL_DELETE_LINE}"),
            CsiSequence::ScrollUp(n) => write!(f, "{n}{SU_SCROLL_UP}"),
            CsiSequence::ScrollDown(n) => write!(f, "{n}{SD_SCROLL_DOWN}"),
            CsiSequence::SetMargins { top, bottom } => {
                if let Some(top) = top {
                    write!(f, "{top}")?;
                }
                if let Some(bottom) = bottom {
                    write!(f, ";{bottom}")?;
                }
                write!(f, "{DECSTBM_SET_MARGINS}")
            }
            CsiSequence::Sgr(params) => {
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ";")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, "{SGR_SET_GRAPHICS}")
            }
            CsiSequence::DeviceStatusReport(n) => write!(f, "{n}{DSR_DEVICE_STATUS}"),
            CsiSequence::DeviceAttributes => write!(f, "{DA_DEVICE_ATTRIBUTES}"),
            CsiSequence::SaveCursor => write!(f, "{SCP_SAVE_CURSOR}"),
            CsiSequence::RestoreCursor => write!(f, "{RCP_RESTORE_CURSOR}"),
            CsiSequence::EnablePrivateMode(n) => write!(f, "?{n}{SM_SET_MODE}"),
            CsiSequence::DisablePrivateMode(n) => write!(f, "?{n}{RM_RESET_MODE}"),
            CsiSequence::TabClear(n) => write!(f, "{n}{TBC_TAB_CLEAR}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sequences_format_as_expected() {
        assert_eq!(CsiSequence::CursorUp(2).to_string(), "\x1b[2A");
        assert_eq!(
            CsiSequence::CursorPosition { row: 5, col: 10 }.to_string(),
            "\x1b[5;10H"
        );
        assert_eq!(CsiSequence::EnablePrivateMode(1049).to_string(), "\x1b[?1049h");
        assert_eq!(CsiSequence::Sgr(vec![38, 5, 196]).to_string(), "\x1b[38;5;196m");
        assert_eq!(
            CsiSequence::SetMargins { top: Some(2), bottom: Some(10) }.to_string(),
            "\x1b[2;10r"
        );
        assert_eq!(
            CsiSequence::SetMargins { top: None, bottom: None }.to_string(),
            "\x1b[r"
        );
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Host-side input translation: abstract keys and mouse events to the byte
//! sequences a VT100 child expects.

pub mod keys;
pub mod mouse;

pub use keys::{CursorKeyMode, TerminalKey, key_to_bytes};
pub use mouse::{MouseEvent, MouseEventKind, mouse_report};

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # ptyterm
//!
//! An embeddable terminal emulator core. Feed it the raw byte stream of a
//! child process (or a remote interactive channel) speaking the VT100/xterm
//! protocol, and it maintains the in-memory model of what a physical
//! terminal would display: a cell grid with scrollback, a cursor, colors
//! and attributes, modes, margins, tab stops, an alternate screen, and
//! dynamic reflow on resize.
//!
//! This crate deliberately does **not** paint anything. It exposes screen
//! state for a host renderer to sample, and a uniform backend contract so
//! the same core drives a local forked process, a ConPTY child on Windows,
//! or an SSH-style channel.
//!
//! ```text
//!  child / channel ──> Backend ──> TerminalProcess ──> AnsiParser ──> Screen
//!       ^                               │                               │
//!       └── keys / mouse / paste ───────┘          invalidate ──> host renderer
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use ptyterm::{ProcessInput, PtyCommandBuilder, PtyProcessBackend, TerminalProcess};
//!
//! # async fn demo() -> miette::Result<()> {
//! let command = PtyCommandBuilder::new("bash").build()?;
//! let backend = PtyProcessBackend::new(command);
//! let process = TerminalProcess::new(
//!     Box::new(backend),
//!     Arc::new(|| { /* schedule a repaint */ }),
//! );
//!
//! let session = process.spawn();
//! session.input.send(ProcessInput::Text { data: "ls\r".into(), paste: false }).ok();
//!
//! // A renderer samples the screen whenever invalidate fires:
//! let screen = session.screen.lock().unwrap();
//! for line in screen.viewport_text() {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`core`] | Cells, interned styles, charsets, mode flags |
//! | [`screen`] | The terminal state machine (grid, cursor, scrollback, reflow) |
//! | [`parser`] | vte-based escape-sequence tokenizer and dispatch |
//! | [`pty`] | Backend contract; portable-pty and remote-channel transports |
//! | [`process`] | Read loop, backpressure, suspend/resume, input routing |
//! | [`input`] | Key and mouse translation to VT100 input sequences |

pub mod core;
pub mod input;
pub mod parser;
pub mod process;
pub mod pty;
pub mod screen;

pub use crate::core::{Attrs, Cell, CharsetTable, ModeSet, StyleHandle, TermColor};
pub use input::{CursorKeyMode, MouseEvent, MouseEventKind, TerminalKey, key_to_bytes,
                mouse_report};
pub use parser::AnsiParser;
pub use process::{InvalidateFn, ProcessConfig, ProcessInput, ProcessState,
                  SharedScreen, TerminalProcess, TerminalSession};
pub use pty::{Backend, BackendEvent, ChannelBackend, ChannelInjector, ChannelTransport,
              PtyCommand, PtyCommandBuilder, PtyProcessBackend};
pub use screen::{Margins, Pos, Screen, ScreenEvent};

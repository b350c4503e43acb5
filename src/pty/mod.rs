// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Backend contract and the two transport families: a local child process
//! on a pty (POSIX or ConPTY, via portable-pty) and an interactive remote
//! channel.

pub mod backend;
pub mod channel_backend;
pub mod command_builder;
pub mod decoder;
pub mod pty_backend;

pub use backend::{Backend, BackendEvent, READ_BUFFER_SIZE};
pub use channel_backend::{ChannelBackend, ChannelInjector, ChannelTransport};
pub use command_builder::{PtyCommand, PtyCommandBuilder};
pub use decoder::Utf8StreamDecoder;
pub use pty_backend::PtyProcessBackend;

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Remote-channel backend: the same [`Backend`] contract over an
//! interactive channel the host owns (an SSH session, a websocket, a test
//! harness).
//!
//! The host implements [`ChannelTransport`] for the write direction and
//! feeds received text in through a [`ChannelInjector`] obtained before the
//! driver takes over:
//!
//! ```no_run
//! use ptyterm::pty::{ChannelBackend, ChannelTransport};
//!
//! struct SshTransport;
//! impl ChannelTransport for SshTransport {
//!     fn send_text(&mut self, text: &str) { /* channel.write(text) */ }
//!     fn resize(&mut self, width: u16, height: u16) {
//!         /* channel.change_terminal_size(width, height) */
//!     }
//!     fn disconnect(&mut self) { /* channel.close() */ }
//! }
//!
//! let backend = ChannelBackend::new(Box::new(SshTransport));
//! let injector = backend.injector();
//! // channel data_received callback: injector.push_output(&text);
//! // channel connection_lost callback: injector.close(0);
//! ```

use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use std::sync::{Arc, Mutex};

use super::backend::{Backend, BackendEvent, ReaderShared};

/// Write-direction operations the host's channel must provide.
pub trait ChannelTransport: Send {
    fn send_text(&mut self, text: &str);
    fn resize(&mut self, width: u16, height: u16);
    fn disconnect(&mut self);
}

/// Cloneable handle for pushing channel output into the backend.
#[derive(Debug, Clone)]
pub struct ChannelInjector {
    shared: Arc<ReaderShared>,
    exit_status: Arc<Mutex<Option<u32>>>,
}

impl ChannelInjector {
    /// Deliver received text. Signals the driver only on the
    /// empty-to-non-empty transition, so bursty channels do not flood the
    /// event queue.
    pub fn push_output(&self, text: &str) {
        if self.shared.is_closed() {
            return;
        }
        self.shared.push_text(text);
    }

    /// Mark the channel closed and deliver the exit code. Idempotent: only
    /// the first call wins.
    pub fn close(&self, exit_code: u32) {
        if self.shared.is_closed() {
            return;
        }
        if let Ok(mut slot) = self.exit_status.lock() {
            *slot = Some(exit_code);
        }
        self.shared.mark_closed();
        self.shared.send_event(BackendEvent::Exited(exit_code));
    }
}

pub struct ChannelBackend {
    transport: Box<dyn ChannelTransport>,
    shared: Arc<ReaderShared>,
    event_rx: Option<UnboundedReceiver<BackendEvent>>,
    exit_status: Arc<Mutex<Option<u32>>>,
}

impl std::fmt::Debug for ChannelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelBackend")
            .field("closed", &self.shared.is_closed())
            .finish_non_exhaustive()
    }
}

impl ChannelBackend {
    #[must_use]
    pub fn new(transport: Box<dyn ChannelTransport>) -> Self {
        let (event_tx, event_rx) = unbounded_channel();
        ChannelBackend {
            transport,
            shared: Arc::new(ReaderShared::new(event_tx)),
            event_rx: Some(event_rx),
            exit_status: Arc::new(Mutex::new(None)),
        }
    }

    /// The handle the host's receive path uses to feed this backend.
    #[must_use]
    pub fn injector(&self) -> ChannelInjector {
        ChannelInjector {
            shared: self.shared.clone(),
            exit_status: self.exit_status.clone(),
        }
    }
}

impl Backend for ChannelBackend {
    fn start(&mut self) -> miette::Result<()> {
        // The channel is established by the host; nothing to bring up.
        Ok(())
    }

    fn take_event_receiver(&mut self) -> Option<UnboundedReceiver<BackendEvent>> {
        self.event_rx.take()
    }

    fn connect_reader(&mut self) { self.shared.connect(); }

    fn disconnect_reader(&mut self) { self.shared.disconnect(); }

    fn is_reader_connected(&self) -> bool { self.shared.is_connected() }

    fn read_text(&mut self, limit: usize) -> String { self.shared.read_text(limit) }

    fn write_text(&mut self, text: &str) {
        if self.shared.is_closed() {
            return;
        }
        self.transport.send_text(text);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_text(&String::from_utf8_lossy(bytes));
    }

    fn set_size(&mut self, width: u16, height: u16) {
        if self.shared.is_closed() {
            return;
        }
        self.transport.resize(width, height);
    }

    fn kill(&mut self) {
        if self.shared.is_closed() {
            return;
        }
        self.transport.disconnect();
    }

    fn send_signal(&mut self, _signal: i32) {
        // Signals do not traverse the channel; hosts with an out-of-band
        // signal path hook it up themselves.
    }

    fn is_closed(&self) -> bool { self.shared.is_closed() }

    fn exit_status(&self) -> Option<u32> {
        self.exit_status.lock().ok().and_then(|slot| *slot)
    }
}

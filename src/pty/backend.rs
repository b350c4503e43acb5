// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The uniform backend contract: one trait the process driver speaks,
//! whether the far side is a local child on a pty, a ConPTY process, or an
//! interactive channel over a network transport.

use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Read granularity for the backend reader tasks (bytes per `read` call).
pub const READ_BUFFER_SIZE: usize = 4096;

/// Events a backend posts on its event channel. Delivered on the tokio
/// runtime, never from an arbitrary thread's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    /// Decoded output is waiting in the backend's buffer; drain it with
    /// [`Backend::read_text`].
    InputReady,
    /// The child terminated (or the channel closed) with this exit code.
    /// One-shot: emitted at most once per backend.
    Exited(u32),
}

/// Contract between the process driver and a concrete transport.
///
/// Failure semantics: writes are total (broken pipes swallowed, `EINTR`
/// retried), size/kill/signal operations are no-ops once closed, and
/// `read_text` after close returns an empty string.
pub trait Backend: Send {
    /// Bring up the child or channel. Non-blocking: completion of the whole
    /// lifecycle is signaled by [`BackendEvent::Exited`].
    fn start(&mut self) -> miette::Result<()>;

    /// Hand the event channel's receiving half to the driver. Yields
    /// `Some` exactly once.
    fn take_event_receiver(&mut self) -> Option<UnboundedReceiver<BackendEvent>>;

    /// Enable event delivery. Idempotent. If output accumulated while
    /// disconnected, one [`BackendEvent::InputReady`] is posted immediately.
    fn connect_reader(&mut self);

    /// Disable event delivery without tearing anything down. Idempotent;
    /// output keeps accumulating in the pending buffer.
    fn disconnect_reader(&mut self);

    fn is_reader_connected(&self) -> bool;

    /// Drain up to `limit` already-buffered code points. Never blocks.
    fn read_text(&mut self, limit: usize) -> String;

    fn write_text(&mut self, text: &str);

    fn write_bytes(&mut self, bytes: &[u8]);

    /// Propagate terminal dimensions (TIOCSWINSZ / ConPTY resize / channel
    /// terminal-size change).
    fn set_size(&mut self, width: u16, height: u16);

    fn kill(&mut self);

    fn send_signal(&mut self, signal: i32);

    /// True after EOF or termination.
    fn is_closed(&self) -> bool;

    /// The exit code, once [`BackendEvent::Exited`] has fired.
    fn exit_status(&self) -> Option<u32>;

    /// Best-effort name of the foreground process, when the transport can
    /// tell.
    fn get_name(&self) -> Option<String> { None }

    /// Best-effort working directory of the child.
    fn get_cwd(&self) -> Option<PathBuf> { None }
}

/// Buffer-and-notify state shared between a backend and its reader task.
///
/// Holds decoded output until the driver drains it. A notification is sent
/// only on the empty-to-non-empty transition (and on reconnect), so a slow
/// consumer sees one pending `InputReady` rather than a queue of them;
/// `read_text` re-arms the notification when it leaves data behind, which
/// emulates level-triggered readiness over an edge-triggered channel.
#[derive(Debug)]
pub(crate) struct ReaderShared {
    pending: Mutex<VecDeque<char>>,
    connected: AtomicBool,
    closed: AtomicBool,
    events: UnboundedSender<BackendEvent>,
}

impl ReaderShared {
    pub fn new(events: UnboundedSender<BackendEvent>) -> Self {
        ReaderShared {
            pending: Mutex::new(VecDeque::new()),
            connected: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            events,
        }
    }

    /// Append decoded output; notify if the driver is listening and the
    /// buffer was empty.
    pub fn push_text(&self, text: &str) {
        let was_empty = {
            let Ok(mut pending) = self.pending.lock() else {
                return;
            };
            let was_empty = pending.is_empty();
            pending.extend(text.chars());
            was_empty
        };
        if was_empty && self.connected.load(Ordering::SeqCst) {
            let _ = self.events.send(BackendEvent::InputReady);
        }
    }

    /// Drain up to `limit` code points.
    pub fn read_text(&self, limit: usize) -> String {
        let Ok(mut pending) = self.pending.lock() else {
            return String::new();
        };
        let take = limit.min(pending.len());
        let out: String = pending.drain(..take).collect();
        let more = !pending.is_empty();
        drop(pending);

        if more && self.connected.load(Ordering::SeqCst) {
            let _ = self.events.send(BackendEvent::InputReady);
        }
        out
    }

    pub fn connect(&self) {
        if self.connected.swap(true, Ordering::SeqCst) {
            return;
        }
        // Flush: anything buffered while paused becomes visible now.
        let has_pending = self
            .pending
            .lock()
            .map(|pending| !pending.is_empty())
            .unwrap_or(false);
        if has_pending {
            let _ = self.events.send(BackendEvent::InputReady);
        }
    }

    pub fn disconnect(&self) { self.connected.store(false, Ordering::SeqCst); }

    pub fn is_connected(&self) -> bool { self.connected.load(Ordering::SeqCst) }

    pub fn mark_closed(&self) { self.closed.store(true, Ordering::SeqCst); }

    pub fn is_closed(&self) -> bool { self.closed.load(Ordering::SeqCst) }

    pub fn send_event(&self, event: BackendEvent) { let _ = self.events.send(event); }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Local child-process backend on top of portable-pty.
//!
//! `native_pty_system()` is the runtime factory the contract asks for: on
//! POSIX it opens a pty pair and forks (setsid, controlling tty on the
//! slave, stdio dup'ed, descriptors closed); on Windows it drives ConPTY
//! with overlapped I/O on the conout pipe. This backend owns the master
//! side: a blocking reader task decodes output into the shared pending
//! buffer, a waiter task reaps the child, and both re-enter the runtime via
//! the backend's event channel.

use std::{
    io::{Read, Write},
    path::PathBuf,
    sync::{Arc, Mutex},
};

use portable_pty::{ChildKiller, MasterPty, PtySize, native_pty_system};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use super::{
    backend::{Backend, BackendEvent, READ_BUFFER_SIZE, ReaderShared},
    command_builder::PtyCommand,
    decoder::Utf8StreamDecoder,
};

/// Width and height a backend starts with until the driver sets a real
/// size.
pub const DEFAULT_PTY_SIZE: PtySize = PtySize {
    rows: 24,
    cols: 120,
    pixel_width: 0,
    pixel_height: 0,
};

pub struct PtyProcessBackend {
    command: Option<PtyCommand>,
    size: PtySize,
    controller: Option<Box<dyn MasterPty + Send>>,
    writer: Option<Box<dyn Write + Send>>,
    killer: Option<Box<dyn ChildKiller + Send + Sync>>,
    child_pid: Option<u32>,
    shared: Arc<ReaderShared>,
    event_rx: Option<UnboundedReceiver<BackendEvent>>,
    exit_status: Arc<Mutex<Option<u32>>>,
}

impl std::fmt::Debug for PtyProcessBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtyProcessBackend")
            .field("size", &self.size)
            .field("child_pid", &self.child_pid)
            .field("closed", &self.shared.is_closed())
            .finish_non_exhaustive()
    }
}

impl PtyProcessBackend {
    #[must_use]
    pub fn new(command: PtyCommand) -> Self {
        let (event_tx, event_rx) = unbounded_channel();
        PtyProcessBackend {
            command: Some(command),
            size: DEFAULT_PTY_SIZE,
            controller: None,
            writer: None,
            killer: None,
            child_pid: None,
            shared: Arc::new(ReaderShared::new(event_tx)),
            event_rx: Some(event_rx),
            exit_status: Arc::new(Mutex::new(None)),
        }
    }
}

impl Backend for PtyProcessBackend {
    fn start(&mut self) -> miette::Result<()> {
        let command = self
            .command
            .take()
            .ok_or_else(|| miette::miette!("backend already started"))?;

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(self.size)
            .map_err(|e| miette::miette!("failed to open pty: {e}"))?;
        let mut child = pair
            .slave
            .spawn_command(command)
            .map_err(|e| miette::miette!("failed to spawn child: {e}"))?;

        self.child_pid = child.process_id();
        self.killer = Some(child.clone_killer());

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| miette::miette!("failed to clone pty reader: {e}"))?;
        self.writer = Some(
            pair.master
                .take_writer()
                .map_err(|e| miette::miette!("failed to take pty writer: {e}"))?,
        );
        self.controller = Some(pair.master);
        // The parent must not hold the child's side open: EOF detection on
        // the master depends on it.
        drop(pair.slave);

        // Reader: blocking loop, decoded output into the shared buffer.
        let shared = self.shared.clone();
        tokio::task::spawn_blocking(move || {
            let mut reader = reader;
            let mut decoder = Utf8StreamDecoder::new();
            let mut buf = [0u8; READ_BUFFER_SIZE];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        let text = decoder.decode(&buf[..n]);
                        if !text.is_empty() {
                            shared.push_text(&text);
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        tracing::debug!("pty reader finished: {e}");
                        break;
                    }
                }
            }
            let tail = decoder.finish();
            if !tail.is_empty() {
                shared.push_text(&tail);
            }
            shared.mark_closed();
            // Wake the driver so it observes the closed state.
            shared.send_event(BackendEvent::InputReady);
        });

        // Waiter: reap the child and report the exit code.
        let shared = self.shared.clone();
        let exit_status = self.exit_status.clone();
        tokio::task::spawn_blocking(move || {
            let code = match child.wait() {
                Ok(status) => status.exit_code(),
                Err(e) => {
                    tracing::warn!("waiting for child failed: {e}");
                    1
                }
            };
            if let Ok(mut slot) = exit_status.lock() {
                *slot = Some(code);
            }
            shared.mark_closed();
            shared.send_event(BackendEvent::Exited(code));
        });

        Ok(())
    }

    fn take_event_receiver(&mut self) -> Option<UnboundedReceiver<BackendEvent>> {
        self.event_rx.take()
    }

    fn connect_reader(&mut self) { self.shared.connect(); }

    fn disconnect_reader(&mut self) { self.shared.disconnect(); }

    fn is_reader_connected(&self) -> bool { self.shared.is_connected() }

    fn read_text(&mut self, limit: usize) -> String { self.shared.read_text(limit) }

    fn write_text(&mut self, text: &str) { self.write_bytes(text.as_bytes()); }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        // write_all retries EINTR internally; a broken pipe just means the
        // child is gone.
        match writer.write_all(bytes) {
            Ok(()) => {
                if let Err(e) = writer.flush() {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        tracing::warn!("pty flush failed: {e}");
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Err(e) => tracing::warn!("pty write failed: {e}"),
        }
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.size = PtySize {
            rows: height,
            cols: width,
            pixel_width: 0,
            pixel_height: 0,
        };
        if self.shared.is_closed() {
            return;
        }
        if let Some(controller) = &self.controller {
            if let Err(e) = controller.resize(self.size) {
                tracing::warn!("pty resize failed: {e}");
            }
        }
    }

    fn kill(&mut self) {
        if self.shared.is_closed() {
            return;
        }
        if let Some(killer) = self.killer.as_mut() {
            if let Err(e) = killer.kill() {
                tracing::debug!("kill failed (child may already be gone): {e}");
            }
        }
    }

    #[cfg(unix)]
    fn send_signal(&mut self, signal: i32) {
        if self.shared.is_closed() {
            return;
        }
        let Some(pid) = self.child_pid else {
            return;
        };
        let (Some(pid), Some(signal)) = (
            rustix::process::Pid::from_raw(pid as i32),
            rustix::process::Signal::from_named_raw(signal),
        ) else {
            return;
        };
        let _ = rustix::process::kill_process(pid, signal);
    }

    #[cfg(not(unix))]
    fn send_signal(&mut self, _signal: i32) {
        tracing::warn!("signal passthrough is not supported on this platform");
    }

    fn is_closed(&self) -> bool { self.shared.is_closed() }

    fn exit_status(&self) -> Option<u32> {
        self.exit_status.lock().ok().and_then(|slot| *slot)
    }

    /// Name of the foreground process: the process group leader on the pty,
    /// resolved through `/proc`.
    fn get_name(&self) -> Option<String> {
        #[cfg(target_os = "linux")]
        {
            let controller = self.controller.as_ref()?;
            let leader = controller.process_group_leader()?;
            let cmdline =
                std::fs::read(format!("/proc/{leader}/cmdline")).ok()?;
            let first = cmdline.split(|&byte| byte == 0).next()?;
            if first.is_empty() {
                return None;
            }
            return Some(String::from_utf8_lossy(first).into_owned());
        }
        #[cfg(not(target_os = "linux"))]
        None
    }

    fn get_cwd(&self) -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            let pid = self.child_pid?;
            return std::fs::read_link(format!("/proc/{pid}/cwd")).ok();
        }
        #[cfg(not(target_os = "linux"))]
        None
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The process driver: glues a [`Backend`] to the parser and the screen.
//!
//! ```text
//! Backend events ──> TerminalProcess ──> AnsiParser ──> Screen
//!                         │                               │
//!                         │<── ScreenEvent::Response ─────┘ (DSR/DA)
//!                         │
//!                         └──> invalidate() once per drained chunk
//! ```
//!
//! # Backpressure
//!
//! Each `InputReady` drains at most [`ProcessConfig::read_chunk_size`] code
//! points. When the owning pane has focus (`has_priority` true) the chunk is
//! fed synchronously. Otherwise the reader is disconnected and the chunk is
//! parked behind a deadline one [`ProcessConfig::backpressure_delay`] away;
//! an unfocused runaway child is thus bounded to roughly one drain per
//! delay, and cannot starve the event loop. Reconnecting flushes whatever
//! accumulated in the backend buffer in the meantime.
//!
//! # Threading
//!
//! The driver task is the only writer of screen and parser state. Renderers
//! sample the screen through the shared handle; backends do their blocking
//! work on worker tasks and re-enter through the event channel.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
    time::{Duration, Instant},
};

use crate::{
    input::{CursorKeyMode, MouseEvent, TerminalKey, key_to_bytes, mouse_report},
    parser::AnsiParser,
    pty::{Backend, BackendEvent},
    screen::{Screen, ScreenEvent},
};

/// Shared, thread-safe handle to a process's screen.
pub type SharedScreen = Arc<Mutex<Screen>>;

/// Callback fired after every processed chunk; the host schedules a repaint.
pub type InvalidateFn = Arc<dyn Fn() + Send + Sync>;
/// Callback fired on BEL.
pub type BellFn = Arc<dyn Fn() + Send + Sync>;
/// Callback fired once, with the exit code, when the child terminates.
pub type DoneFn = Arc<dyn Fn(u32) + Send + Sync>;
/// Focus probe: `true` means this process's output is processed eagerly.
pub type PriorityFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// Driver tuning knobs.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Scrollback retention for the screen.
    pub history_limit: usize,
    /// Code points drained per `InputReady`.
    pub read_chunk_size: usize,
    /// How long an unfocused process's output may be deferred.
    pub backpressure_delay: Duration,
    /// `(width, height)` applied at startup, until the host resizes.
    pub initial_size: (u16, u16),
}

impl Default for ProcessConfig {
    fn default() -> Self {
        ProcessConfig {
            history_limit: crate::screen::DEFAULT_HISTORY_LIMIT,
            read_chunk_size: 4096,
            backpressure_delay: Duration::from_secs(1),
            initial_size: (120, 24),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Suspended,
    Terminated,
}

/// Commands a host can send to a spawned driver task.
#[derive(Debug, Clone)]
pub enum ProcessInput {
    /// Write text to the child; with `paste` set, bracketed-paste framing is
    /// applied when the application enabled it.
    Text { data: String, paste: bool },
    Key(TerminalKey),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
    Suspend,
    Resume,
    Kill,
    Signal(i32),
}

/// A spawned driver: input channel, screen handle, and completion.
pub struct TerminalSession {
    pub input: UnboundedSender<ProcessInput>,
    pub screen: SharedScreen,
    /// Resolves to the child's exit code.
    pub completion: JoinHandle<miette::Result<u32>>,
}

impl std::fmt::Debug for TerminalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSession").finish_non_exhaustive()
    }
}

pub struct TerminalProcess {
    config: ProcessConfig,
    screen: SharedScreen,
    parser: AnsiParser,
    backend: Box<dyn Backend>,
    state: ProcessState,
    started: bool,
    size: (u16, u16),
    invalidate: InvalidateFn,
    bell: Option<BellFn>,
    done: Option<DoneFn>,
    has_priority: PriorityFn,
    deferred: Option<String>,
    resume_at: Option<Instant>,
}

impl std::fmt::Debug for TerminalProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalProcess")
            .field("state", &self.state)
            .field("size", &self.size)
            .field("deferred", &self.deferred.as_ref().map(String::len))
            .finish_non_exhaustive()
    }
}

impl TerminalProcess {
    #[must_use]
    pub fn new(backend: Box<dyn Backend>, invalidate: InvalidateFn) -> Self {
        let config = ProcessConfig::default();
        let (width, height) = config.initial_size;
        let screen = Screen::new(height as usize, width as usize)
            .with_history_limit(config.history_limit);
        TerminalProcess {
            screen: Arc::new(Mutex::new(screen)),
            parser: AnsiParser::new(),
            backend,
            state: ProcessState::Running,
            started: false,
            size: (0, 0),
            invalidate,
            bell: None,
            done: None,
            has_priority: Arc::new(|| true),
            deferred: None,
            resume_at: None,
            config,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ProcessConfig) -> Self {
        self.lock_screen().history_limit = config.history_limit;
        self.config = config;
        self
    }

    #[must_use]
    pub fn on_bell(mut self, bell: BellFn) -> Self {
        self.bell = Some(bell);
        self
    }

    #[must_use]
    pub fn on_done(mut self, done: DoneFn) -> Self {
        self.done = Some(done);
        self
    }

    /// Install the focus probe used for backpressure decisions.
    #[must_use]
    pub fn with_priority_fn(mut self, has_priority: PriorityFn) -> Self {
        self.has_priority = has_priority;
        self
    }

    /// Handle to the screen for renderers. The driver is the only writer.
    #[must_use]
    pub fn screen_handle(&self) -> SharedScreen { self.screen.clone() }

    #[must_use]
    pub fn state(&self) -> ProcessState { self.state }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.state == ProcessState::Terminated || self.backend.is_closed()
    }

    /// When backpressure parked a chunk, the instant it must be flushed.
    #[must_use]
    pub fn resume_deadline(&self) -> Option<Instant> { self.resume_at }

    fn lock_screen(&self) -> MutexGuard<'_, Screen> {
        self.screen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Start the child: initial size, backend start, reader connect.
    pub fn start(&mut self) -> miette::Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        let (width, height) = self.config.initial_size;
        self.set_size(width, height);
        self.backend.start()?;
        self.backend.connect_reader();
        self.state = ProcessState::Running;
        Ok(())
    }

    /// Propagate a terminal size to the backend and the screen.
    pub fn set_size(&mut self, width: u16, height: u16) {
        if self.size != (width, height) {
            self.backend.set_size(width, height);
        }
        self.lock_screen().resize(height as usize, width as usize);
        self.size = (width, height);
    }

    /// The read callback: drain one chunk and feed or defer it.
    pub fn handle_input_ready(&mut self) {
        let text = self.backend.read_text(self.config.read_chunk_size);

        if self.backend.is_closed() {
            // End of stream: feed the tail, then stop reading.
            if !text.is_empty() {
                self.process_output(&text);
            }
            self.backend.disconnect_reader();
            return;
        }

        if (self.has_priority)() {
            self.process_output(&text);
        } else {
            // Unfocused: stop reading and park the chunk behind a deadline.
            // Roughly one chunk per delay gets processed while saturated.
            self.backend.disconnect_reader();
            match &mut self.deferred {
                Some(parked) => parked.push_str(&text),
                None => self.deferred = Some(text),
            }
            if self.resume_at.is_none() {
                self.resume_at = Some(Instant::now() + self.config.backpressure_delay);
            }
        }
    }

    /// Deadline expiry: feed the parked chunk and reconnect.
    pub fn flush_deferred(&mut self) {
        self.resume_at = None;
        if let Some(text) = self.deferred.take() {
            self.process_output(&text);
        }
        if self.state == ProcessState::Running && !self.backend.is_closed() {
            self.backend.connect_reader();
        }
    }

    fn process_output(&mut self, text: &str) {
        let events = {
            let mut screen = self
                .screen
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            self.parser.feed(&mut screen, text);
            screen.take_events()
        };
        for event in events {
            match event {
                ScreenEvent::Response(payload) => self.backend.write_text(&payload),
                ScreenEvent::Bell => {
                    if let Some(bell) = &self.bell {
                        bell();
                    }
                }
                // Title, icon name, and hyperlinks are observable on the
                // screen itself; the invalidate below covers them.
                _ => {}
            }
        }
        (self.invalidate)();
    }

    /// Write user input. With `paste` set and bracketed paste active, the
    /// text is framed in `ESC[200~ .. ESC[201~`.
    pub fn write_input(&mut self, data: &str, paste: bool) {
        let bracketed = paste && self.lock_screen().bracketed_paste_enabled();
        if bracketed {
            self.backend.write_text(&format!("\x1b[200~{data}\x1b[201~"));
        } else {
            self.backend.write_text(data);
        }
    }

    /// Translate and write an abstract key, honoring the application
    /// cursor-key mode.
    pub fn write_key(&mut self, key: TerminalKey) {
        let mode = if self.lock_screen().in_application_mode() {
            CursorKeyMode::Application
        } else {
            CursorKeyMode::Normal
        };
        let bytes = key_to_bytes(key, mode);
        if !bytes.is_empty() {
            self.backend.write_bytes(&bytes);
        }
    }

    /// Encode and write a mouse report if the application enabled one of the
    /// reporting protocols.
    pub fn send_mouse(&mut self, event: MouseEvent) {
        let report = mouse_report(&self.lock_screen(), event);
        if let Some(report) = report {
            self.backend.write_text(&report);
        }
    }

    /// Stop reading output (entering copy/scrollback mode). Idempotent.
    pub fn suspend(&mut self) {
        if self.state == ProcessState::Running {
            self.state = ProcessState::Suspended;
            self.backend.disconnect_reader();
        }
    }

    /// Undo [`TerminalProcess::suspend`]. Idempotent.
    pub fn resume(&mut self) {
        if self.state == ProcessState::Suspended {
            self.state = ProcessState::Running;
            self.backend.connect_reader();
        }
    }

    pub fn kill(&mut self) { self.backend.kill(); }

    pub fn send_signal(&mut self, signal: i32) { self.backend.send_signal(signal); }

    #[must_use]
    pub fn get_name(&self) -> Option<String> { self.backend.get_name() }

    #[must_use]
    pub fn get_cwd(&self) -> Option<std::path::PathBuf> { self.backend.get_cwd() }

    fn on_terminated(&mut self, exit_code: u32) {
        self.backend.disconnect_reader();
        self.state = ProcessState::Terminated;
        if let Some(done) = &self.done {
            done(exit_code);
        }
    }

    fn handle_command(&mut self, command: ProcessInput) {
        match command {
            ProcessInput::Text { data, paste } => self.write_input(&data, paste),
            ProcessInput::Key(key) => self.write_key(key),
            ProcessInput::Mouse(event) => self.send_mouse(event),
            ProcessInput::Resize { width, height } => self.set_size(width, height),
            ProcessInput::Suspend => self.suspend(),
            ProcessInput::Resume => self.resume(),
            ProcessInput::Kill => self.kill(),
            ProcessInput::Signal(signal) => self.send_signal(signal),
        }
    }

    /// Drive to completion, processing host commands alongside backend
    /// events. Returns the child's exit code.
    pub async fn drive(
        mut self,
        mut commands: UnboundedReceiver<ProcessInput>,
    ) -> miette::Result<u32> {
        self.start()?;
        let mut events = self
            .backend
            .take_event_receiver()
            .ok_or_else(|| miette::miette!("backend event receiver already taken"))?;

        let mut commands_open = true;
        let exit_code;
        loop {
            let deadline = self.resume_at;
            tokio::select! {
                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.handle_command(command),
                    None => commands_open = false,
                },
                event = events.recv() => match event {
                    Some(BackendEvent::InputReady) => self.handle_input_ready(),
                    Some(BackendEvent::Exited(code)) => {
                        exit_code = code;
                        break;
                    }
                    None => {
                        exit_code = self.backend.exit_status().unwrap_or(0);
                        break;
                    }
                },
                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                        if deadline.is_some() => {
                    self.flush_deferred();
                }
            }
        }

        // Feed anything still parked or buffered before reporting done.
        if let Some(text) = self.deferred.take() {
            self.process_output(&text);
        }
        loop {
            let tail = self.backend.read_text(self.config.read_chunk_size);
            if tail.is_empty() {
                break;
            }
            self.process_output(&tail);
        }

        self.on_terminated(exit_code);
        Ok(exit_code)
    }

    /// Spawn the driver as a task; returns the session handle.
    #[must_use]
    pub fn spawn(self) -> TerminalSession {
        let (input, commands) = unbounded_channel();
        let screen = self.screen.clone();
        let completion = tokio::spawn(self.drive(commands));
        TerminalSession { input, screen, completion }
    }

    /// Drive without a command channel (output-only hosts).
    pub async fn run(self) -> miette::Result<u32> {
        let (_input, commands) = unbounded_channel();
        self.drive(commands).await
    }
}

#[cfg(test)]
mod tests;

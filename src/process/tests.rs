// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Driver tests against a recording channel backend: input routing,
//! bracketed paste, DSR responses, backpressure, and termination.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use pretty_assertions::assert_eq;

use super::*;
use crate::{
    input::{MouseEventKind, TerminalKey},
    pty::{ChannelBackend, ChannelInjector, ChannelTransport},
};

#[derive(Default)]
struct RecordingTransport {
    sent: Arc<Mutex<Vec<String>>>,
}

impl ChannelTransport for RecordingTransport {
    fn send_text(&mut self, text: &str) {
        self.sent.lock().unwrap().push(text.to_string());
    }
    fn resize(&mut self, _width: u16, _height: u16) {}
    fn disconnect(&mut self) {}
}

struct Harness {
    process: TerminalProcess,
    injector: ChannelInjector,
    sent: Arc<Mutex<Vec<String>>>,
    invalidations: Arc<AtomicUsize>,
}

fn harness() -> Harness {
    harness_with_priority(Arc::new(|| true))
}

fn harness_with_priority(has_priority: PriorityFn) -> Harness {
    let transport = RecordingTransport::default();
    let sent = transport.sent.clone();
    let backend = ChannelBackend::new(Box::new(transport));
    let injector = backend.injector();

    let invalidations = Arc::new(AtomicUsize::new(0));
    let counter = invalidations.clone();
    let invalidate: InvalidateFn = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut process = TerminalProcess::new(Box::new(backend), invalidate)
        .with_priority_fn(has_priority);
    process.start().unwrap();
    Harness { process, injector, sent, invalidations }
}

/// Push output and run the read callback once, as the event loop would.
fn feed(harness: &mut Harness, text: &str) {
    harness.injector.push_output(text);
    harness.process.handle_input_ready();
}

fn screen_cell_count(process: &TerminalProcess) -> usize {
    let screen = process.screen_handle();
    let screen = screen.lock().unwrap();
    screen.data_buffer.values().map(std::collections::BTreeMap::len).sum()
}

#[tokio::test]
async fn output_reaches_the_screen_and_invalidates_once() {
    let mut harness = harness();
    feed(&mut harness, "Hello\r\nWorld\n");

    let screen = harness.process.screen_handle();
    let screen = screen.lock().unwrap();
    assert_eq!(screen.row_text(0), "Hello");
    assert_eq!(screen.row_text(1), "World");
    assert_eq!(harness.invalidations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dsr_responses_are_written_back_to_the_child() {
    let mut harness = harness();
    feed(&mut harness, "\x1b[6n");
    assert_eq!(harness.sent.lock().unwrap().as_slice(), ["\x1b[1;1R"]);
}

#[tokio::test]
async fn bracketed_paste_framing_follows_the_screen_mode() {
    let mut harness = harness();

    harness.process.write_input("plain", true);
    assert_eq!(harness.sent.lock().unwrap().as_slice(), ["plain"]);
    harness.sent.lock().unwrap().clear();

    feed(&mut harness, "\x1b[?2004h");
    harness.process.write_input("pasted", true);
    assert_eq!(
        harness.sent.lock().unwrap().as_slice(),
        ["\x1b[200~pasted\x1b[201~"]
    );
    harness.sent.lock().unwrap().clear();

    // paste=false never frames.
    harness.process.write_input("typed", false);
    assert_eq!(harness.sent.lock().unwrap().as_slice(), ["typed"]);
}

#[tokio::test]
async fn keys_follow_the_application_cursor_mode() {
    let mut harness = harness();

    harness.process.write_key(TerminalKey::Up);
    assert_eq!(harness.sent.lock().unwrap().as_slice(), ["\x1b[A"]);
    harness.sent.lock().unwrap().clear();

    feed(&mut harness, "\x1b[?1h");
    harness.process.write_key(TerminalKey::Up);
    assert_eq!(harness.sent.lock().unwrap().as_slice(), ["\x1bOA"]);
}

#[tokio::test]
async fn mouse_reports_use_the_enabled_protocol() {
    let mut harness = harness();

    let click = MouseEvent { kind: MouseEventKind::Down, x: 4, y: 2 };
    harness.process.send_mouse(click);
    assert!(harness.sent.lock().unwrap().is_empty(), "reporting is off");

    feed(&mut harness, "\x1b[?1006h");
    harness.process.send_mouse(click);
    assert_eq!(harness.sent.lock().unwrap().as_slice(), ["\x1b[<0;5;3M"]);
}

#[tokio::test]
async fn without_priority_chunks_are_deferred_and_bounded() {
    let mut harness = harness_with_priority(Arc::new(|| false));

    harness.injector.push_output(&"a".repeat(10_000));
    harness.process.handle_input_ready();

    // Nothing processed yet; the reader is off and one chunk is parked.
    assert_eq!(screen_cell_count(&harness.process), 0);
    assert_eq!(harness.invalidations.load(Ordering::SeqCst), 0);
    assert!(harness.process.resume_deadline().is_some());

    harness.process.flush_deferred();
    // Exactly one chunk of the flood went through.
    assert_eq!(screen_cell_count(&harness.process), 4096);
    assert_eq!(harness.invalidations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn priority_switch_controls_eager_processing() {
    let focused = Arc::new(AtomicBool::new(true));
    let probe = focused.clone();
    let mut harness =
        harness_with_priority(Arc::new(move || probe.load(Ordering::SeqCst)));

    feed(&mut harness, "eager");
    assert_eq!(screen_cell_count(&harness.process), 5);

    focused.store(false, Ordering::SeqCst);
    feed(&mut harness, " lazy");
    assert_eq!(screen_cell_count(&harness.process), 5, "deferred while unfocused");
    harness.process.flush_deferred();
    assert_eq!(screen_cell_count(&harness.process), 10);
}

#[tokio::test]
async fn suspend_and_resume_are_idempotent() {
    let mut harness = harness();

    harness.process.suspend();
    harness.process.suspend();
    assert_eq!(harness.process.state(), ProcessState::Suspended);

    // Output accumulates silently while suspended.
    harness.injector.push_output("hidden");

    harness.process.resume();
    harness.process.resume();
    assert_eq!(harness.process.state(), ProcessState::Running);

    // The reconnect flush makes the buffered output readable.
    harness.process.handle_input_ready();
    let screen = harness.process.screen_handle();
    assert_eq!(screen.lock().unwrap().row_text(0), "hidden");
}

#[tokio::test(start_paused = true)]
async fn backpressure_deadline_drives_the_spawned_loop() {
    let transport = RecordingTransport::default();
    let backend = ChannelBackend::new(Box::new(transport));
    let injector = backend.injector();

    let invalidations = Arc::new(AtomicUsize::new(0));
    let counter = invalidations.clone();
    let process = TerminalProcess::new(
        Box::new(backend),
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    )
    .with_priority_fn(Arc::new(|| false));
    let screen = process.screen_handle();
    let session = process.spawn();

    injector.push_output(&"a".repeat(9000));
    // Let the driver observe InputReady and park the chunk.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(invalidations.load(Ordering::SeqCst), 0, "deferred, not processed");

    // Crossing the one-second deadline releases exactly one chunk, and the
    // reconnect flush parks the next one.
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let after_first: usize = {
        let screen = screen.lock().unwrap();
        screen.data_buffer.values().map(std::collections::BTreeMap::len).sum()
    };
    assert_eq!(after_first, 4096);

    // Another deadline, another chunk.
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let after_second: usize = {
        let screen = screen.lock().unwrap();
        screen.data_buffer.values().map(std::collections::BTreeMap::len).sum()
    };
    assert_eq!(after_second, 8192);

    injector.close(0);
    let code = session.completion.await.unwrap().unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn termination_reports_the_exit_code_and_fires_done() {
    let transport = RecordingTransport::default();
    let backend = ChannelBackend::new(Box::new(transport));
    let injector = backend.injector();

    let done_code = Arc::new(AtomicUsize::new(usize::MAX));
    let done_slot = done_code.clone();
    let process = TerminalProcess::new(Box::new(backend), Arc::new(|| {}))
        .on_done(Arc::new(move |code| {
            done_slot.store(code as usize, Ordering::SeqCst);
        }));
    let screen = process.screen_handle();
    let session = process.spawn();

    injector.push_output("bye");
    injector.close(42);

    let code = session.completion.await.unwrap().unwrap();
    assert_eq!(code, 42);
    assert_eq!(done_code.load(Ordering::SeqCst), 42);
    // The tail that arrived before close was still processed.
    assert_eq!(screen.lock().unwrap().row_text(0), "bye");
}

#[tokio::test]
async fn session_commands_reach_the_child() {
    let transport = RecordingTransport::default();
    let sent = transport.sent.clone();
    let backend = ChannelBackend::new(Box::new(transport));
    let injector = backend.injector();

    let process = TerminalProcess::new(Box::new(backend), Arc::new(|| {}));
    let session = process.spawn();

    session
        .input
        .send(ProcessInput::Text { data: "ls\r".into(), paste: false })
        .unwrap();
    session.input.send(ProcessInput::Key(TerminalKey::Down)).unwrap();

    // Give the driver a moment to process, then shut down.
    tokio::time::sleep(Duration::from_millis(50)).await;
    injector.close(0);
    session.completion.await.unwrap().unwrap();

    assert_eq!(sent.lock().unwrap().as_slice(), ["ls\r", "\x1b[B"]);
}

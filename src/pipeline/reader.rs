//! Input plumbing - the thread-safe producer side of the render loop.
//!
//! Everything here is `Send`: the reader thread, event senders handed to
//! other threads, and stop handles. The consumer (the loop) stays on one
//! thread.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event;
use tracing::{debug, warn};

use crate::state::event::Event;
use crate::state::input::convert_event;

/// How long the reader waits for input before rechecking its stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Messages on the loop's queue.
#[derive(Debug)]
pub(crate) enum LoopMessage {
    Event(Event),
    /// Wake the loop so it rechecks the stop flag.
    Wake,
    /// The input source ended.
    Closed,
    /// The input source failed.
    Failed(io::Error),
}

// =============================================================================
// EventSender
// =============================================================================

/// Pushes events onto the loop's queue from any thread.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<LoopMessage>,
}

impl EventSender {
    pub(crate) fn new(tx: Sender<LoopMessage>) -> Self {
        Self { tx }
    }

    /// Queue an event. Returns false once the loop is gone.
    pub fn send(&self, event: impl Into<Event>) -> bool {
        self.tx.send(LoopMessage::Event(event.into())).is_ok()
    }

    /// Report that the input source ended.
    pub fn close(&self) {
        let _ = self.tx.send(LoopMessage::Closed);
    }

    /// Report that the input source failed.
    pub fn fail(&self, err: io::Error) {
        let _ = self.tx.send(LoopMessage::Failed(err));
    }
}

// =============================================================================
// StopHandle
// =============================================================================

/// Cooperative stop request, checked by the loop between cycles.
#[derive(Debug, Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
    tx: Sender<LoopMessage>,
}

impl StopHandle {
    pub(crate) fn new(tx: Sender<LoopMessage>) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            tx,
        }
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
        let _ = self.tx.send(LoopMessage::Wake);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// InputReader
// =============================================================================

/// Dedicated terminal input thread.
///
/// Polls crossterm with a short timeout so it notices the stop flag, converts
/// events, and sends them through an [`EventSender`].
pub struct InputReader {
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl InputReader {
    pub fn spawn(sender: EventSender) -> io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = thread::Builder::new()
            .name("spark-dsl-input".to_string())
            .spawn(move || Self::read_loop(running_clone, sender))?;

        debug!("input reader started");
        Ok(Self {
            handle: Some(handle),
            running,
        })
    }

    fn read_loop(running: Arc<AtomicBool>, sender: EventSender) {
        while running.load(Ordering::SeqCst) {
            match event::poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(err) => {
                    warn!(error = %err, "input poll failed");
                    sender.fail(err);
                    break;
                }
            }

            match event::read() {
                Ok(raw) => {
                    if let Some(event) = convert_event(raw) {
                        if !sender.send(event) {
                            break; // Loop gone
                        }
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!(error = %err, "input read failed");
                    sender.fail(err);
                    break;
                }
            }
        }
    }

    /// Stop the reader thread and wait for it.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            debug!("input reader stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::keyboard::KeyEvent;
    use std::sync::mpsc;

    #[test]
    fn test_sender_queues_in_order() {
        let (tx, rx) = mpsc::channel();
        let sender = EventSender::new(tx);

        assert!(sender.send(KeyEvent::char('a')));
        assert!(sender.send(Event::Tick(7)));

        assert!(matches!(rx.recv().unwrap(), LoopMessage::Event(Event::Key(_))));
        assert!(matches!(rx.recv().unwrap(), LoopMessage::Event(Event::Tick(7))));
    }

    #[test]
    fn test_sender_reports_dropped_loop() {
        let (tx, rx) = mpsc::channel();
        let sender = EventSender::new(tx);
        drop(rx);
        assert!(!sender.send(KeyEvent::char('a')));
    }

    #[test]
    fn test_stop_handle_wakes() {
        let (tx, rx) = mpsc::channel();
        let stop = StopHandle::new(tx);
        let remote = stop.clone();

        std::thread::spawn(move || remote.stop()).join().unwrap();

        assert!(stop.is_stopped());
        assert!(matches!(rx.recv().unwrap(), LoopMessage::Wake));
        stop.reset();
        assert!(!stop.is_stopped());
    }
}

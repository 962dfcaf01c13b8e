//! Render loop - the scheduler that owns one run.
//!
//! ```text
//!            ┌──────────── input event ─────────────┐
//!            │                                      ▼
//!   Idle ──wait──> (deadline) Ticking ──> Rendering ──> Idle
//!     │
//!     └── stop request / fatal error ──> Stopped
//! ```
//!
//! Input events are routed as they arrive and never redraw by themselves;
//! the next tick paints whatever state they left behind. All consumption
//! happens on the thread that calls [`RenderLoop::run`]; only the input
//! reader, [`EventSender`]s, and [`StopHandle`]s cross threads.
//!
//! # Example
//!
//! ```ignore
//! use spark_dsl::prelude::*;
//!
//! let mut components = Components::new();
//! let counter = components.add(Counter::default());
//!
//! let mut app = RenderLoop::new(Config::default(), CrosstermBackend::stdout());
//! app.run(&mut components, move || column([text("Counter"), component(counter)]))?;
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Instant;

use spark_signals::{signal, Signal};
use tracing::{debug, error, trace, warn};

use crate::config::Config;
use crate::engine::Components;
use crate::error::{Error, Phase, Result};
use crate::layout::{LayoutResolver, TaffyLayout};
use crate::primitives::Element;
use crate::renderer::{paint, Backend};
use crate::state::event::Event;
use crate::state::focus::FocusRegistry;
use crate::state::global_keys::{GlobalContext, GlobalHandlers};
use crate::types::Rect;

use super::frame::FrameTree;
use super::reader::{EventSender, LoopMessage, StopHandle};
use super::router::{deliver_tick, EventRouter, Frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Idle,
    Ticking,
    Rendering,
    Stopped,
}

type FrameErrorHook = Box<dyn FnMut(&Error)>;

pub struct RenderLoop<B: Backend> {
    config: Config,
    backend: B,
    resolver: Box<dyn LayoutResolver>,
    focus: FocusRegistry,
    router: EventRouter,
    globals: GlobalHandlers,
    tx: Sender<LoopMessage>,
    rx: Receiver<LoopMessage>,
    stop: StopHandle,
    size: Signal<(u16, u16)>,
    tick: Signal<u64>,
    sequence: u64,
    frame: Frame,
    frame_error: Option<FrameErrorHook>,
    state: LoopState,
}

impl<B: Backend> RenderLoop<B> {
    pub fn new(config: Config, backend: B) -> Self {
        let (tx, rx) = mpsc::channel();
        let stop = StopHandle::new(tx.clone());
        let size = signal(backend.size().unwrap_or_default());

        Self {
            config,
            backend,
            resolver: Box::new(TaffyLayout::new()),
            focus: FocusRegistry::new(),
            router: EventRouter::new(),
            globals: GlobalHandlers::with_defaults(),
            tx,
            rx,
            stop,
            size,
            tick: signal(0),
            sequence: 0,
            frame: Frame::default(),
            frame_error: None,
            state: LoopState::Idle,
        }
    }

    /// Swap the layout solver.
    pub fn with_layout(mut self, resolver: impl LayoutResolver + 'static) -> Self {
        self.set_resolver(resolver);
        self
    }

    pub fn set_resolver(&mut self, resolver: impl LayoutResolver + 'static) {
        self.resolver = Box::new(resolver);
    }

    // =========================================================================
    // Handles
    // =========================================================================

    /// Push events into the queue from any thread.
    pub fn event_sender(&self) -> EventSender {
        EventSender::new(self.tx.clone())
    }

    /// Request a cooperative stop from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Terminal size as of the last frame or resize event.
    pub fn terminal_size(&self) -> Signal<(u16, u16)> {
        self.size.clone()
    }

    /// Tick sequence, updated at the start of each tick cycle.
    pub fn tick_signal(&self) -> Signal<u64> {
        self.tick.clone()
    }

    /// Root-level key handlers. Starts with the quit and focus keys.
    pub fn global_handlers_mut(&mut self) -> &mut GlobalHandlers {
        &mut self.globals
    }

    /// Called with recoverable per-frame errors (duplicate focus keys).
    pub fn on_frame_error(&mut self, hook: impl FnMut(&Error) + 'static) {
        self.frame_error = Some(Box::new(hook));
    }

    pub fn focus(&self) -> &FocusRegistry {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut FocusRegistry {
        &mut self.focus
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn tick_sequence(&self) -> u64 {
        self.sequence
    }

    // =========================================================================
    // Run
    // =========================================================================

    /// Drive the loop until a stop request or a fatal error.
    ///
    /// The terminal is restored on every exit path. The stop request is
    /// cleared on return so the loop can run again.
    pub fn run<F>(&mut self, components: &mut Components, mut builder: F) -> Result<()>
    where
        F: FnMut() -> Element,
    {
        debug!(tick_rate = ?self.config.tick_rate(), "render loop starting");
        self.state = LoopState::Idle;

        let result = self.enter().and_then(|()| self.drive(components, &mut builder));
        let restored = self.backend.leave();
        self.state = LoopState::Stopped;
        self.stop.reset();

        match result {
            Ok(()) => {
                restored?;
                debug!(ticks = self.sequence, "render loop stopped");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "render loop failed");
                Err(err)
            }
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.backend.enter(&self.config)?;
        self.backend.start_input(self.event_sender())?;
        Ok(())
    }

    fn drive<F>(&mut self, components: &mut Components, builder: &mut F) -> Result<()>
    where
        F: FnMut() -> Element,
    {
        // Initial frame so the first events have a tree to route against
        self.build_frame(components, builder)?;

        let tick_rate = self.config.tick_rate();
        let mut deadline = Instant::now() + tick_rate;

        loop {
            if self.stop.is_stopped() {
                debug!("stop requested");
                return Ok(());
            }

            let timeout = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(timeout) {
                Ok(LoopMessage::Event(Event::Tick(_))) => self.tick_cycle(components, builder)?,
                Ok(LoopMessage::Event(event)) => {
                    if self.dispatch(event, components)? {
                        debug!("stop requested by handler");
                        return Ok(());
                    }
                }
                Ok(LoopMessage::Wake) => {}
                Ok(LoopMessage::Closed) => return Err(Error::InputClosed),
                Ok(LoopMessage::Failed(err)) => return Err(Error::Backend(err)),
                Err(RecvTimeoutError::Timeout) => {
                    self.tick_cycle(components, builder)?;
                    deadline += tick_rate;
                    let now = Instant::now();
                    if deadline <= now {
                        // Fell behind; don't burst to catch up
                        deadline = now + tick_rate;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return Err(Error::InputClosed),
            }
        }
    }

    // =========================================================================
    // Cycles
    // =========================================================================

    /// Route one input event. Returns true if a handler asked to stop.
    fn dispatch(&mut self, event: Event, components: &mut Components) -> Result<bool> {
        let phase = match event {
            Event::Key(_) => Phase::Key,
            Event::Mouse(_) if !self.config.mouse_capture() => {
                trace!("mouse capture disabled, dropping mouse event");
                return Ok(false);
            }
            Event::Mouse(_) => Phase::Mouse,
            Event::Resize(width, height) => {
                self.size.set((width, height));
                Phase::Resize
            }
            Event::Tick(_) => Phase::Tick,
        };
        trace!(?event, "routing event");

        let Self {
            router,
            frame,
            focus,
            globals,
            sequence,
            ..
        } = self;
        guarded(phase, || {
            let mut ctx = GlobalContext::new(focus, components, *sequence);
            router.route(&event, frame, &mut ctx, globals);
            ctx.stop_requested()
        })
    }

    fn tick_cycle<F>(&mut self, components: &mut Components, builder: &mut F) -> Result<()>
    where
        F: FnMut() -> Element,
    {
        self.state = LoopState::Ticking;
        self.sequence += 1;
        let sequence = self.sequence;
        trace!(sequence, "tick");

        self.tick.set(sequence);
        guarded(Phase::Tick, || deliver_tick(components, sequence))?;
        self.build_frame(components, builder)
    }

    fn build_frame<F>(&mut self, components: &mut Components, builder: &mut F) -> Result<()>
    where
        F: FnMut() -> Element,
    {
        self.state = LoopState::Rendering;

        let mut tree = guarded(Phase::Build, || FrameTree::materialize(builder(), components))?;

        if let Err(err) = self.focus.rebuild(&tree) {
            warn!(error = %err, "focus rebuild failed, keeping previous ring");
            if let Some(hook) = self.frame_error.as_mut() {
                hook(&err);
            }
        }

        let focus = &self.focus;
        guarded(Phase::Render, || tree.expand_components(components, focus))?;

        let (width, height) = self.backend.size()?;
        self.size.set((width, height));

        let layout = self.resolver.resolve(&tree, Rect::new(0, 0, width, height))?;
        let canvas = paint(&tree, &layout, width, height);
        self.backend.draw(&canvas)?;

        self.frame = Frame { tree, layout };
        self.state = LoopState::Idle;
        Ok(())
    }
}

// =============================================================================
// Panic boundary
// =============================================================================

fn guarded<R>(phase: Phase, f: impl FnOnce() -> R) -> Result<R> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        error!(%phase, %message, "component callback panicked");
        Error::HandlerFault { phase, message }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::text;
    use crate::renderer::TestBackend;
    use crate::state::keyboard::KeyEvent;
    use std::time::Duration;

    fn setup() -> RenderLoop<TestBackend> {
        let config = Config::builder()
            .tick_rate(Duration::from_secs(60))
            .build()
            .unwrap();
        RenderLoop::new(config, TestBackend::new(20, 4))
    }

    #[test]
    fn test_panic_message_from_payloads() {
        let caught = panic::catch_unwind(|| -> u8 { panic!("boom") }).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "boom");

        let caught = panic::catch_unwind(|| -> u8 { panic!("{} {}", "formatted", 1) }).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "formatted 1");
    }

    #[test]
    fn test_guarded_maps_panic_to_fault() {
        let result: Result<()> = guarded(Phase::Tick, || panic!("tick broke"));
        match result {
            Err(Error::HandlerFault { phase, message }) => {
                assert_eq!(phase, Phase::Tick);
                assert_eq!(message, "tick broke");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_initial_state() {
        let app = setup();
        assert_eq!(app.state(), LoopState::Idle);
        assert_eq!(app.tick_sequence(), 0);
        assert_eq!(app.terminal_size().get(), (20, 4));
    }

    #[test]
    fn test_quit_after_initial_frame() {
        let mut app = setup();
        let mut components = Components::new();
        app.event_sender().send(KeyEvent::char('q'));

        app.run(&mut components, || text("hello")).unwrap();

        assert_eq!(app.state(), LoopState::Stopped);
        assert_eq!(app.backend().draw_count(), 1);
        assert!(app.backend().left());
        assert_eq!(app.backend().last_frame().unwrap().line(0).trim_end(), "hello");
    }

    #[test]
    fn test_pushed_tick_runs_cycle() {
        let mut app = setup();
        let mut components = Components::new();
        let sender = app.event_sender();
        sender.send(Event::Tick(0));
        sender.send(Event::Tick(0));
        sender.send(KeyEvent::char('q'));

        let ticks = app.tick_signal();
        app.run(&mut components, move || text(format!("tick {}", ticks.get())))
            .unwrap();

        assert_eq!(app.tick_sequence(), 2);
        assert_eq!(app.backend().draw_count(), 3);
        assert_eq!(app.backend().last_frame().unwrap().line(0).trim_end(), "tick 2");
    }

    #[test]
    fn test_resize_updates_size_signal() {
        let mut app = setup();
        let mut components = Components::new();
        let sender = app.event_sender();
        sender.send(Event::Resize(80, 24));
        sender.send(KeyEvent::char('q'));

        app.run(&mut components, || text("x")).unwrap();
        assert_eq!(app.terminal_size().get(), (80, 24));
    }

    #[test]
    fn test_stop_before_run_exits_after_first_frame() {
        let mut app = setup();
        let mut components = Components::new();
        app.stop_handle().stop();

        app.run(&mut components, || text("x")).unwrap();

        assert_eq!(app.backend().draw_count(), 1);
        assert!(!app.stop_handle().is_stopped());
    }
}

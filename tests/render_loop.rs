//! Render loop scenarios against the in-memory backend.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use spark_dsl::error::Phase;
use spark_dsl::prelude::*;

// =============================================================================
// Fixtures
// =============================================================================

struct Counter {
    count: Rc<Cell<u32>>,
}

impl Component for Counter {
    fn render(&self, focused: bool) -> Element {
        let marker = if focused { ">" } else { " " };
        text(format!("{marker}count {}", self.count.get()))
    }

    fn handle_key(&mut self, event: &KeyEvent) -> EventResult {
        if event.is_char('k') {
            self.count.set(self.count.get() + 1);
            EventResult::Handled
        } else {
            EventResult::Unhandled
        }
    }
}

/// Steps every third tick, bouncing between 0 and 100.
struct Progress {
    value: Rc<Cell<u8>>,
    rising: bool,
}

impl Component for Progress {
    fn render(&self, _focused: bool) -> Element {
        text(format!("{}%", self.value.get()))
    }

    fn on_tick(&mut self, sequence: u64) {
        if sequence % 3 != 0 {
            return;
        }
        let value = self.value.get();
        if (self.rising && value >= 100) || (!self.rising && value == 0) {
            self.rising = !self.rising;
        }
        self.value.set(if self.rising { value + 1 } else { value - 1 });
    }

    fn is_focusable(&self) -> bool {
        false
    }
}

struct Faulty;

impl Component for Faulty {
    fn render(&self, _focused: bool) -> Element {
        text("faulty")
    }

    fn on_tick(&mut self, _sequence: u64) {
        panic!("tick exploded");
    }
}

fn setup(backend: TestBackend) -> RenderLoop<TestBackend> {
    let config = Config::builder()
        .tick_rate(Duration::from_secs(3600))
        .mouse_capture(true)
        .build()
        .unwrap();
    RenderLoop::new(config, backend)
}

fn counter(components: &mut Components) -> (ComponentId, Rc<Cell<u32>>) {
    let count = Rc::new(Cell::new(0));
    let id = components.add(Counter {
        count: count.clone(),
    });
    (id, count)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_initial_frame_drawn_before_any_tick() {
    let mut app = setup(TestBackend::new(30, 5));
    let mut components = Components::new();
    let (id, _) = counter(&mut components);
    app.event_sender().send(KeyEvent::char('q'));

    app.run(&mut components, move || column([text("Header"), component(id)]))
        .unwrap();

    let backend = app.backend();
    assert!(backend.entered());
    assert!(backend.left());
    assert_eq!(backend.draw_count(), 1);
    assert_eq!(app.tick_sequence(), 0);

    let frame = backend.last_frame().unwrap();
    assert_eq!(frame.line(0).trim_end(), "Header");
    assert_eq!(frame.line(1).trim_end(), " count 0");
    assert_eq!(app.state(), LoopState::Stopped);
}

#[test]
fn test_focused_counter_takes_key() {
    let mut app = setup(TestBackend::new(30, 5));
    let mut components = Components::new();
    let (id, count) = counter(&mut components);

    let sender = app.event_sender();
    sender.send(KeyEvent::new(KeyCode::Tab));
    sender.send(KeyEvent::char('k'));
    sender.send(KeyEvent::char('k'));
    sender.send(Event::Tick(0));
    sender.send(KeyEvent::char('q'));

    app.run(&mut components, move || column([component(id)])).unwrap();

    assert_eq!(count.get(), 2);
    // Keys alone never redraw; the tick does
    assert_eq!(app.backend().draw_count(), 2);
    assert_eq!(
        app.backend().last_frame().unwrap().line(0).trim_end(),
        ">count 2"
    );
}

#[test]
fn test_unfocused_key_reaches_global_handler() {
    let mut app = setup(TestBackend::new(30, 5));
    let mut components = Components::new();
    let (id, count) = counter(&mut components);

    let seen = Rc::new(Cell::new(0));
    let global_seen = seen.clone();
    app.global_handlers_mut().push(move |event, _ctx| {
        if event.is_char('k') {
            global_seen.set(global_seen.get() + 1);
            EventResult::Handled
        } else {
            EventResult::Unhandled
        }
    });

    let sender = app.event_sender();
    sender.send(KeyEvent::char('k'));
    sender.send(KeyEvent::char('q'));
    app.run(&mut components, move || component(id)).unwrap();

    assert_eq!(count.get(), 0);
    assert_eq!(seen.get(), 1);
}

#[test]
fn test_tab_with_no_focusables_is_harmless() {
    let mut app = setup(TestBackend::new(10, 2));
    let mut components = Components::new();

    let sender = app.event_sender();
    sender.send(KeyEvent::new(KeyCode::Tab));
    sender.send(KeyEvent::new(KeyCode::BackTab));
    sender.send(KeyEvent::char('q'));

    app.run(&mut components, || text("empty")).unwrap();
    assert_eq!(app.focus().current_focus(), None);
}

#[test]
fn test_progress_bounces_every_third_tick() {
    let mut app = setup(TestBackend::new(10, 2));
    let mut components = Components::new();
    let value = Rc::new(Cell::new(99));
    let id = components.add(Progress {
        value: value.clone(),
        rising: true,
    });

    let history = Rc::new(RefCell::new(Vec::new()));
    let sender = app.event_sender();
    for _ in 0..9 {
        sender.send(Event::Tick(0));
    }
    sender.send(KeyEvent::char('q'));

    let recorded = history.clone();
    let observed = value.clone();
    app.run(&mut components, move || {
        recorded.borrow_mut().push(observed.get());
        component(id)
    })
    .unwrap();

    assert_eq!(
        *history.borrow(),
        vec![99, 99, 99, 100, 100, 100, 99, 99, 99, 98]
    );
    assert_eq!(app.tick_sequence(), 9);
}

#[test]
fn test_draw_failure_stops_and_restores() {
    let mut app = setup(TestBackend::new(10, 2).fail_at_draw(1));
    let mut components = Components::new();
    app.event_sender().send(Event::Tick(0));

    let err = app.run(&mut components, || text("x")).unwrap_err();

    assert!(matches!(err, Error::Backend(_)));
    assert!(err.is_fatal());
    assert!(app.backend().left());
    assert_eq!(app.state(), LoopState::Stopped);
}

#[test]
fn test_panicking_tick_is_a_handler_fault() {
    let mut app = setup(TestBackend::new(10, 2));
    let mut components = Components::new();
    let id = components.add(Faulty);
    app.event_sender().send(Event::Tick(0));

    let err = app.run(&mut components, move || component(id)).unwrap_err();

    match err {
        Error::HandlerFault { phase, message } => {
            assert_eq!(phase, Phase::Tick);
            assert_eq!(message, "tick exploded");
        }
        other => panic!("expected handler fault, got {other:?}"),
    }
    assert!(app.backend().left());
}

#[test]
fn test_duplicate_focus_key_reported_and_frame_still_drawn() {
    let mut app = setup(TestBackend::new(20, 3));
    let mut components = Components::new();
    let (first, _) = counter(&mut components);
    let (second, _) = counter(&mut components);

    let reported = Rc::new(RefCell::new(Vec::new()));
    let sink = reported.clone();
    app.on_frame_error(move |err| sink.borrow_mut().push(err.to_string()));
    app.event_sender().send(KeyEvent::char('q'));

    app.run(&mut components, move || {
        column([
            component(first).focusable("same"),
            component(second).focusable("same"),
        ])
    })
    .unwrap();

    assert_eq!(reported.borrow().len(), 1);
    assert!(reported.borrow()[0].contains("same"));
    assert_eq!(app.backend().draw_count(), 1);
    assert!(app.focus().handles().is_empty());
}

#[test]
fn test_click_toggles_and_focuses() {
    let mut app = setup(TestBackend::new(20, 3));
    let mut components = Components::new();
    let sound = components.add(Toggle::new("Sound"));

    let sender = app.event_sender();
    sender.send(MouseEvent::down(1, 0));
    sender.send(Event::Tick(0));
    sender.send(KeyEvent::char('q'));

    app.run(&mut components, move || column([component(sound)])).unwrap();

    assert!(app.focus().is_focused(&sound.to_string()));
    assert_eq!(
        app.backend().last_frame().unwrap().line(0).trim_end(),
        "[ ON] Sound"
    );
}

#[test]
fn test_mouse_dropped_without_capture() {
    let config = Config::builder()
        .tick_rate(Duration::from_secs(3600))
        .build()
        .unwrap();
    let mut app = RenderLoop::new(config, TestBackend::new(20, 3));
    let mut components = Components::new();
    let sound = components.add(Toggle::new("Sound"));

    let sender = app.event_sender();
    sender.send(MouseEvent::down(1, 0));
    sender.send(Event::Tick(0));
    sender.send(KeyEvent::char('q'));

    app.run(&mut components, move || column([component(sound)])).unwrap();
    assert_eq!(
        app.backend().last_frame().unwrap().line(0).trim_end(),
        "[OFF] Sound"
    );
}

#[test]
fn test_stop_handle_from_another_thread() {
    let config = Config::builder()
        .tick_rate(Duration::from_millis(5))
        .build()
        .unwrap();
    let mut app = RenderLoop::new(config, TestBackend::new(10, 2));
    let mut components = Components::new();

    let stop = app.stop_handle();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        stop.stop();
    });

    app.run(&mut components, || text("running")).unwrap();
    stopper.join().unwrap();

    assert!(app.tick_sequence() > 0);
    assert_eq!(app.state(), LoopState::Stopped);
}

//! Playground - floating panels, focus, drag, and ticks.
//!
//! - `1`..`4` add a counter, progress, toggle, or select panel
//! - `x` deletes the focused panel
//! - Tab / Shift+Tab cycle focus, click focuses
//! - Drag a panel by its top border
//! - `q` or Ctrl+C quits
//!
//! Set `SPARK_DSL_LOG=/tmp/spark.log` to capture logs (stdout belongs to the UI).
//!
//! Run with: cargo run --example playground

use std::cell::RefCell;
use std::fs::File;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use spark_dsl::prelude::*;
use tracing_subscriber::EnvFilter;

// =============================================================================
// Panel contents
// =============================================================================

#[derive(Default)]
struct Counter {
    value: i64,
}

impl Component for Counter {
    fn render(&self, _focused: bool) -> Element {
        column([
            text(format!("Value: {}", self.value)).bold(),
            text("k/j or ↑/↓").dim(),
        ])
    }

    fn handle_key(&mut self, event: &KeyEvent) -> EventResult {
        if event.is_char('k') || event.is_up() {
            self.value += 1;
        } else if event.is_char('j') || event.is_down() {
            self.value -= 1;
        } else {
            return EventResult::Unhandled;
        }
        EventResult::Handled
    }
}

/// Bounces between 0 and 100, one step every third tick.
struct Progress {
    value: u8,
    rising: bool,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            value: 0,
            rising: true,
        }
    }
}

impl Component for Progress {
    fn render(&self, _focused: bool) -> Element {
        const WIDTH: usize = 16;
        let filled = self.value as usize * WIDTH / 100;
        row([
            text("█".repeat(filled)).fg(Rgba::GREEN),
            text("░".repeat(WIDTH - filled)).fg(Rgba::DARK_GRAY),
            text(format!(" {:>3}%", self.value)),
        ])
    }

    fn on_tick(&mut self, sequence: u64) {
        if sequence % 3 != 0 {
            return;
        }
        if (self.rising && self.value >= 100) || (!self.rising && self.value == 0) {
            self.rising = !self.rising;
        }
        self.value = if self.rising {
            self.value + 1
        } else {
            self.value - 1
        };
    }
}

// =============================================================================
// Floating wrapper
// =============================================================================

/// Gives any component a draggable floating frame.
struct Floating<C> {
    title: String,
    state: FloatState,
    size: (u16, u16),
    inner: C,
}

impl<C: Component> Floating<C> {
    fn new(title: &str, slot: usize, size: (u16, u16), inner: C) -> Self {
        let step = slot as u16;
        Self {
            title: title.to_string(),
            state: FloatState::new(2 + step * 4, 3 + step * 2),
            size,
            inner,
        }
    }
}

impl<C: Component> Component for Floating<C> {
    fn render(&self, focused: bool) -> Element {
        let geometry = FloatGeometry {
            x: self.state.x,
            y: self.state.y,
            width: self.size.0,
            height: self.size.1,
            z: self.state.z,
        };
        let border = if focused { Rgba::CYAN } else { Rgba::WHITE };
        float(geometry, [self.inner.render(focused)])
            .title(self.title.clone())
            .fg(border)
    }

    fn on_tick(&mut self, sequence: u64) {
        self.inner.on_tick(sequence);
    }

    fn handle_key(&mut self, event: &KeyEvent) -> EventResult {
        self.inner.handle_key(event)
    }

    fn handle_mouse(&mut self, event: &MouseEvent) -> EventResult {
        self.inner.handle_mouse(event)
    }

    fn float_state(&mut self) -> Option<&mut FloatState> {
        Some(&mut self.state)
    }
}

fn spawn_panel(components: &mut Components, kind: char, slot: usize) -> Option<ComponentId> {
    let id = match kind {
        '1' => components.add(Floating::new("Counter", slot, (24, 5), Counter::default())),
        '2' => components.add(Floating::new("Progress", slot, (26, 3), Progress::default())),
        '3' => components.add(Floating::new("Toggle", slot, (20, 3), Toggle::new("Sound"))),
        '4' => components.add(Floating::new(
            "Select",
            slot,
            (26, 3),
            Select::new("Theme", ["Dark", "Light", "Solar"]),
        )),
        _ => return None,
    };
    Some(id)
}

// =============================================================================
// Main
// =============================================================================

fn init_logging() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let Ok(path) = std::env::var("SPARK_DSL_LOG") else {
        return Ok(());
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("spark_dsl=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(File::create(path)?))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let config = Config::builder()
        .tick_rate(Duration::from_millis(50))
        .mouse_capture(true)
        .build()?;
    let mut app = RenderLoop::new(config, CrosstermBackend::stdout());
    let mut components = Components::new();

    let panels: Rc<RefCell<Vec<ComponentId>>> = Rc::new(RefCell::new(Vec::new()));
    for kind in ['1', '2', '3', '4'] {
        let slot = panels.borrow().len();
        if let Some(id) = spawn_panel(&mut components, kind, slot) {
            panels.borrow_mut().push(id);
        }
    }

    let handler_panels = panels.clone();
    app.global_handlers_mut().push(move |event, ctx| {
        let KeyCode::Char(key) = event.code else {
            return EventResult::Unhandled;
        };
        if !event.is_char(key) {
            return EventResult::Unhandled;
        }
        let mut panels = handler_panels.borrow_mut();
        match key {
            '1'..='4' => {
                if let Some(id) = spawn_panel(ctx.components, key, panels.len()) {
                    panels.push(id);
                }
                EventResult::Handled
            }
            'x' => {
                let focused = ctx.focus.current_focus().map(|k| k.to_string());
                let position =
                    focused.and_then(|k| panels.iter().position(|id| id.to_string() == k));
                if let Some(pos) = position {
                    let id = panels.remove(pos);
                    ctx.components.remove(id);
                }
                EventResult::Handled
            }
            _ => EventResult::Unhandled,
        }
    });

    let size = app.terminal_size();
    let ticks = app.tick_signal();
    app.run(&mut components, move || {
        let (width, height) = size.get();
        let mut children = vec![
            text("1-4 add · x delete · Tab focus · drag title · q quit").bold(),
            text(format!("{width}x{height} · tick {}", ticks.get())).dim(),
        ];
        children.extend(panels.borrow().iter().map(|&id| component(id)));
        column(children)
    })?;

    Ok(())
}

//! Differential renderer.
//!
//! Compares the current canvas to the previous one and only emits cells that
//! changed.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update
//! 2. For each cell in the new canvas:
//!    - If the previous canvas has the same size and the cell is unchanged: skip
//!    - Otherwise: move the cursor if needed, switch style if needed, print
//! 3. Flush once
//! 4. Store the canvas for the next comparison

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};

use crate::layout::text_measure::char_width;
use crate::types::{Attr, Rgba, Style};

use super::canvas::Canvas;

pub struct DiffRenderer {
    previous: Option<Canvas>,
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Render a canvas, emitting only changed cells.
    ///
    /// Returns true if any cells were emitted.
    pub fn render<W: Write>(&mut self, out: &mut W, canvas: &Canvas) -> io::Result<bool> {
        let previous = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == canvas.width() && prev.height() == canvas.height());

        queue!(out, BeginSynchronizedUpdate)?;

        let mut changed = false;
        let mut cursor: Option<(u16, u16)> = None;
        let mut current_style: Option<Style> = None;

        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                let Some(cell) = canvas.get(x, y) else {
                    continue;
                };
                if cell.is_continuation() {
                    continue;
                }
                if previous.and_then(|prev| prev.get(x, y)) == Some(cell) {
                    continue;
                }

                changed = true;
                if cursor != Some((x, y)) {
                    queue!(out, MoveTo(x, y))?;
                }
                if current_style != Some(cell.style) {
                    apply_style(out, cell.style)?;
                    current_style = Some(cell.style);
                }
                queue!(out, Print(cell.symbol))?;
                cursor = Some((x + char_width(cell.symbol).max(1), y));
            }
        }

        if changed {
            queue!(out, SetAttribute(Attribute::Reset))?;
        }
        queue!(out, EndSynchronizedUpdate)?;
        out.flush()?;

        self.previous = Some(canvas.clone());
        Ok(changed)
    }

    /// Forget the previous canvas; the next render is a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

fn apply_style<W: Write>(out: &mut W, style: Style) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        SetForegroundColor(to_color(style.fg)),
        SetBackgroundColor(to_color(style.bg)),
    )?;

    const ATTRS: [(Attr, Attribute); 8] = [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::BLINK, Attribute::SlowBlink),
        (Attr::INVERSE, Attribute::Reverse),
        (Attr::HIDDEN, Attribute::Hidden),
        (Attr::STRIKETHROUGH, Attribute::CrossedOut),
    ];
    for (flag, attribute) in ATTRS {
        if style.attrs.contains(flag) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    Ok(())
}

fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else if color.is_ansi() {
        Color::AnsiValue(color.ansi_index())
    } else {
        Color::Rgb {
            r: color.r.clamp(0, 255) as u8,
            g: color.g.clamp(0, 255) as u8,
            b: color.b.clamp(0, 255) as u8,
        }
    }
}

//! Canvas - a grid of styled cells the paint pass writes into.

use crate::layout::text_measure::char_width;
use crate::types::{Rect, Style};

/// Marks the second column of a double-width character.
pub const CONTINUATION: char = '\0';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: ' ',
            style: Style::default(),
        }
    }
}

impl Cell {
    pub fn is_continuation(&self) -> bool {
        self.symbol == CONTINUATION
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn area(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, symbol: char, style: Style) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { symbol, style };
        }
    }

    /// Fill `rect` (clipped to the canvas) with blanks in `style`.
    pub fn fill(&mut self, rect: Rect, style: Style) {
        let Some(rect) = rect.intersect(&self.area()) else {
            return;
        };
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set(x, y, ' ', style);
            }
        }
    }

    /// Write one line of text starting at (x, y), clipped to `clip`.
    /// Returns the column after the last cell written.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: Style, clip: Rect) -> u16 {
        let mut col = x;
        if y < clip.y || y >= clip.bottom() {
            return col;
        }
        for c in text.chars() {
            let w = char_width(c);
            if w == 0 {
                continue;
            }
            if col as u32 + w as u32 > clip.right() as u32 {
                break;
            }
            if col >= clip.x {
                self.set(col, y, c, style);
                if w == 2 {
                    self.set(col + 1, y, CONTINUATION, style);
                }
            }
            col += w;
        }
        col
    }

    /// Row `y` as plain text, wide characters counted once.
    pub fn line(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|cell| !cell.is_continuation())
            .map(|cell| cell.symbol)
            .collect()
    }

    /// Every row as plain text.
    pub fn lines(&self) -> Vec<String> {
        (0..self.height).map(|y| self.line(y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_str_clips() {
        let mut canvas = Canvas::new(10, 2);
        let clip = Rect::new(2, 0, 4, 1);
        canvas.put_str(0, 0, "abcdefgh", Style::default(), clip);
        assert_eq!(canvas.line(0), "  cdef    ");
        canvas.put_str(0, 1, "outside", Style::default(), clip);
        assert_eq!(canvas.line(1), "          ");
    }

    #[test]
    fn test_wide_char_continuation() {
        let mut canvas = Canvas::new(4, 1);
        canvas.put_str(0, 0, "日本", Style::default(), canvas.area());
        assert!(canvas.get(1, 0).unwrap().is_continuation());
        assert_eq!(canvas.line(0), "日本");
    }

    #[test]
    fn test_wide_char_not_split_at_edge() {
        let mut canvas = Canvas::new(3, 1);
        canvas.put_str(0, 0, "a日本", Style::default(), canvas.area());
        assert_eq!(canvas.line(0), "a日");
    }

    #[test]
    fn test_fill_clipped_to_canvas() {
        let mut canvas = Canvas::new(3, 3);
        canvas.put_str(0, 0, "xxx", Style::default(), canvas.area());
        canvas.fill(Rect::new(1, 0, 10, 10), Style::default());
        assert_eq!(canvas.line(0), "x  ");
    }
}

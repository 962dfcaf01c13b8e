//! Core types for spark-dsl.
//!
//! Colors, text attributes, the opaque [`Style`] payload attached to elements,
//! terminal rectangles, and layout [`Constraint`]s. None of these are
//! interpreted by the dispatch core; they flow through to the layout solver
//! and the painter.

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Special value: r=-1 means "terminal default" (let terminal pick).
/// r=-2 marks an ANSI palette color with the index stored in `g`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TERMINAL_DEFAULT
    }
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const BLACK: Self = Self::ansi(0);
    pub const RED: Self = Self::ansi(1);
    pub const GREEN: Self = Self::ansi(2);
    pub const YELLOW: Self = Self::ansi(3);
    pub const BLUE: Self = Self::ansi(4);
    pub const MAGENTA: Self = Self::ansi(5);
    pub const CYAN: Self = Self::ansi(6);
    pub const WHITE: Self = Self::ansi(7);
    pub const DARK_GRAY: Self = Self::ansi(8);

    /// Create an ANSI palette color (0-255).
    pub const fn ansi(index: u8) -> Self {
        Self {
            r: -2,
            g: index as i16,
            b: 0,
            a: 255,
        }
    }

    /// Check if this is the terminal default color.
    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    /// Check if this is an ANSI palette color.
    #[inline]
    pub const fn is_ansi(&self) -> bool {
        self.r == -2
    }

    /// Get ANSI palette index (only valid if is_ansi() returns true).
    #[inline]
    pub const fn ansi_index(&self) -> u8 {
        self.g as u8
    }

    /// Parse hex color string (#RGB or #RRGGBB).
    ///
    /// ```
    /// use spark_dsl::types::Rgba;
    ///
    /// assert_eq!(Rgba::from_hex("#ff0000"), Some(Rgba::rgb(255, 0, 0)));
    /// assert_eq!(Rgba::from_hex("fff"), Some(Rgba::rgb(255, 255, 255)));
    /// assert!(Rgba::from_hex("#gg0000").is_none());
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn hex_digit(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = hex_digit(bytes[0])?;
                let g = hex_digit(bytes[1])?;
                let b = hex_digit(bytes[2])?;
                Some(Self::rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
            }
            6 => {
                let mut channels = [0u8; 3];
                for (i, channel) in channels.iter_mut().enumerate() {
                    let high = hex_digit(bytes[i * 2])?;
                    let low = hex_digit(bytes[i * 2 + 1])?;
                    *channel = (high << 4) | low;
                }
                Some(Self::rgb(channels[0], channels[1], channels[2]))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Text Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const INVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

// =============================================================================
// Style - opaque formatting payload
// =============================================================================

/// Formatting attached to an element.
///
/// Copyable and never interpreted by the dispatch core. The painter reads it;
/// nothing else does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }

    pub const fn fg(mut self, color: Rgba) -> Self {
        self.fg = color;
        self
    }

    pub const fn bg(mut self, color: Rgba) -> Self {
        self.bg = color;
        self
    }

    pub fn add(mut self, attrs: Attr) -> Self {
        self.attrs |= attrs;
        self
    }

    /// Overlay `other` on top of `self`: set colors and attributes win.
    pub fn patch(self, other: Style) -> Self {
        Self {
            fg: if other.fg.is_terminal_default() { self.fg } else { other.fg },
            bg: if other.bg.is_terminal_default() { self.bg } else { other.bg },
            attrs: self.attrs | other.attrs,
        }
    }
}

// =============================================================================
// Rect
// =============================================================================

/// A rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Check if a point is inside this rect.
    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && (x as u32) < self.x as u32 + self.width as u32
            && y >= self.y
            && (y as u32) < self.y as u32 + self.height as u32
    }

    #[inline]
    pub fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Compute intersection of two rects.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Shrink by one cell on every side (the area inside a border).
    pub fn inner(&self) -> Rect {
        Rect::new(
            self.x.saturating_add(1),
            self.y.saturating_add(1),
            self.width.saturating_sub(2),
            self.height.saturating_sub(2),
        )
    }
}

// =============================================================================
// Constraint
// =============================================================================

/// Size request along the parent container's main axis.
///
/// Opaque to the dispatch core; only the layout solver reads it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Exactly `n` cells.
    Length(u16),
    /// Percentage of the parent (0-100).
    Percentage(u16),
    /// `numerator / denominator` of the parent.
    Ratio(u32, u32),
    /// At least `n` cells, grows into free space.
    Min(u16),
    /// At most `n` cells, grows into free space.
    Max(u16),
    /// Share of the remaining space, weighted.
    Fill(u16),
}

impl Default for Constraint {
    fn default() -> Self {
        Self::Fill(1)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::new(2, 3, 4, 2);
        assert!(rect.contains(2, 3));
        assert!(rect.contains(5, 4));
        assert!(!rect.contains(6, 4));
        assert!(!rect.contains(5, 5));
        assert!(!rect.contains(1, 3));
    }

    #[test]
    fn test_rect_contains_near_u16_max() {
        let rect = Rect::new(u16::MAX - 1, 0, 10, 1);
        assert!(rect.contains(u16::MAX, 0));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.intersect(&Rect::new(20, 20, 1, 1)), None);
    }

    #[test]
    fn test_rect_inner_saturates() {
        assert_eq!(Rect::new(0, 0, 1, 1).inner(), Rect::new(1, 1, 0, 0));
        assert_eq!(Rect::new(0, 0, 10, 5).inner(), Rect::new(1, 1, 8, 3));
    }

    #[test]
    fn test_style_patch() {
        let base = Style::new().fg(Rgba::RED).add(Attr::BOLD);
        let patched = base.patch(Style::new().bg(Rgba::BLUE).add(Attr::DIM));
        assert_eq!(patched.fg, Rgba::RED);
        assert_eq!(patched.bg, Rgba::BLUE);
        assert_eq!(patched.attrs, Attr::BOLD | Attr::DIM);
    }

    #[test]
    fn test_default_constraint_is_fill() {
        assert_eq!(Constraint::default(), Constraint::Fill(1));
    }
}

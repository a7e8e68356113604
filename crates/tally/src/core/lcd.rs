//! LCD frame rendering
//!
//! Draws the display text inside a small box, right-aligned the way a
//! physical calculator shows it.

use std::fmt;
use std::str::FromStr;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Characters used for the frame border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum LcdStyle {
    /// Unicode box-drawing characters: ┌ ┐ └ ┘ ─ │
    #[default]
    Unicode,
    /// Pure ASCII: + - |
    Ascii,
}

impl LcdStyle {
    fn corners(&self) -> [char; 4] {
        match self {
            LcdStyle::Unicode => ['┌', '┐', '└', '┘'],
            LcdStyle::Ascii => ['+', '+', '+', '+'],
        }
    }

    fn horizontal(&self) -> char {
        match self {
            LcdStyle::Unicode => '─',
            LcdStyle::Ascii => '-',
        }
    }

    fn vertical(&self) -> char {
        match self {
            LcdStyle::Unicode => '│',
            LcdStyle::Ascii => '|',
        }
    }
}

impl fmt::Display for LcdStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LcdStyle::Unicode => write!(f, "unicode"),
            LcdStyle::Ascii => write!(f, "ascii"),
        }
    }
}

impl FromStr for LcdStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unicode" => Ok(LcdStyle::Unicode),
            "ascii" => Ok(LcdStyle::Ascii),
            _ => Err(format!("Unknown LCD style: {}", s)),
        }
    }
}

/// Fixed-width LCD frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcdFrame {
    width: usize,
    style: LcdStyle,
}

impl LcdFrame {
    /// Default number of display columns
    pub const DEFAULT_WIDTH: usize = 16;

    /// Create a frame with `width` display columns (at least one)
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            style: LcdStyle::default(),
        }
    }

    pub fn with_style(mut self, style: LcdStyle) -> Self {
        self.style = style;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Render `display` as three lines, without a trailing newline
    ///
    /// # Example
    /// ```
    /// use tally::core::{LcdFrame, LcdStyle};
    ///
    /// let frame = LcdFrame::new(4).with_style(LcdStyle::Ascii);
    /// assert_eq!(frame.render("42"), "+------+\n|   42 |\n+------+");
    /// ```
    pub fn render(&self, display: &str) -> String {
        let [top_left, top_right, bottom_left, bottom_right] = self.style.corners();
        let rule: String = std::iter::repeat(self.style.horizontal())
            .take(self.width + 2)
            .collect();
        let text = visible_tail(display, self.width);
        let padding = " ".repeat(self.width - UnicodeWidthStr::width(text.as_str()));
        let bar = self.style.vertical();

        format!(
            "{top_left}{rule}{top_right}\n{bar} {padding}{text} {bar}\n{bottom_left}{rule}{bottom_right}"
        )
    }
}

impl Default for LcdFrame {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH)
    }
}

/// Rightmost characters of `text` that fit in `width` columns
fn visible_tail(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }

    let mut used = 0;
    let mut tail: Vec<char> = Vec::new();
    for c in text.chars().rev() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        tail.push(c);
    }
    tail.into_iter().rev().collect()
}

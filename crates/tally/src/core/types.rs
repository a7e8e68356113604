//! Core type definitions for keypad input
//!
//! Button payloads are resolved into a [`Key`] once, at the boundary. The
//! state machine never compares raw button text.

use std::fmt;
use std::str::FromStr;

use super::CalculatorError;

/// Binary operator that can be pending between two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Addition: `+`
    Add,
    /// Subtraction: `-`
    Subtract,
    /// Multiplication: `x`
    Multiply,
    /// Division: `÷`
    Divide,
    /// Percentage used as a binary modifier: `%`
    Percent,
}

impl Operator {
    /// Glyph appended to the display while this operator is pending
    pub fn glyph(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => 'x',
            Operator::Divide => '÷',
            Operator::Percent => '%',
        }
    }

    /// Resolve a glyph, accepting the common keyboard aliases for `x` and `÷`
    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            'x' | '×' | '*' => Some(Operator::Multiply),
            '÷' | '/' => Some(Operator::Divide),
            '%' => Some(Operator::Percent),
            _ => None,
        }
    }

    /// Returns true if `c` is one of the glyphs the display can carry
    pub fn is_display_glyph(c: char) -> bool {
        matches!(c, '+' | '-' | 'x' | '÷' | '%')
    }

    /// All operators in keypad order
    pub fn all() -> [Operator; 5] {
        [
            Operator::Add,
            Operator::Subtract,
            Operator::Multiply,
            Operator::Divide,
            Operator::Percent,
        ]
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// A single decimal digit, `0..=9`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Digit(value))
    }

    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Digit(d as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn as_char(&self) -> char {
        char::from(b'0' + self.0)
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A keypad input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Digit(Digit),
    Decimal,
    Operator(Operator),
    Equals,
    /// The dedicated percent button, distinct from `%` as a chained operator
    Percent,
    Clear,
    Backspace,
}

impl Key {
    /// Shorthand for a digit key; values above 9 are rejected
    pub fn digit(value: u8) -> Option<Self> {
        Digit::new(value).map(Key::Digit)
    }

    /// The full keypad in layout order
    pub fn all() -> Vec<Key> {
        let mut keys = vec![Key::Clear, Key::Backspace, Key::Percent];
        keys.extend(Operator::all().into_iter().map(Key::Operator));
        keys.extend((0..=9).filter_map(Key::digit));
        keys.push(Key::Decimal);
        keys.push(Key::Equals);
        keys
    }

    /// Accepted labels for this key, canonical label first
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Key::Digit(_) => &[],
            Key::Decimal => &["."],
            Key::Operator(Operator::Add) => &["+"],
            Key::Operator(Operator::Subtract) => &["-"],
            Key::Operator(Operator::Multiply) => &["x", "×", "*"],
            Key::Operator(Operator::Divide) => &["÷", "/"],
            Key::Operator(Operator::Percent) => &["mod"],
            Key::Equals => &["=", "calculate", "enter"],
            Key::Percent => &["%", "percentage"],
            Key::Clear => &["C", "AC", "clear"],
            Key::Backspace => &["⌫", "DEL", "backspace"],
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Digit(d) => write!(f, "{}", d),
            Key::Operator(Operator::Percent) => write!(f, "mod"),
            Key::Operator(op) => write!(f, "{}", op),
            other => write!(f, "{}", other.aliases()[0]),
        }
    }
}

impl FromStr for Key {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let mut chars = label.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(digit) = Digit::from_char(c) {
                return Ok(Key::Digit(digit));
            }
            // `%` on its own is the percent button, not the chained operator
            if c != '%' {
                if let Some(op) = Operator::from_glyph(c) {
                    return Ok(Key::Operator(op));
                }
            }
        }

        Key::all()
            .into_iter()
            .find(|key| {
                key.aliases()
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(label))
            })
            .ok_or_else(|| CalculatorError::unknown_key(label))
    }
}

//! Tally - a keypad calculator state machine
//!
//! Interprets digit, decimal, operator and control key presses the way a
//! simple pocket calculator does, and keeps the text its display shows.
//!
//! # Quick Start
//!
//! ```rust
//! use tally::evaluate;
//!
//! assert_eq!(evaluate("5 + 3 + 2 =").unwrap(), "10");
//! assert_eq!(evaluate("100 + 50 %").unwrap(), "150");
//! ```
//!
//! # Driving a Session
//!
//! ```rust
//! use tally::prelude::*;
//!
//! let mut calc = Calculator::new();
//! for key in parse_script("7 +").unwrap() {
//!     calc.press(key).unwrap();
//! }
//! assert_eq!(calc.display(), "7+");
//!
//! calc.press(Key::Backspace).unwrap();
//! assert_eq!(calc.display(), "7");
//! assert_eq!(calc.operator(), None);
//! ```

pub mod core;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        format_number, parse_float, parse_script, Calculator, CalculatorError, Digit, Key,
        LcdFrame, LcdStyle, Operator, Snapshot,
    };
}

/// Run a key script on a fresh calculator and return the final display
///
/// A division by zero surfaces as an error, like it would interrupt the user.
///
/// # Example
/// ```rust
/// use tally::evaluate;
///
/// assert_eq!(evaluate("1 ÷ 4 =").unwrap(), "0.25");
/// assert!(evaluate("5 ÷ 0 =").is_err());
/// ```
pub fn evaluate(script: &str) -> anyhow::Result<String> {
    let keys = parse_script(script)?;
    let mut calculator = Calculator::new();
    let display = calculator.press_all(keys)?;
    Ok(display.to_string())
}

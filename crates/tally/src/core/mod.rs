//! Core calculator machinery
//!
//! The state machine lives in `calculator`; the other modules cover key
//! resolution, number text, key scripts and display framing.

mod calculator;
mod error;
mod keyscript;
mod lcd;
pub mod logging;
mod number;
mod types;

pub use calculator::*;
pub use error::*;
pub use keyscript::*;
pub use lcd::*;
pub use logging::*;
pub use number::*;
pub use types::*;

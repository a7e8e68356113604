//! Core error types for the calculator
//!
//! Only `DivisionByZero` ever reaches a caller of [`Calculator::press`](crate::Calculator::press);
//! a malformed operand is recovered inside the state machine.

use thiserror::Error;

/// Message shown to the user when a division by zero is attempted
pub const DIVIDE_BY_ZERO_MESSAGE: &str = "Cannot divide by zero!";

/// Core error types for keypad processing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("Malformed operand: {operand:?}")]
    MalformedOperand { operand: String },

    #[error("Cannot divide by zero!")]
    DivisionByZero,

    #[error("Unknown key: {label:?}")]
    UnknownKey { label: String },

    #[error("Script error: {message} at offset {offset}")]
    Script { message: String, offset: usize },
}

impl CalculatorError {
    /// Create a new malformed operand error
    pub fn malformed_operand(operand: impl Into<String>) -> Self {
        Self::MalformedOperand {
            operand: operand.into(),
        }
    }

    /// Create a new unknown key error
    pub fn unknown_key(label: impl Into<String>) -> Self {
        Self::UnknownKey {
            label: label.into(),
        }
    }

    /// Create a new key script error
    pub fn script(message: impl Into<String>, offset: usize) -> Self {
        Self::Script {
            message: message.into(),
            offset,
        }
    }

    /// Returns true if this error must be shown to the user
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, CalculatorError::MalformedOperand { .. })
    }
}

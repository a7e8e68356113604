//! Keypad calculator state machine
//!
//! [`Calculator`] owns one session: the operands as typed text, the pending
//! operator, the display text and two mode flags. Each [`Key`] is handled to
//! completion and yields the new display text.
//!
//! The display may carry the pending operator glyph appended to the first
//! operand (`"7+"`). `operator_shown` records that the trailing character is
//! such a glyph, so backspace and digit entry can tell it apart from a digit.

use tracing::{debug, debug_span, trace, warn};

use super::{format_number, parse_float, CalculatorError, Digit, Key, Operator};

const INITIAL_DISPLAY: &str = "0";

/// Complete, comparable copy of a calculator's state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub first_operand: String,
    pub second_operand: String,
    pub operator: Option<Operator>,
    pub display: String,
    pub reset_pending: bool,
    pub operator_shown: bool,
}

/// A single calculator session
///
/// # Example
/// ```
/// use tally::{Calculator, Key, Operator};
///
/// let mut calc = Calculator::new();
/// calc.press_label("1").unwrap();
/// calc.press_label("2").unwrap();
/// calc.press(Key::Operator(Operator::Add)).unwrap();
/// calc.press_label("3").unwrap();
/// assert_eq!(calc.press(Key::Equals).unwrap(), "15");
/// ```
#[derive(Debug, Clone)]
pub struct Calculator {
    first_operand: String,
    second_operand: String,
    operator: Option<Operator>,
    display: String,
    reset_pending: bool,
    operator_shown: bool,
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            first_operand: String::new(),
            second_operand: String::new(),
            operator: None,
            display: INITIAL_DISPLAY.to_string(),
            reset_pending: false,
            operator_shown: false,
        }
    }

    /// Handle one key and return the display text
    ///
    /// A division by zero resets the session before the error is returned;
    /// the caller is expected to show the message and then render
    /// [`display`](Self::display), which is `"0"` again.
    pub fn press(&mut self, key: Key) -> Result<&str, CalculatorError> {
        let span = debug_span!("press", key = %key);
        let _enter = span.enter();

        let outcome = match key {
            Key::Digit(digit) => {
                self.append_digit(digit);
                Ok(())
            }
            Key::Decimal => {
                self.append_decimal();
                Ok(())
            }
            Key::Operator(op) => self.select_operator(op),
            Key::Equals => self.calculate(),
            Key::Percent => self.percent(),
            Key::Clear => {
                self.clear();
                Ok(())
            }
            Key::Backspace => {
                self.backspace();
                Ok(())
            }
        };

        if let Err(err) = outcome {
            if err.is_user_visible() {
                warn!(error = %err, "Calculation aborted");
                return Err(err);
            }
            debug!(error = %err, "Calculation skipped");
        }

        debug!(display = %self.display, "Key handled");
        Ok(&self.display)
    }

    /// Handle keys in order, stopping at the first user-visible error
    pub fn press_all<I>(&mut self, keys: I) -> Result<&str, CalculatorError>
    where
        I: IntoIterator<Item = Key>,
    {
        for key in keys {
            self.press(key)?;
        }
        Ok(&self.display)
    }

    /// Resolve a button label (`"7"`, `"÷"`, `"backspace"`, ...) and press it
    pub fn press_label(&mut self, label: &str) -> Result<&str, CalculatorError> {
        let key: Key = label.parse()?;
        self.press(key)
    }

    /// Reset every field to the freshly constructed state
    pub fn clear(&mut self) {
        trace!("Clearing calculator");
        *self = Self::new();
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn first_operand(&self) -> &str {
        &self.first_operand
    }

    pub fn second_operand(&self) -> &str {
        &self.second_operand
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }

    pub fn is_operator_shown(&self) -> bool {
        self.operator_shown
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            first_operand: self.first_operand.clone(),
            second_operand: self.second_operand.clone(),
            operator: self.operator,
            display: self.display.clone(),
            reset_pending: self.reset_pending,
            operator_shown: self.operator_shown,
        }
    }

    fn append_digit(&mut self, digit: Digit) {
        let c = digit.as_char();
        if self.reset_pending && !self.operator_shown {
            trace!("Starting a new number");
            self.display = c.to_string();
            self.reset_pending = false;
        } else if self.display == "0" || self.display == "-0" || self.is_showing_operator() {
            self.display = c.to_string();
            self.operator_shown = false;
            // The glyph was the pending entry; the second operand starts here
            self.reset_pending = false;
        } else {
            self.display.push(c);
        }
        self.route_display();
    }

    fn append_decimal(&mut self) {
        if self.reset_pending {
            self.display = "0.".to_string();
            self.reset_pending = false;
            self.operator_shown = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
        self.route_display();
    }

    fn select_operator(&mut self, op: Operator) -> Result<(), CalculatorError> {
        if self.first_operand.is_empty() && self.display == INITIAL_DISPLAY {
            trace!(%op, "Ignoring leading operator");
            return Ok(());
        }

        match self.operator {
            Some(_) if !self.second_operand.is_empty() => {
                trace!(%op, "Resolving pending operation before chaining");
                match self.calculate() {
                    Err(CalculatorError::DivisionByZero) => {
                        return Err(CalculatorError::DivisionByZero)
                    }
                    Err(err) => debug!(error = %err, "Pending operation skipped"),
                    Ok(()) => {}
                }
                self.operator = Some(op);
                self.reset_pending = true;
                self.display = self.operator_display(op);
                self.operator_shown = true;
                self.second_operand.clear();
            }
            Some(pending) if pending != op => {
                trace!(from = %pending, to = %op, "Replacing pending operator");
                if let Some(idx) = self.display.rfind(pending.glyph()) {
                    self.display.truncate(idx);
                }
                self.display.push(op.glyph());
                self.operator = Some(op);
                self.operator_shown = true;
            }
            _ => {
                self.operator = Some(op);
                let shown = self.operator_display(op);
                if !self.operator_shown || self.display != shown {
                    self.display = shown;
                    self.operator_shown = true;
                }
                self.reset_pending = true;
            }
        }
        Ok(())
    }

    fn calculate(&mut self) -> Result<(), CalculatorError> {
        self.resolve(false)
    }

    fn percent(&mut self) -> Result<(), CalculatorError> {
        if self.operator.is_some() {
            return self.resolve(true);
        }

        let value = parse_float(&self.display);
        if value.is_nan() {
            return Err(CalculatorError::malformed_operand(self.display.clone()));
        }
        let text = format_number(value / 100.0);
        trace!(result = %text, "Applied direct percent");
        self.display = text.clone();
        self.first_operand = text;
        self.reset_pending = true;
        self.operator_shown = false;
        Ok(())
    }

    /// Resolve the pending operation into a new first operand
    ///
    /// With `percent_button` set, the pending operator becomes the base of a
    /// percentage modifier (`100 + 50%` is `150`) instead of being applied
    /// directly.
    fn resolve(&mut self, percent_button: bool) -> Result<(), CalculatorError> {
        let left = parse_float(&self.first_operand);
        let right_text = if self.second_operand.is_empty() {
            self.trailing_entry()
        } else {
            self.second_operand.clone()
        };
        let right = parse_float(&right_text);

        let effective = if percent_button {
            Some(Operator::Percent)
        } else {
            self.operator
        };
        let is_percent = effective == Some(Operator::Percent);

        if left.is_nan() || (right.is_nan() && !is_percent) {
            if self.operator.is_none() {
                self.display = if self.first_operand.is_empty() {
                    INITIAL_DISPLAY.to_string()
                } else {
                    self.first_operand.clone()
                };
            }
            let operand = if left.is_nan() {
                self.first_operand.clone()
            } else {
                right_text
            };
            return Err(CalculatorError::malformed_operand(operand));
        }

        let (Some(op), Some(effective)) = (self.operator, effective) else {
            return Ok(());
        };

        let result = match effective {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => {
                if right == 0.0 {
                    return self.divide_by_zero(left);
                }
                left / right
            }
            Operator::Percent => {
                if self.second_operand.is_empty() {
                    left / 100.0
                } else if op == Operator::Divide && right == 0.0 {
                    return self.divide_by_zero(left);
                } else {
                    percent_modifier(op, left, right)
                }
            }
        };

        let text = format_number(result);
        debug!(%op, left, right, result = %text, "Calculated");
        self.display = text.clone();
        self.first_operand = text;
        self.second_operand.clear();
        self.operator = None;
        self.reset_pending = true;
        self.operator_shown = false;
        Ok(())
    }

    fn divide_by_zero(&mut self, left: f64) -> Result<(), CalculatorError> {
        warn!(left, "Division by zero");
        self.clear();
        Err(CalculatorError::DivisionByZero)
    }

    fn backspace(&mut self) {
        if self.display.chars().count() <= 1 || self.display == INITIAL_DISPLAY {
            self.clear();
            return;
        }

        let trailing_glyph = self
            .display
            .chars()
            .last()
            .is_some_and(Operator::is_display_glyph);

        if trailing_glyph && self.operator_shown {
            trace!("Removing pending operator");
            self.display.pop();
            self.operator = None;
            self.operator_shown = false;
            if !self.display.is_empty() {
                self.first_operand = self.display.clone();
            }
        } else {
            self.display.pop();
            self.route_display();
        }

        // A lone sign or a truncated word is not an operand
        if parse_float(&self.display).is_nan() {
            trace!(display = %self.display, "Backspace left no number");
            self.clear();
        }
    }

    /// Display text with the `first + glyph` prefix removed once
    fn trailing_entry(&self) -> String {
        match self.operator {
            Some(op) => self.display.replacen(&self.operator_display(op), "", 1),
            None => self.display.clone(),
        }
    }

    fn operator_display(&self, op: Operator) -> String {
        format!("{}{}", self.first_operand, op.glyph())
    }

    fn is_showing_operator(&self) -> bool {
        self.operator_shown
            && self
                .operator
                .is_some_and(|op| self.display == self.operator_display(op))
    }

    fn route_display(&mut self) {
        if self.operator.is_none() {
            self.first_operand = self.display.clone();
        } else {
            self.second_operand = self.display.clone();
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `second` percent of `first` under the base operator
fn percent_modifier(base: Operator, first: f64, second: f64) -> f64 {
    let fraction = second / 100.0;
    match base {
        Operator::Add => first + first * fraction,
        Operator::Subtract => first - first * fraction,
        Operator::Multiply => first * fraction,
        Operator::Divide => first / fraction,
        Operator::Percent => fraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(script: &str) -> Vec<Key> {
        script
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '<' => Key::Backspace,
                'C' => Key::Clear,
                other => other.to_string().parse().unwrap(),
            })
            .collect()
    }

    fn run(script: &str) -> Calculator {
        let mut calc = Calculator::new();
        for key in keys(script) {
            let _ = calc.press(key);
        }
        calc
    }

    #[test]
    fn test_initial_state() {
        let calc = Calculator::new();
        assert_eq!(calc.display(), "0");
        assert_eq!(calc.first_operand(), "");
        assert_eq!(calc.second_operand(), "");
        assert_eq!(calc.operator(), None);
        assert!(!calc.is_reset_pending());
        assert!(!calc.is_operator_shown());
    }

    #[test]
    fn test_digits_replace_initial_zero() {
        let calc = run("0 0 4 2");
        assert_eq!(calc.display(), "42");
        assert_eq!(calc.first_operand(), "42");
    }

    #[test]
    fn test_decimal_only_once() {
        let calc = run("1 . 2 . 5");
        assert_eq!(calc.display(), "1.25");
        assert_eq!(calc.first_operand(), "1.25");
    }

    #[test]
    fn test_decimal_starts_fresh_after_operator() {
        let calc = run("5 + . 5");
        assert_eq!(calc.display(), "0.5");
        assert_eq!(calc.second_operand(), "0.5");
        assert!(!calc.is_operator_shown());
    }

    #[test]
    fn test_operator_appends_glyph() {
        let calc = run("7 x");
        assert_eq!(calc.display(), "7x");
        assert_eq!(calc.operator(), Some(Operator::Multiply));
        assert!(calc.is_operator_shown());
        assert!(calc.is_reset_pending());
    }

    #[test]
    fn test_leading_operator_ignored() {
        let calc = run("+");
        assert_eq!(calc.snapshot(), Calculator::new().snapshot());
    }

    #[test]
    fn test_operator_after_typed_zero_is_accepted() {
        let calc = run("0 +");
        assert_eq!(calc.display(), "0+");
        assert_eq!(calc.operator(), Some(Operator::Add));
    }

    #[test]
    fn test_operator_replacement() {
        let calc = run("5 + -");
        assert_eq!(calc.display(), "5-");
        assert_eq!(calc.operator(), Some(Operator::Subtract));
        assert!(calc.is_operator_shown());
    }

    #[test]
    fn test_same_operator_twice_is_stable() {
        let calc = run("5 + +");
        assert_eq!(calc.display(), "5+");
        assert_eq!(calc.operator(), Some(Operator::Add));
    }

    #[test]
    fn test_multi_digit_second_operand() {
        let calc = run("5 + 3 4");
        assert_eq!(calc.display(), "34");
        assert_eq!(calc.second_operand(), "34");
        assert_eq!(calc.first_operand(), "5");
    }

    #[test]
    fn test_basic_operations() {
        assert_eq!(run("1 2 + 3 0 =").display(), "42");
        assert_eq!(run("9 - 1 2 =").display(), "-3");
        assert_eq!(run("6 x 7 =").display(), "42");
        assert_eq!(run("1 ÷ 4 =").display(), "0.25");
    }

    #[test]
    fn test_float_artifacts_are_visible() {
        assert_eq!(run(". 1 + . 2 =").display(), "0.30000000000000004");
    }

    #[test]
    fn test_result_commits_state() {
        let calc = run("5 + 3 =");
        assert_eq!(calc.display(), "8");
        assert_eq!(calc.first_operand(), "8");
        assert_eq!(calc.second_operand(), "");
        assert_eq!(calc.operator(), None);
        assert!(calc.is_reset_pending());
        assert!(!calc.is_operator_shown());
    }

    #[test]
    fn test_digit_after_result_starts_new_number() {
        let calc = run("5 + 3 = 2");
        assert_eq!(calc.display(), "2");
        assert_eq!(calc.first_operand(), "2");
    }

    #[test]
    fn test_operator_after_result_chains() {
        let calc = run("5 + 3 = x 2 =");
        assert_eq!(calc.display(), "16");
    }

    #[test]
    fn test_chained_operation() {
        let mut calc = run("5 + 3 +");
        assert_eq!(calc.display(), "8+");
        assert_eq!(calc.first_operand(), "8");
        assert_eq!(calc.second_operand(), "");
        for key in keys("2 =") {
            calc.press(key).unwrap();
        }
        assert_eq!(calc.display(), "10");
    }

    #[test]
    fn test_equals_without_second_operand_is_noop() {
        let calc = run("5 + =");
        assert_eq!(calc.display(), "5+");
        assert_eq!(calc.operator(), Some(Operator::Add));
    }

    #[test]
    fn test_equals_on_fresh_calculator_keeps_zero() {
        let calc = run("=");
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_equals_without_operator_redisplays() {
        let calc = run("4 2 =");
        assert_eq!(calc.display(), "42");
        assert_eq!(calc.first_operand(), "42");
    }

    #[test]
    fn test_divide_by_zero_resets() {
        let mut calc = Calculator::new();
        for key in keys("5 ÷ 0") {
            calc.press(key).unwrap();
        }
        let err = calc.press(Key::Equals).unwrap_err();
        assert_eq!(err, CalculatorError::DivisionByZero);
        assert_eq!(calc.display(), "0");
        assert_eq!(calc.snapshot(), Calculator::new().snapshot());
    }

    #[test]
    fn test_divide_by_zero_while_chaining() {
        let mut calc = Calculator::new();
        for key in keys("8 ÷ 0 . 0") {
            calc.press(key).unwrap();
        }
        let err = calc.press(Key::Operator(Operator::Add)).unwrap_err();
        assert_eq!(err, CalculatorError::DivisionByZero);
        assert_eq!(calc.snapshot(), Calculator::new().snapshot());
    }

    #[test]
    fn test_direct_percent() {
        let calc = run("5 0 %");
        assert_eq!(calc.display(), "0.5");
        assert_eq!(calc.first_operand(), "0.5");
        assert!(calc.is_reset_pending());
    }

    #[test]
    fn test_percent_modifier_per_operator() {
        assert_eq!(run("1 0 0 + 5 0 %").display(), "150");
        assert_eq!(run("2 0 0 - 2 5 %").display(), "150");
        assert_eq!(run("2 0 0 x 1 0 %").display(), "20");
        assert_eq!(run("2 0 0 ÷ 5 0 %").display(), "400");
    }

    #[test]
    fn test_percent_of_zero_divisor_is_division_by_zero() {
        let mut calc = run("2 0 0 ÷ 0");
        assert_eq!(calc.press(Key::Percent), Err(CalculatorError::DivisionByZero));
        assert_eq!(calc.snapshot(), Calculator::new().snapshot());
    }

    #[test]
    fn test_percent_with_operator_but_no_second_operand() {
        let calc = run("5 + %");
        assert_eq!(calc.display(), "0.05");
        assert_eq!(calc.operator(), None);
    }

    #[test]
    fn test_percent_as_binary_operator() {
        let mut calc = run("5 0");
        calc.press(Key::Operator(Operator::Percent)).unwrap();
        assert_eq!(calc.display(), "50%");
        assert_eq!(calc.press(Key::Equals).unwrap(), "0.5");

        let mut calc = run("5 0");
        calc.press(Key::Operator(Operator::Percent)).unwrap();
        for key in keys("2 0 =") {
            calc.press(key).unwrap();
        }
        assert_eq!(calc.display(), "0.2");
    }

    #[test]
    fn test_backspace_over_operator() {
        let calc = run("7 + <");
        assert_eq!(calc.display(), "7");
        assert_eq!(calc.operator(), None);
        assert!(!calc.is_operator_shown());
        assert_eq!(calc.first_operand(), "7");
    }

    #[test]
    fn test_backspace_digits() {
        let calc = run("1 2 3 <");
        assert_eq!(calc.display(), "12");
        assert_eq!(calc.first_operand(), "12");

        let calc = run("9 + 4 5 <");
        assert_eq!(calc.display(), "4");
        assert_eq!(calc.second_operand(), "4");
        assert_eq!(calc.operator(), Some(Operator::Add));
    }

    #[test]
    fn test_backspace_single_character_clears() {
        let calc = run("8 <");
        assert_eq!(calc.snapshot(), Calculator::new().snapshot());
    }

    #[test]
    fn test_backspace_to_lone_sign_clears() {
        let calc = run("3 - 5 = <");
        assert_eq!(calc.snapshot(), Calculator::new().snapshot());
    }

    #[test]
    fn test_clear_restores_fresh_state() {
        let calc = run("1 2 + 3 4 C");
        assert_eq!(calc.snapshot(), Calculator::new().snapshot());
    }

    #[test]
    fn test_press_label() {
        let mut calc = Calculator::new();
        calc.press_label("9").unwrap();
        calc.press_label("÷").unwrap();
        calc.press_label("3").unwrap();
        assert_eq!(calc.press_label("calculate").unwrap(), "3");
        assert!(calc.press_label("sqrt").is_err());
    }

    #[test]
    fn test_press_all_stops_at_error() {
        let mut calc = Calculator::new();
        let result = calc.press_all(keys("1 ÷ 0 = 5"));
        assert_eq!(result, Err(CalculatorError::DivisionByZero));
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_percent_modifier_fallback() {
        assert_eq!(percent_modifier(Operator::Percent, 80.0, 25.0), 0.25);
        assert_eq!(percent_modifier(Operator::Add, 80.0, 25.0), 100.0);
    }
}

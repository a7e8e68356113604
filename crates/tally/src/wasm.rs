//! WebAssembly bindings for Tally
//!
//! The page keeps one [`WasmCalculator`] per keypad and forwards each button's
//! label (or its `data-action` name) to [`WasmCalculator::press`], then renders
//! the returned text.

use wasm_bindgen::prelude::*;

use crate::core::{Calculator, CalculatorError, Key};

#[wasm_bindgen]
extern "C" {
    /// Browser modal used for the divide-by-zero notice
    fn alert(message: &str);
}

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

/// A calculator session owned by JavaScript
#[wasm_bindgen]
pub struct WasmCalculator {
    inner: Calculator,
}

#[wasm_bindgen]
impl WasmCalculator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Calculator::new(),
        }
    }

    /// Press the button with this label and return the display text
    ///
    /// Throws for labels that are not keypad buttons. A division by zero
    /// raises the browser alert and returns the cleared display.
    pub fn press(&mut self, label: &str) -> Result<String, JsValue> {
        let key: Key = label
            .parse()
            .map_err(|e: CalculatorError| JsValue::from_str(&e.to_string()))?;

        match self.inner.press(key) {
            Ok(display) => Ok(display.to_string()),
            Err(err) => {
                alert(&err.to_string());
                Ok(self.inner.display().to_string())
            }
        }
    }

    pub fn display(&self) -> String {
        self.inner.display().to_string()
    }

    pub fn clear(&mut self) -> String {
        self.inner.clear();
        self.display()
    }

    /// JSON snapshot of the whole session state
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> String {
        let state = self.inner.snapshot();
        serde_json::json!({
            "display": state.display,
            "first_operand": state.first_operand,
            "second_operand": state.second_operand,
            "operator": state.operator.map(|op| op.glyph().to_string()),
            "reset_pending": state.reset_pending,
            "operator_shown": state.operator_shown,
        })
        .to_string()
    }
}

impl Default for WasmCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a whole key script and return the final display
///
/// Throws on an invalid script or a division by zero.
#[wasm_bindgen(js_name = evaluateScript)]
pub fn evaluate_script(script: &str) -> Result<String, JsValue> {
    crate::evaluate(script).map_err(|e| JsValue::from_str(&e.to_string()))
}

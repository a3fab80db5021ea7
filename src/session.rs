use crate::calculator::Calculator;
use crate::canonical::canonicalize;
use crate::config::Config;
use crate::error::{Error, Result, ERROR_DISPLAY};
use crate::format::NumberFormat;
use crate::history::{History, HistoryEntry};
use crate::mode::{AngleMode, CalculatorMode};
use log::{debug, warn};

/// State shared by every calculator mode for the lifetime of the process:
/// the display, registers, history and preferences.
#[derive(Debug, Clone)]
pub struct Session {
    display: String,
    memory: f64,
    last_result: String,
    mode: CalculatorMode,
    dark_mode: bool,
    history: History,
    calculator: Calculator,
    format: NumberFormat,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            display: "0".to_string(),
            memory: 0.0,
            last_result: "0".to_string(),
            mode: config.start_mode,
            dark_mode: config.dark_mode,
            history: History::new(config.history_limit),
            calculator: Calculator::new(),
            format: config.number_format(),
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn set_display(&mut self, text: impl Into<String>) {
        self.display = text.into();
    }

    pub fn show_error(&mut self) {
        self.display = ERROR_DISPLAY.to_string();
    }

    pub fn is_error(&self) -> bool {
        self.display == ERROR_DISPLAY
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn last_result(&self) -> &str {
        &self.last_result
    }

    pub fn mode(&self) -> CalculatorMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: CalculatorMode) {
        self.mode = mode;
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Copy a history result into the display. Returns the entry if it exists.
    pub fn select_history(&mut self, id: u64) -> Option<&HistoryEntry> {
        let result = self.history.select(id)?.result.clone();
        self.display = result;
        self.history.select(id)
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn number_format(&self) -> NumberFormat {
        self.format
    }

    pub fn format(&self, value: f64) -> String {
        self.format.format(value)
    }

    /// Display text with group separators removed, ready to splice into an expression.
    pub fn operand_text(&self) -> String {
        self.format.strip(&self.display)
    }

    pub fn numeric_display(&self) -> Result<f64> {
        self.format
            .parse(&self.display)
            .ok_or_else(|| Error::InvalidNumericInput(self.display.clone()))
    }

    /// Canonicalize and evaluate `expression`, then publish the outcome to the
    /// display, the last-result register and the history. Failures show
    /// "Error" and are recorded too.
    pub fn calculate(&mut self, expression: &str, angle: AngleMode) -> Result<f64> {
        let expression = expression.trim();
        let outcome =
            canonicalize(expression, angle).and_then(|canonical| self.calculator.evaluate(&canonical));

        let result = match &outcome {
            Ok(value) => self.format.format(*value),
            Err(err) => {
                warn!("Evaluation of {:?} failed: {}", expression, err);
                ERROR_DISPLAY.to_string()
            }
        };

        self.history.record(expression, result.clone(), self.mode);
        self.last_result = result.clone();
        self.display = result;
        outcome
    }

    pub fn recall_last_result(&mut self) {
        self.display = self.last_result.clone();
    }

    /// Non-numeric display text counts as 0.
    pub fn memory_add(&mut self) {
        self.memory += self.display_or_zero();
    }

    /// Non-numeric display text counts as 0.
    pub fn memory_subtract(&mut self) {
        self.memory -= self.display_or_zero();
    }

    /// Shows the register exactly, without rounding to the result precision.
    pub fn memory_recall(&mut self) {
        self.display = if self.memory == 0.0 {
            "0".to_string()
        } else {
            self.memory.to_string()
        };
    }

    pub fn memory_clear(&mut self) {
        self.memory = 0.0;
    }

    pub fn clear_display(&mut self) {
        self.display = "0".to_string();
    }

    /// Display back to "0" and memory zeroed.
    pub fn clear_all(&mut self) {
        self.clear_display();
        self.memory_clear();
    }

    fn display_or_zero(&self) -> f64 {
        match self.numeric_display() {
            Ok(value) => value,
            Err(err) => {
                debug!("{}; memory register uses 0", err);
                0.0
            }
        }
    }
}

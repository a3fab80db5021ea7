use super::{Constant, Operator, UnaryOp};
use crate::mode::AngleMode;
use crate::session::Session;
use log::{debug, warn};

/// Where the operand slot stands between key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Entry {
    /// Nothing typed yet; the next digit starts a new operand.
    #[default]
    Idle,
    /// Digits are being appended to the display.
    Accumulating,
    /// The display holds a finished operand (function, constant, result)
    /// that has not been committed to the buffer.
    Complete,
    /// The display was committed together with an operator.
    AfterOperator,
    /// The display was consumed by a closing parenthesis.
    AfterClose,
}

impl Entry {
    /// The next digit replaces the display instead of extending it.
    pub fn waiting_for_operand(self) -> bool {
        matches!(
            self,
            Entry::Complete | Entry::AfterOperator | Entry::AfterClose
        )
    }
}

/// Mode-local expression under construction. Discarded on a mode switch.
#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    pub(super) buffer: String,
    pub(super) entry: Entry,
    pub(super) open_parens: u32,
    pub(super) inverse: bool,
    pub(super) angle: AngleMode,
}

impl Pending {
    pub fn new(angle: AngleMode) -> Self {
        Self {
            buffer: String::new(),
            entry: Entry::Idle,
            open_parens: 0,
            inverse: false,
            angle,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn entry(&self) -> Entry {
        self.entry
    }

    pub fn waiting_for_operand(&self) -> bool {
        self.entry.waiting_for_operand()
    }

    pub fn open_parens(&self) -> u32 {
        self.open_parens
    }

    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    pub fn angle(&self) -> AngleMode {
        self.angle
    }

    /// Human-readable text of the pending expression including the operand being typed.
    pub fn expression(&self, session: &Session) -> String {
        match self.entry {
            Entry::Accumulating | Entry::Complete => {
                format!("{}{}", self.buffer, session.display())
            }
            _ => self.buffer.clone(),
        }
    }

    /// Digit or decimal point. A second point, or a point in the exponent,
    /// is rejected and a lone "0" is replaced.
    pub fn input_digit(&mut self, session: &mut Session, digit: char) {
        if session.is_error() || self.entry != Entry::Accumulating {
            let text = if digit == '.' { "0.".to_string() } else { digit.to_string() };
            session.set_display(text);
            self.entry = Entry::Accumulating;
            return;
        }

        let display = session.display();
        let next = if digit == '.' {
            if display.contains('.') || display.contains('e') {
                debug!("Ignoring decimal point in {:?}", display);
                return;
            }
            format!("{}.", display)
        } else if display == "0" {
            digit.to_string()
        } else {
            format!("{}{}", display, digit)
        };
        session.set_display(next);
    }

    pub fn input_constant(&mut self, session: &mut Session, constant: Constant) {
        let symbol = constant.symbol();
        if session.is_error() || self.entry != Entry::Accumulating || session.display() == "0" {
            session.set_display(symbol);
        } else {
            let appended = format!("{}{}", session.display(), symbol);
            session.set_display(appended);
        }
        self.entry = Entry::Complete;
    }

    /// `EXP`: append an exponent marker to the number being typed.
    pub fn input_exponent(&mut self, session: &mut Session) {
        if self.entry != Entry::Accumulating || session.display().contains('e') {
            debug!("Exponent key ignored in {:?}", self.entry);
            return;
        }
        let text = format!("{}e", session.display());
        session.set_display(text);
    }

    pub fn toggle_inverse(&mut self) {
        self.inverse = !self.inverse;
    }

    pub fn toggle_angle(&mut self) {
        self.angle = self.angle.toggled();
    }

    /// `C`: display and buffer reset, flags and memory kept.
    pub fn clear(&mut self, session: &mut Session) {
        session.clear_display();
        self.reset_expression();
    }

    /// `AC`: also zeroes memory and drops the inverse flag. Angle mode stays.
    pub fn clear_all(&mut self, session: &mut Session) {
        session.clear_all();
        self.reset_expression();
        self.inverse = false;
    }

    /// The display now holds a value that was recalled rather than typed.
    pub fn mark_complete(&mut self) {
        self.entry = Entry::Complete;
    }

    pub fn apply_unary(&mut self, session: &mut Session, op: UnaryOp) {
        let value = match session.numeric_display() {
            Ok(value) => value,
            Err(err) => {
                warn!("{:?} failed: {}", op, err);
                session.show_error();
                self.entry = Entry::Complete;
                return;
            }
        };

        let result = match op {
            UnaryOp::Negate => {
                let display = session.display();
                let toggled = if value == 0.0 {
                    display.to_string()
                } else if let Some(positive) = display.strip_prefix('-') {
                    positive.to_string()
                } else {
                    format!("-{}", display)
                };
                session.set_display(toggled);
                return;
            }
            UnaryOp::Percent => value / 100.0,
            UnaryOp::Reciprocal => 1.0 / value,
            UnaryOp::Abs => value.abs(),
        };

        // format() turns a non-finite value into "Error"
        let text = session.format(result);
        session.set_display(text);
        self.entry = Entry::Complete;
    }

    /// The operand that the next commit appends to the buffer.
    pub(super) fn operand(&self, session: &Session) -> String {
        match self.entry {
            Entry::AfterClose => String::new(),
            _ => session.operand_text(),
        }
    }

    pub(super) fn strip_trailing_operator(&mut self) {
        let trimmed = self.buffer.trim_end();
        for op in Operator::ALL {
            if let Some(rest) = trimmed.strip_suffix(op.symbol()) {
                self.buffer = rest.trim_end().to_string();
                return;
            }
        }
    }

    /// Remove the parenthesised group that ends the buffer and return it.
    pub(super) fn take_trailing_group(&mut self) -> Option<String> {
        if !self.buffer.ends_with(')') {
            return None;
        }
        let mut depth = 0usize;
        let mut start = None;
        for (idx, c) in self.buffer.char_indices().rev() {
            match c {
                ')' => depth += 1,
                '(' => {
                    depth -= 1;
                    if depth == 0 {
                        start = Some(idx);
                        break;
                    }
                }
                _ => {}
            }
        }
        start.map(|idx| self.buffer.split_off(idx))
    }

    fn reset_expression(&mut self) {
        self.buffer.clear();
        self.open_parens = 0;
        self.entry = Entry::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_digits(pending: &mut Pending, session: &mut Session, digits: &str) {
        for d in digits.chars() {
            pending.input_digit(session, d);
        }
    }

    #[test]
    fn test_digits_concatenate() {
        let mut session = Session::default();
        let mut pending = Pending::new(AngleMode::Deg);
        type_digits(&mut pending, &mut session, "123");
        assert_eq!(session.display(), "123");
        assert_eq!(pending.entry(), Entry::Accumulating);
    }

    #[test]
    fn test_leading_zero_and_decimal() {
        let mut session = Session::default();
        let mut pending = Pending::new(AngleMode::Deg);
        type_digits(&mut pending, &mut session, "007");
        assert_eq!(session.display(), "7");

        pending.clear(&mut session);
        type_digits(&mut pending, &mut session, "0.5.2");
        assert_eq!(session.display(), "0.52");

        pending.clear(&mut session);
        type_digits(&mut pending, &mut session, ".");
        assert_eq!(session.display(), "0.");
    }

    #[test]
    fn test_waiting_digit_replaces_display() {
        let mut session = Session::default();
        let mut pending = Pending::new(AngleMode::Deg);
        session.set_display("42");
        pending.mark_complete();
        assert!(pending.waiting_for_operand());

        pending.input_digit(&mut session, '9');
        assert_eq!(session.display(), "9");
        assert!(!pending.waiting_for_operand());
    }

    #[test]
    fn test_digit_clears_error() {
        let mut session = Session::default();
        let mut pending = Pending::new(AngleMode::Deg);
        pending.input_digit(&mut session, '4');
        session.show_error();
        pending.input_digit(&mut session, '2');
        assert_eq!(session.display(), "2");
    }

    #[test]
    fn test_constants() {
        let mut session = Session::default();
        let mut pending = Pending::new(AngleMode::Deg);
        pending.input_constant(&mut session, Constant::Pi);
        assert_eq!(session.display(), "π");

        pending.clear(&mut session);
        pending.input_digit(&mut session, '2');
        pending.input_constant(&mut session, Constant::Pi);
        assert_eq!(session.display(), "2π");
        assert_eq!(pending.entry(), Entry::Complete);
    }

    #[test]
    fn test_exponent_marker() {
        let mut session = Session::default();
        let mut pending = Pending::new(AngleMode::Deg);
        type_digits(&mut pending, &mut session, "1.5");
        pending.input_exponent(&mut session);
        pending.input_exponent(&mut session);
        type_digits(&mut pending, &mut session, "3");
        assert_eq!(session.display(), "1.5e3");

        pending.clear(&mut session);
        type_digits(&mut pending, &mut session, "2");
        pending.input_exponent(&mut session);
        type_digits(&mut pending, &mut session, ".4.");
        assert_eq!(session.display(), "2e4");
    }

    #[test]
    fn test_unary_ops() {
        let mut session = Session::default();
        let mut pending = Pending::new(AngleMode::Deg);
        type_digits(&mut pending, &mut session, "50");
        pending.apply_unary(&mut session, UnaryOp::Percent);
        assert_eq!(session.display(), "0.5");

        pending.apply_unary(&mut session, UnaryOp::Reciprocal);
        assert_eq!(session.display(), "2");

        pending.apply_unary(&mut session, UnaryOp::Negate);
        assert_eq!(session.display(), "-2");
        pending.apply_unary(&mut session, UnaryOp::Abs);
        assert_eq!(session.display(), "2");
    }

    #[test]
    fn test_unary_errors() {
        let mut session = Session::default();
        let mut pending = Pending::new(AngleMode::Deg);
        pending.input_digit(&mut session, '0');
        pending.apply_unary(&mut session, UnaryOp::Reciprocal);
        assert_eq!(session.display(), "Error");

        pending.clear(&mut session);
        session.set_display("sin(30)");
        pending.apply_unary(&mut session, UnaryOp::Percent);
        assert_eq!(session.display(), "Error");

        pending.apply_unary(&mut session, UnaryOp::Negate);
        assert_eq!(session.display(), "Error");
    }

    #[test]
    fn test_negate_zero_and_in_progress() {
        let mut session = Session::default();
        let mut pending = Pending::new(AngleMode::Deg);
        pending.apply_unary(&mut session, UnaryOp::Negate);
        assert_eq!(session.display(), "0");

        type_digits(&mut pending, &mut session, "12.");
        pending.apply_unary(&mut session, UnaryOp::Negate);
        assert_eq!(session.display(), "-12.");
        type_digits(&mut pending, &mut session, "5");
        assert_eq!(session.display(), "-12.5");
    }

    #[test]
    fn test_clear_keeps_flags_and_all_clear_drops_inverse() {
        let mut session = Session::default();
        let mut pending = Pending::new(AngleMode::Deg);
        pending.toggle_inverse();
        pending.toggle_angle();
        session.set_display("7");
        session.memory_add();

        pending.clear(&mut session);
        assert!(pending.is_inverse());
        assert_eq!(pending.angle(), AngleMode::Rad);
        assert_eq!(session.memory(), 7.0);

        pending.clear_all(&mut session);
        assert!(!pending.is_inverse());
        assert_eq!(pending.angle(), AngleMode::Rad);
        assert_eq!(session.memory(), 0.0);
        assert_eq!(session.display(), "0");
    }

    #[test]
    fn test_take_trailing_group() {
        let mut pending = Pending::new(AngleMode::Deg);
        pending.buffer = "2 * (3 + (4 - 1))".to_string();
        assert_eq!(pending.take_trailing_group().as_deref(), Some("(3 + (4 - 1))"));
        assert_eq!(pending.buffer(), "2 * ");

        pending.buffer = "sin⁻¹(1) + 2".to_string();
        assert_eq!(pending.take_trailing_group(), None);
    }

    #[test]
    fn test_strip_trailing_operator() {
        let mut pending = Pending::new(AngleMode::Deg);
        pending.buffer = "5 mod ".to_string();
        pending.strip_trailing_operator();
        assert_eq!(pending.buffer(), "5");

        pending.buffer = "12+".to_string();
        pending.strip_trailing_operator();
        assert_eq!(pending.buffer(), "12");
    }
}

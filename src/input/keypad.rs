use super::state::{Entry, Pending};
use super::{Function, Key, Operator};
use crate::mode::{AngleMode, CalculatorMode};
use crate::session::Session;
use log::debug;

/// Which button set a keypad offers.
///
/// The standard layout evaluates the running total each time an operator is
/// pressed and writes operators without spacing (`12+3`). The scientific
/// layout defers everything to "=" and keeps spaces around operators
/// (`12 + sin(30)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Standard,
    Scientific,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keypad {
    layout: Layout,
    pending: Pending,
}

impl Keypad {
    pub fn new(layout: Layout, angle: AngleMode) -> Self {
        Self {
            layout,
            pending: Pending::new(angle),
        }
    }

    /// Keypad for a calculator mode; `None` for modes driven by forms instead of buttons.
    pub fn for_mode(mode: CalculatorMode, angle: AngleMode) -> Option<Self> {
        match mode {
            CalculatorMode::Standard => Some(Self::new(Layout::Standard, angle)),
            CalculatorMode::Scientific => Some(Self::new(Layout::Scientific, angle)),
            _ => None,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn pending(&self) -> &Pending {
        &self.pending
    }

    pub fn expression(&self, session: &Session) -> String {
        self.pending.expression(session)
    }

    pub fn mark_complete(&mut self) {
        self.pending.mark_complete();
    }

    pub fn press(&mut self, session: &mut Session, key: Key) {
        if self.layout == Layout::Standard && !key.on_standard_keypad() {
            debug!("{:?} is not on the standard keypad", key);
            return;
        }

        match key {
            Key::Digit(d) => self.pending.input_digit(session, d),
            Key::Decimal => self.pending.input_digit(session, '.'),
            Key::Operator(op) => match self.layout {
                Layout::Standard => self.standard_operator(session, op),
                Layout::Scientific => self.scientific_operator(session, op),
            },
            Key::Equals => match self.layout {
                Layout::Standard => self.standard_equals(session),
                Layout::Scientific => self.scientific_equals(session),
            },
            Key::OpenParen => self.open_paren(session),
            Key::CloseParen => self.close_paren(session),
            Key::Function(function) => self.function(session, function),
            Key::Factorial => self.factorial(session),
            Key::Constant(constant) => self.pending.input_constant(session, constant),
            Key::Square => self.immediate(session, |arg| format!("({})^2", arg)),
            Key::SquareRoot => self.immediate(session, |arg| format!("√({})", arg)),
            Key::Unary(op) => self.pending.apply_unary(session, op),
            Key::Exponent => self.pending.input_exponent(session),
            Key::ToggleInverse => self.pending.toggle_inverse(),
            Key::ToggleAngle => self.pending.toggle_angle(),
            Key::Clear => self.pending.clear(session),
            Key::AllClear => self.pending.clear_all(session),
            Key::MemoryAdd => session.memory_add(),
            Key::MemorySubtract => session.memory_subtract(),
            Key::MemoryClear => session.memory_clear(),
            Key::MemoryRecall => {
                session.memory_recall();
                self.pending.mark_complete();
            }
            Key::Ans => {
                session.recall_last_result();
                self.pending.mark_complete();
            }
        }
    }

    fn standard_operator(&mut self, session: &mut Session, op: Operator) {
        if session.is_error() {
            debug!("Operator {} ignored while the display shows an error", op.symbol());
            return;
        }
        let pending = &mut self.pending;

        if pending.entry == Entry::AfterOperator && !pending.buffer.is_empty() {
            pending.strip_trailing_operator();
            pending.buffer.push_str(op.symbol());
            return;
        }

        let operand = session.operand_text();
        if pending.buffer.is_empty() {
            pending.buffer = format!("{}{}", operand, op.symbol());
        } else {
            let expression = format!("{}{}", pending.buffer, operand);
            if session.calculate(&expression, AngleMode::Rad).is_err() {
                pending.buffer.clear();
                pending.entry = Entry::Complete;
                return;
            }
            pending.buffer = format!("{}{}", session.operand_text(), op.symbol());
        }
        pending.entry = Entry::AfterOperator;
    }

    fn standard_equals(&mut self, session: &mut Session) {
        if session.is_error() || self.pending.buffer.is_empty() {
            debug!("Nothing to evaluate on the standard keypad");
            return;
        }
        let expression = format!("{}{}", self.pending.buffer, session.operand_text());
        let _ = session.calculate(&expression, AngleMode::Rad);
        self.pending.buffer.clear();
        self.pending.entry = Entry::Complete;
    }

    fn scientific_operator(&mut self, session: &mut Session, op: Operator) {
        if session.is_error() {
            debug!("Operator {} ignored while the display shows an error", op.symbol());
            return;
        }
        let pending = &mut self.pending;

        match pending.entry {
            Entry::AfterOperator => pending.strip_trailing_operator(),
            Entry::AfterClose => {}
            _ => {
                let operand = pending.operand(session);
                pending.buffer.push_str(&operand);
            }
        }
        pending.buffer.push_str(&format!(" {} ", op.symbol()));
        pending.entry = Entry::AfterOperator;
    }

    fn scientific_equals(&mut self, session: &mut Session) {
        if session.is_error() {
            debug!("Equals ignored while the display shows an error");
            return;
        }
        let pending = &mut self.pending;

        let expression = format!("{}{}", pending.buffer, pending.operand(session));
        let _ = session.calculate(&expression, pending.angle);
        pending.buffer.clear();
        pending.open_parens = 0;
        pending.entry = Entry::Complete;
    }

    /// A typed or finished operand right before "(" multiplies the group.
    fn open_paren(&mut self, session: &mut Session) {
        if session.is_error() {
            debug!("Open parenthesis ignored while the display shows an error");
            return;
        }
        let pending = &mut self.pending;

        match pending.entry {
            Entry::Accumulating | Entry::Complete => {
                let operand = pending.operand(session);
                pending.buffer.push_str(&operand);
                pending.buffer.push_str(" * (");
            }
            Entry::AfterClose => pending.buffer.push_str(" * ("),
            Entry::Idle | Entry::AfterOperator => pending.buffer.push('('),
        }
        pending.open_parens += 1;
        session.clear_display();
        pending.entry = Entry::Idle;
    }

    /// No-op when no parenthesis is open.
    fn close_paren(&mut self, session: &mut Session) {
        if self.pending.open_parens == 0 {
            debug!("Close parenthesis ignored, nothing is open");
            return;
        }
        if session.is_error() {
            debug!("Close parenthesis ignored while the display shows an error");
            return;
        }
        let pending = &mut self.pending;

        let operand = pending.operand(session);
        pending.buffer.push_str(&operand);
        pending.buffer.push(')');
        pending.open_parens -= 1;
        pending.entry = Entry::AfterClose;
    }

    /// The argument of a function key: the group just closed, or the display.
    fn argument(&mut self, session: &Session) -> String {
        if self.pending.entry == Entry::AfterClose {
            if let Some(group) = self.pending.take_trailing_group() {
                return group;
            }
        }
        session.operand_text()
    }

    fn function(&mut self, session: &mut Session, function: Function) {
        if session.is_error() {
            debug!("{:?} ignored while the display shows an error", function);
            return;
        }
        let name = function.label(self.pending.inverse);
        let arg = self.argument(session);
        session.set_display(format!("{}({})", name, arg));
        self.pending.inverse = false;
        self.pending.entry = Entry::Complete;
    }

    fn factorial(&mut self, session: &mut Session) {
        if session.is_error() {
            debug!("Factorial ignored while the display shows an error");
            return;
        }
        let arg = self.argument(session);
        session.set_display(format!("{}!", arg));
        self.pending.entry = Entry::Complete;
    }

    /// `x²` and `√` evaluate right away and land in the history.
    fn immediate(&mut self, session: &mut Session, wrap: impl Fn(&str) -> String) {
        if session.is_error() {
            debug!("Immediate function ignored while the display shows an error");
            return;
        }
        let arg = self.argument(session);
        let _ = session.calculate(&wrap(&arg), self.pending.angle);
        self.pending.entry = Entry::Complete;
    }
}

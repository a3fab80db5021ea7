use crate::config::Config;
use crate::history::HistoryEntry;
use crate::input::{Key, Keypad};
use crate::mode::{AngleMode, CalculatorMode};
use crate::session::Session;
use log::{debug, info};

/// Top-level calculator: the shared session plus the active mode's keypad.
#[derive(Debug, Clone)]
pub struct AppState {
    session: Session,
    keypad: Option<Keypad>,
    default_angle: AngleMode,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let session = Session::new(config);
        let keypad = Keypad::for_mode(session.mode(), config.angle_mode);
        Self {
            session,
            keypad,
            default_angle: config.angle_mode,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn keypad(&self) -> Option<&Keypad> {
        self.keypad.as_ref()
    }

    pub fn mode(&self) -> CalculatorMode {
        self.session.mode()
    }

    /// Switch modes. The pending expression of the old mode is discarded;
    /// display, memory and history carry over.
    pub fn set_mode(&mut self, mode: CalculatorMode) {
        info!("Switching to {} mode", mode);
        self.session.set_mode(mode);
        self.keypad = Keypad::for_mode(mode, self.default_angle);
    }

    pub fn press(&mut self, key: Key) {
        match self.keypad.as_mut() {
            Some(keypad) => keypad.press(&mut self.session, key),
            None => debug!("{:?} ignored, {} mode has no keypad", key, self.session.mode()),
        }
    }

    pub fn press_all(&mut self, keys: impl IntoIterator<Item = Key>) {
        for key in keys {
            self.press(key);
        }
    }

    pub fn display(&self) -> &str {
        self.session.display()
    }

    /// Pending expression as shown above the display.
    pub fn expression(&self) -> String {
        match &self.keypad {
            Some(keypad) => keypad.expression(&self.session),
            None => String::new(),
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.session.history().iter()
    }

    /// Put a history result on the display; the next digit starts a new operand.
    pub fn select_history(&mut self, id: u64) -> bool {
        if self.session.select_history(id).is_none() {
            debug!("No history entry {}", id);
            return false;
        }
        if let Some(keypad) = self.keypad.as_mut() {
            keypad.mark_complete();
        }
        true
    }

    pub fn clear_history(&mut self) {
        self.session.clear_history();
    }

    pub fn toggle_dark_mode(&mut self) {
        self.session.toggle_dark_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_keys;

    fn app_with(script: &str) -> AppState {
        let mut app = AppState::default();
        app.press_all(parse_keys(script).unwrap());
        app
    }

    #[test]
    fn test_mode_switch_resets_pending_only() {
        let mut app = AppState::default();
        app.set_mode(CalculatorMode::Scientific);
        app.press_all(parse_keys("rad 2nd 4 M+ C ( 2 +").unwrap());
        assert_eq!(app.expression(), "(2 + ");

        app.set_mode(CalculatorMode::Standard);
        app.set_mode(CalculatorMode::Scientific);
        let pending = app.keypad().unwrap().pending();
        assert_eq!(pending.buffer(), "");
        assert_eq!(pending.open_parens(), 0);
        assert!(!pending.is_inverse());
        assert_eq!(pending.angle(), AngleMode::Deg);
        assert_eq!(app.session().memory(), 4.0);
        assert_eq!(app.display(), "2");
    }

    #[test]
    fn test_form_modes_ignore_keys() {
        let mut app = AppState::default();
        app.set_mode(CalculatorMode::Conversion);
        app.press_all(parse_keys("7 + 1 =").unwrap());
        assert_eq!(app.display(), "0");
        assert_eq!(app.expression(), "");
        assert!(app.keypad().is_none());
    }

    #[test]
    fn test_select_history_recalls_result() {
        let mut app = app_with("2 + 3 = 9 * 9 =");
        let first = app.history().last().unwrap().id;
        assert!(app.select_history(first));
        assert_eq!(app.display(), "5");

        app.press_all(parse_keys("1").unwrap());
        assert_eq!(app.display(), "1");
        assert!(!app.select_history(first + 50));
    }

    #[test]
    fn test_history_entries_carry_mode() {
        let mut app = app_with("1 + 1 =");
        app.set_mode(CalculatorMode::Scientific);
        app.press_all(parse_keys("2 * 2 =").unwrap());

        let modes: Vec<CalculatorMode> = app.history().map(|e| e.mode).collect();
        assert_eq!(modes, vec![CalculatorMode::Scientific, CalculatorMode::Standard]);

        app.clear_history();
        assert_eq!(app.history().count(), 0);
    }

    #[test]
    fn test_start_mode_from_config() {
        let config = Config {
            start_mode: CalculatorMode::Scientific,
            angle_mode: AngleMode::Rad,
            ..Config::default()
        };
        let app = AppState::new(&config);
        assert_eq!(app.mode(), CalculatorMode::Scientific);
        assert_eq!(app.keypad().unwrap().pending().angle(), AngleMode::Rad);
    }
}

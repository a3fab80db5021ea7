//! Core of a multi-mode calculator.
//!
//! Button presses go through [`input::Keypad`] into a pending expression,
//! which [`canonical::canonicalize`] rewrites into plain evaluator syntax and
//! [`calculator::Calculator`] evaluates. Results land on the shared
//! [`session::Session`] display and in its bounded [`history::History`].
//! [`app::AppState`] ties the session to the active mode.
//!
//! ```
//! use calcsuite::app::AppState;
//! use calcsuite::input::parse_keys;
//!
//! let mut app = AppState::default();
//! app.press_all(parse_keys("12 + 3 * 2 =").unwrap());
//! assert_eq!(app.display(), "30");
//! ```

pub mod app;
pub mod calculator;
pub mod canonical;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod financial;
pub mod format;
pub mod graph;
pub mod history;
pub mod input;
pub mod mode;
pub mod session;

pub use error::{Error, Result};

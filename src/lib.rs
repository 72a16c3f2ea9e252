//! Keypad calculator core.
//!
//! Token events from any front end go into a [`calculator::Session`], which
//! keeps the expression buffer, validates and evaluates it on demand, and
//! reports a [`calculator::DisplayState`] after every event.

pub mod calculator;
pub mod config;
pub mod logging;
pub mod repl;

pub use calculator::{CalcError, DisplayState, Session, Token};
pub use config::{Config, ConfigError};

//! One interactive calculator session.
//!
//! A [`Session`] owns the expression buffer and the transient error. Token
//! events are applied one at a time, each returning the new display.

use super::buffer::ExpressionBuffer;
use super::display::{DEFAULT_ERROR_MESSAGE, DisplayState};
use super::error::CalcError;
use super::evaluation::{EvaluationOutcome, Evaluator};
use super::token::Token;
use tracing::debug;

/// Where a session is in its input cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing typed yet, or just cleared.
    Empty,
    /// The user is composing an expression.
    Building,
    /// The buffer holds the result of the last evaluation.
    Evaluated,
    /// The last evaluation failed; the buffer is kept as typed.
    ErrorShown,
}

#[derive(Clone, Debug)]
pub struct Session {
    buffer: ExpressionBuffer,
    error: Option<CalcError>,
    phase: Phase,
    evaluator: Evaluator,
    error_message: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_evaluator(Evaluator::default(), DEFAULT_ERROR_MESSAGE)
    }

    /// Create a session with a custom evaluator and error message.
    pub fn with_evaluator(evaluator: Evaluator, error_message: impl Into<String>) -> Self {
        Self {
            buffer: ExpressionBuffer::new(),
            error: None,
            phase: Phase::Empty,
            evaluator,
            error_message: error_message.into(),
        }
    }

    pub fn buffer(&self) -> &str {
        self.buffer.as_str()
    }

    /// The diagnostic kind of the active error, if one is shown.
    pub fn error(&self) -> Option<&CalcError> {
        self.error.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn display(&self) -> DisplayState {
        match self.error {
            Some(_) => DisplayState::error(&self.error_message),
            None => DisplayState::from_buffer(self.buffer.as_str()),
        }
    }

    /// Apply one token and return the resulting display.
    pub fn submit_token(&mut self, token: Token) -> DisplayState {
        match token {
            Token::Clear => self.clear(),
            Token::Backspace => {
                self.buffer.backspace();
                self.error = None;
                self.phase = if self.buffer.is_empty() {
                    Phase::Empty
                } else {
                    Phase::Building
                };
            }
            Token::Evaluate => {
                self.evaluate();
            }
            _ if token.is_insertion() && self.buffer.accept(token) => {
                self.error = None;
                self.phase = Phase::Building;
            }
            _ => {
                debug!(%token, buffer = self.buffer.as_str(), "token rejected");
            }
        }
        self.display()
    }

    /// Apply a sequence of tokens, returning the display after the last one.
    pub fn submit_all(&mut self, tokens: impl IntoIterator<Item = Token>) -> DisplayState {
        for token in tokens {
            self.submit_token(token);
        }
        self.display()
    }

    /// Equivalent to submitting `Clear`.
    pub fn reset(&mut self) -> DisplayState {
        self.clear();
        self.display()
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.error = None;
        self.phase = Phase::Empty;
    }

    /// Evaluate the current buffer.
    ///
    /// Returns `None` without touching any state when the buffer is empty.
    pub fn evaluate(&mut self) -> Option<EvaluationOutcome> {
        if self.buffer.is_empty() {
            return None;
        }

        let outcome = self.evaluator.calculate(self.buffer.as_str());
        match &outcome {
            EvaluationOutcome::Value(value) => {
                debug!(expression = self.buffer.as_str(), result = %value, "evaluated");
                self.buffer.replace_with_result(value.clone());
                self.error = None;
                self.phase = Phase::Evaluated;
            }
            EvaluationOutcome::Error(err) => {
                let stage = if err.is_syntactic() {
                    "validation"
                } else {
                    "evaluation"
                };
                debug!(
                    expression = self.buffer.as_str(),
                    stage,
                    kind = err.kind(),
                    %err,
                    "evaluation failed"
                );
                self.error = Some(err.clone());
                self.phase = Phase::ErrorShown;
            }
        }
        Some(outcome)
    }
}

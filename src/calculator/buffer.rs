//! The in-progress expression text and its insertion rules.
//!
//! Insertion is deliberately lenient: only three guards run here (decimal,
//! percent and leading zero). Operator adjacency is left to the validator,
//! which runs when the expression is evaluated.

use super::token::Token;
use tracing::trace;

fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/')
}

/// Textual expression built up from accepted tokens.
///
/// Only characters from `0-9 + - * / % . ( )` ever enter the buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpressionBuffer {
    text: String,
}

impl ExpressionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// The numeric run being typed: everything after the last `+ - * /`.
    pub fn trailing_run(&self) -> &str {
        self.text.rsplit(is_operator_char).next().unwrap_or("")
    }

    /// Offer a token to the buffer.
    ///
    /// Returns `true` when the token was accepted. Rejected insertions leave the
    /// buffer untouched. `Clear` and `Backspace` are always accepted;
    /// `Evaluate` is not a buffer operation and returns `false`.
    pub fn accept(&mut self, token: Token) -> bool {
        match token {
            Token::Clear => {
                self.clear();
                true
            }
            Token::Backspace => {
                self.backspace();
                true
            }
            Token::Evaluate => false,
            _ => match token.as_char() {
                Some(c) if self.allows(c) => {
                    self.text.push(c);
                    true
                }
                Some(c) => {
                    trace!(rejected = %c, buffer = %self.text, "insertion guard");
                    false
                }
                None => false,
            },
        }
    }

    /// Apply the insertion guards for one character.
    fn allows(&self, c: char) -> bool {
        match c {
            '.' => !self.trailing_run().contains('.'),
            '%' => !self.text.contains('%'),
            '0' => self.text != "0",
            _ => true,
        }
    }

    /// Drop the last character. Returns the removed character, if any.
    pub fn backspace(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Replace the whole buffer with an evaluation result.
    pub(crate) fn replace_with_result(&mut self, result: String) {
        debug_assert!(
            result
                .chars()
                .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
        );
        self.text = result;
    }
}

impl AsRef<str> for ExpressionBuffer {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

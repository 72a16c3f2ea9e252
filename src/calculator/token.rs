//! Input tokens and the key mapping that produces them.

use std::fmt;

/// A binary arithmetic operator key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn as_char(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Paren {
    Open,
    Close,
}

/// One discrete input event (a button or key press).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// A digit key, always in `0..=9`.
    Digit(u8),
    Operator(Operator),
    Percent,
    Decimal,
    Paren(Paren),
    Clear,
    Backspace,
    Evaluate,
}

impl Token {
    /// Build a digit token, or `None` if `value` is not a single decimal digit.
    pub fn digit(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self::Digit(value))
    }

    /// The literal character this token appends to the buffer.
    ///
    /// Returns `None` for the command tokens (clear, backspace, evaluate).
    pub fn as_char(self) -> Option<char> {
        match self {
            Self::Digit(d) => char::from_digit(u32::from(d), 10),
            Self::Operator(op) => Some(op.as_char()),
            Self::Percent => Some('%'),
            Self::Decimal => Some('.'),
            Self::Paren(Paren::Open) => Some('('),
            Self::Paren(Paren::Close) => Some(')'),
            Self::Clear | Self::Backspace | Self::Evaluate => None,
        }
    }

    /// Parse a character token. Command tokens have no character form.
    pub fn from_char(c: char) -> Option<Self> {
        if let Some(d) = c.to_digit(10) {
            return Self::digit(d as u8);
        }
        if let Some(op) = Operator::from_char(c) {
            return Some(Self::Operator(op));
        }
        match c {
            '%' => Some(Self::Percent),
            '.' => Some(Self::Decimal),
            '(' => Some(Self::Paren(Paren::Open)),
            ')' => Some(Self::Paren(Paren::Close)),
            _ => None,
        }
    }

    /// Whether this token inserts a character rather than running a command.
    pub fn is_insertion(self) -> bool {
        self.as_char().is_some()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_char() {
            Some(c) => write!(f, "{}", c),
            None => match self {
                Self::Clear => f.write_str("AC"),
                Self::Backspace => f.write_str("Backspace"),
                _ => f.write_str("="),
            },
        }
    }
}

/// Translate a key name into a token.
///
/// Key names follow the browser `KeyboardEvent.key` convention, plus `"AC"`
/// for the clear button. Unbound keys return `None` and are meant to be
/// ignored by the caller.
pub fn token_for_key(key: &str) -> Option<Token> {
    match key {
        "Enter" | "=" => Some(Token::Evaluate),
        "Backspace" => Some(Token::Backspace),
        "Escape" | "AC" => Some(Token::Clear),
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Token::from_char(c),
                _ => None,
            }
        }
    }
}

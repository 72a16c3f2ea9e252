//! Error kinds produced when an expression is evaluated.

use thiserror::Error;

/// Why an Evaluate request failed.
///
/// Every variant is recoverable: the session keeps the buffer exactly as typed
/// and shows one generic message. The variant itself is kept for diagnostics.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CalcError {
    /// A character outside the expression alphabet.
    #[error("invalid character {found:?} at position {position}")]
    InvalidCharacter { found: char, position: usize },

    /// Two operator/decimal characters in a row, or a forbidden leading operator.
    #[error("invalid operator sequence at position {position}")]
    InvalidOperatorSequence { position: usize },

    /// The text passed validation but does not form an arithmetic expression.
    #[error("malformed expression: {reason}")]
    MalformedExpression { reason: String },

    /// The arithmetic produced NaN or an infinity.
    #[error("result is not a finite number")]
    NonFiniteResult,
}

impl CalcError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedExpression {
            reason: reason.into(),
        }
    }

    /// Short, stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCharacter { .. } => "InvalidCharacter",
            Self::InvalidOperatorSequence { .. } => "InvalidOperatorSequence",
            Self::MalformedExpression { .. } => "MalformedExpression",
            Self::NonFiniteResult => "NonFiniteResult",
        }
    }

    /// Whether the failure was caught by the syntactic validation pass.
    pub fn is_syntactic(&self) -> bool {
        matches!(
            self,
            Self::InvalidCharacter { .. } | Self::InvalidOperatorSequence { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(
            CalcError::InvalidCharacter {
                found: 'x',
                position: 0
            }
            .kind(),
            "InvalidCharacter"
        );
        assert_eq!(CalcError::NonFiniteResult.kind(), "NonFiniteResult");
        assert_eq!(CalcError::malformed("x").kind(), "MalformedExpression");
    }

    #[test]
    fn test_syntactic_split() {
        assert!(CalcError::InvalidOperatorSequence { position: 1 }.is_syntactic());
        assert!(!CalcError::NonFiniteResult.is_syntactic());
        assert!(!CalcError::malformed("unbalanced").is_syntactic());
    }

    #[test]
    fn test_display() {
        let err = CalcError::InvalidCharacter {
            found: 'a',
            position: 3,
        };
        assert_eq!(err.to_string(), "invalid character 'a' at position 3");
    }
}

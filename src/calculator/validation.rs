//! Syntactic gate run on a buffer before it is evaluated.
//!
//! Three scans, in order; the first failing one decides the error:
//! 1. every character belongs to the expression alphabet
//! 2. no run of two or more characters from `+ - * / .`
//! 3. the first character is not `+`, `*`, `/` or `%`

use super::error::CalcError;

/// Characters that may not appear twice in a row.
fn is_sequence_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '.')
}

/// Whether `c` may appear in an expression at all.
pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '.' | '(' | ')' | '%' | ' ')
}

/// Check `text` against the syntactic rules without evaluating it.
///
/// Positions in the returned error are character offsets.
pub fn validate(text: &str) -> Result<(), CalcError> {
    if let Some((position, found)) = text.chars().enumerate().find(|&(_, c)| !is_allowed_char(c))
    {
        return Err(CalcError::InvalidCharacter { found, position });
    }

    let mut previous: Option<char> = None;
    for (position, c) in text.chars().enumerate() {
        if is_sequence_char(c) && previous.is_some_and(is_sequence_char) {
            return Err(CalcError::InvalidOperatorSequence {
                position: position - 1,
            });
        }
        previous = Some(c);
    }

    if let Some('+' | '*' | '/' | '%') = text.chars().next() {
        return Err(CalcError::InvalidOperatorSequence { position: 0 });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_expressions() {
        assert!(validate("2+2").is_ok());
        assert!(validate("-5*3").is_ok());
        assert!(validate("(1.5 + 2) / 4").is_ok());
        assert!(validate("50%").is_ok());
        assert!(validate("").is_ok());
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            validate("2+a"),
            Err(CalcError::InvalidCharacter {
                found: 'a',
                position: 2
            })
        );
        assert!(matches!(
            validate("1e5"),
            Err(CalcError::InvalidCharacter { found: 'e', .. })
        ));
    }

    #[test]
    fn test_character_rule_checked_first() {
        // Both a bad character and a doubled operator; the character wins.
        assert!(matches!(
            validate("1++x"),
            Err(CalcError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn test_repeated_operators() {
        assert_eq!(
            validate("1++2"),
            Err(CalcError::InvalidOperatorSequence { position: 1 })
        );
        assert!(validate("2*-3").is_err());
        assert!(validate("1.+2").is_err());
        assert!(validate("1..2").is_err());
        assert!(validate("5--3").is_err());
    }

    #[test]
    fn test_non_adjacent_operators_pass() {
        assert!(validate("2*(-3)").is_ok());
        assert!(validate("1 + -2").is_ok());
    }

    #[test]
    fn test_leading_operator() {
        for text in ["*5", "+5", "/5", "%5"] {
            assert_eq!(
                validate(text),
                Err(CalcError::InvalidOperatorSequence { position: 0 }),
                "{text}"
            );
        }
    }

    #[test]
    fn test_leading_minus_allowed() {
        assert!(validate("-5").is_ok());
        assert!(validate("(-5)").is_ok());
    }
}

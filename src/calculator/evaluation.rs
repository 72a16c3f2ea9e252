//! Expression evaluation and result formatting.
//!
//! Evaluation runs in `f64`. Only the final value is checked for NaN and
//! infinity, so `1/(1/0)` is `0` while `5/0` fails.

use super::error::CalcError;
use super::parser::{BinaryOp, Expr, parse};
use super::validation::validate;
use tracing::debug;

/// Decimal places results are rounded to unless configured otherwise.
pub const DEFAULT_DECIMAL_PLACES: u32 = 8;

/// Upper bound on configurable decimal places; `f64` carries no more.
pub const MAX_DECIMAL_PLACES: u32 = 15;

/// Extra digits printed when checking for an exact rounding tie.
const TIE_GUARD_DIGITS: usize = 60;

/// Result of one Evaluate request.
#[derive(Clone, Debug, PartialEq)]
pub enum EvaluationOutcome {
    /// The rendered result, ready to become the new buffer.
    Value(String),
    Error(CalcError),
}

impl EvaluationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// The rendered value, if evaluation succeeded.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&CalcError> {
        match self {
            Self::Value(_) => None,
            Self::Error(err) => Some(err),
        }
    }
}

impl From<Result<String, CalcError>> for EvaluationOutcome {
    fn from(result: Result<String, CalcError>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(err) => Self::Error(err),
        }
    }
}

impl Expr {
    /// Compute the raw floating point value of the tree.
    pub fn value(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Negate(inner) => -inner.value(),
            Self::Chain { first, rest } => {
                rest.iter().fold(first.value(), |acc, (op, operand)| {
                    let b = operand.value();
                    match op {
                        BinaryOp::Add => acc + b,
                        BinaryOp::Subtract => acc - b,
                        BinaryOp::Multiply => acc * b,
                        BinaryOp::Divide => acc / b,
                    }
                })
            }
        }
    }
}

/// Evaluates expressions and renders results with a fixed rounding precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluator {
    decimal_places: u32,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl Evaluator {
    /// Create an evaluator rounding to `decimal_places` (capped at
    /// [`MAX_DECIMAL_PLACES`]).
    pub fn new(decimal_places: u32) -> Self {
        Self {
            decimal_places: decimal_places.min(MAX_DECIMAL_PLACES),
        }
    }

    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Parse and compute an expression that already passed validation.
    pub fn evaluate(&self, text: &str) -> Result<String, CalcError> {
        let expr = parse(text)?;
        let raw = expr.value();
        if !raw.is_finite() {
            debug!(expression = text, raw, "non-finite result");
            return Err(CalcError::NonFiniteResult);
        }
        format_result(raw, self.decimal_places as usize)
    }

    /// Validate, then evaluate.
    pub fn calculate(&self, text: &str) -> EvaluationOutcome {
        validate(text).and_then(|()| self.evaluate(text)).into()
    }
}

/// Evaluate a validated expression with the default precision.
pub fn evaluate(text: &str) -> Result<String, CalcError> {
    Evaluator::default().evaluate(text)
}

/// Validate and evaluate with the default precision.
pub fn calculate(text: &str) -> EvaluationOutcome {
    Evaluator::default().calculate(text)
}

/// Round `value` to `places` decimals and render the shortest plain decimal
/// string that reads back as the rounded value.
///
/// Output never uses exponent notation and `-0` renders as `0`.
pub fn format_result(value: f64, places: usize) -> Result<String, CalcError> {
    let fixed = to_fixed(value, places);
    let rounded: f64 = fixed.parse().map_err(|_| CalcError::NonFiniteResult)?;
    if rounded == 0.0 {
        return Ok("0".to_string());
    }
    Ok(format!("{}", rounded))
}

/// Fixed-point rendering with ties rounded away from zero.
///
/// `format!("{:.N}")` rounds exact ties to even, so ties are detected first and
/// carried by hand.
fn to_fixed(value: f64, places: usize) -> String {
    let magnitude = value.abs();
    let widened = format!("{:.*}", places + 1 + TIE_GUARD_DIGITS, magnitude);
    let tie_digit = widened.len() - TIE_GUARD_DIGITS - 1;
    let exact_tie = widened.as_bytes()[tie_digit] == b'5'
        && widened[tie_digit + 1..].bytes().all(|b| b == b'0');

    let digits = if exact_tie {
        round_up_digits(widened[..tie_digit].trim_end_matches('.'))
    } else {
        format!("{:.*}", places, magnitude)
    };

    if value.is_sign_negative() {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// Add one unit in the last place of a plain decimal string.
fn round_up_digits(digits: &str) -> String {
    let mut chars: Vec<char> = digits.chars().collect();
    let mut carry = true;
    for c in chars.iter_mut().rev() {
        if !carry {
            break;
        }
        match *c {
            '.' => {}
            '9' => *c = '0',
            d => {
                *c = (d as u8 + 1) as char;
                carry = false;
            }
        }
    }
    let mut out = String::with_capacity(chars.len() + 1);
    if carry {
        out.push('1');
    }
    out.extend(chars);
    out
}

//! Calculator core: input buffer, validation and evaluation.
//!
//! This module provides functionality to:
//! - Map key presses to input tokens
//! - Build an expression buffer under insertion rules
//! - Validate and evaluate the buffer into a rounded result
//! - Track one interactive session and render its display

mod buffer;
mod display;
mod error;
mod evaluation;
mod parser;
mod session;
mod token;
mod validation;

pub use buffer::ExpressionBuffer;
pub use display::{DEFAULT_ERROR_MESSAGE, DisplayState};
pub use error::CalcError;
pub use evaluation::{
    DEFAULT_DECIMAL_PLACES, EvaluationOutcome, Evaluator, MAX_DECIMAL_PLACES, calculate, evaluate,
    format_result,
};
pub use parser::{BinaryOp, Expr, parse};
pub use session::{Phase, Session};
pub use token::{Operator, Paren, Token, token_for_key};
pub use validation::{is_allowed_char, validate};

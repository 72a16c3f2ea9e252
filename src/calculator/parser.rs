//! Tokenizer and recursive-descent parser for calculator expressions.
//!
//! Grammar (spaces are skipped between tokens):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | '(' expr ')'
//! ```
//!
//! `%` is tokenized so it can be reported precisely, but it has no place in the
//! grammar: any expression containing it is rejected.

use super::error::CalcError;
use tracing::trace;

/// Deepest parenthesis/unary nesting accepted before giving up.
const MAX_DEPTH: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Lexeme {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Spanned {
    lexeme: Lexeme,
    position: usize,
}

/// Split `text` into lexemes, tracking character positions.
fn tokenize(text: &str) -> Result<Vec<Spanned>, CalcError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let lexeme = match c {
            ' ' => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let start = i;
                let mut seen_dot = false;
                while i < chars.len() {
                    match chars[i] {
                        '0'..='9' => {}
                        '.' if !seen_dot => seen_dot = true,
                        _ => break,
                    }
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                if literal == "." {
                    return Err(CalcError::malformed(format!(
                        "lone decimal point at position {start}"
                    )));
                }
                let value = literal.parse::<f64>().map_err(|_| {
                    CalcError::malformed(format!("bad number {literal:?} at position {start}"))
                })?;
                tokens.push(Spanned {
                    lexeme: Lexeme::Number(value),
                    position: start,
                });
                continue;
            }
            '+' => Lexeme::Plus,
            '-' => Lexeme::Minus,
            '*' => Lexeme::Star,
            '/' => Lexeme::Slash,
            '%' => Lexeme::Percent,
            '(' => Lexeme::LParen,
            ')' => Lexeme::RParen,
            found => return Err(CalcError::InvalidCharacter { found, position: i }),
        };
        tokens.push(Spanned {
            lexeme,
            position: i,
        });
        i += 1;
    }

    Ok(tokens)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Parsed arithmetic expression.
///
/// Runs of same-precedence operators are stored flat in a [`Expr::Chain`], so
/// the tree only gets deeper through parentheses and unary signs, both of
/// which are bounded by the nesting limit.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Negate(Box<Expr>),
    /// `first op1 x1 op2 x2 ...`, applied left to right.
    Chain {
        first: Box<Expr>,
        rest: Vec<(BinaryOp, Expr)>,
    },
}

impl Expr {
    fn chain(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Self {
        if rest.is_empty() {
            first
        } else {
            Self::Chain {
                first: Box::new(first),
                rest,
            }
        }
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Spanned> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Spanned> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::malformed("expression nested too deeply"));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, CalcError> {
        let first = self.term()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek().map(|t| t.lexeme) {
                Some(Lexeme::Plus) => BinaryOp::Add,
                Some(Lexeme::Minus) => BinaryOp::Subtract,
                _ => return Ok(Expr::chain(first, rest)),
            };
            self.pos += 1;
            rest.push((op, self.term()?));
        }
    }

    fn term(&mut self) -> Result<Expr, CalcError> {
        let first = self.unary()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Spanned {
                    lexeme: Lexeme::Star,
                    ..
                }) => BinaryOp::Multiply,
                Some(Spanned {
                    lexeme: Lexeme::Slash,
                    ..
                }) => BinaryOp::Divide,
                Some(Spanned {
                    lexeme: Lexeme::Percent,
                    position,
                }) => return Err(percent_error(position)),
                _ => return Ok(Expr::chain(first, rest)),
            };
            self.pos += 1;
            rest.push((op, self.unary()?));
        }
    }

    fn unary(&mut self) -> Result<Expr, CalcError> {
        match self.peek().map(|t| t.lexeme) {
            Some(Lexeme::Minus) => {
                self.pos += 1;
                self.enter()?;
                let operand = self.unary()?;
                self.depth -= 1;
                Ok(Expr::Negate(Box::new(operand)))
            }
            Some(Lexeme::Plus) => {
                self.pos += 1;
                self.enter()?;
                let operand = self.unary()?;
                self.depth -= 1;
                Ok(operand)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, CalcError> {
        let Some(token) = self.bump() else {
            return Err(CalcError::malformed("expression ends where an operand was expected"));
        };
        match token.lexeme {
            Lexeme::Number(value) => Ok(Expr::Number(value)),
            Lexeme::LParen => {
                self.enter()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.bump() {
                    Some(Spanned {
                        lexeme: Lexeme::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(CalcError::malformed(format!(
                        "expected ')' at position {}",
                        other.position
                    ))),
                    None => Err(CalcError::malformed(format!(
                        "unclosed '(' at position {}",
                        token.position
                    ))),
                }
            }
            Lexeme::Percent => Err(percent_error(token.position)),
            _ => Err(CalcError::malformed(format!(
                "expected an operand at position {}",
                token.position
            ))),
        }
    }
}

fn percent_error(position: usize) -> CalcError {
    CalcError::malformed(format!(
        "'%' at position {position} is not an arithmetic operator"
    ))
}

/// Parse `text` into an expression tree.
pub fn parse(text: &str) -> Result<Expr, CalcError> {
    let tokens = tokenize(text)?;
    trace!(count = tokens.len(), "tokenized expression");
    if tokens.is_empty() {
        return Err(CalcError::malformed("empty expression"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;

    match parser.peek() {
        None => Ok(expr),
        Some(Spanned {
            lexeme: Lexeme::Percent,
            position,
        }) => Err(percent_error(position)),
        Some(Spanned {
            lexeme: Lexeme::RParen,
            position,
        }) => Err(CalcError::malformed(format!(
            "unmatched ')' at position {position}"
        ))),
        Some(Spanned { position, .. }) => Err(CalcError::malformed(format!(
            "missing operator before position {position}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> Box<Expr> {
        Box::new(Expr::Number(v))
    }

    fn is_malformed(text: &str) -> bool {
        matches!(parse(text), Err(CalcError::MalformedExpression { .. }))
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse("1+2*3").unwrap(),
            Expr::Chain {
                first: num(1.0),
                rest: vec![(
                    BinaryOp::Add,
                    Expr::Chain {
                        first: num(2.0),
                        rest: vec![(BinaryOp::Multiply, Expr::Number(3.0))],
                    }
                )],
            }
        );
    }

    #[test]
    fn test_same_precedence_stays_flat() {
        assert_eq!(
            parse("8-4-2").unwrap(),
            Expr::Chain {
                first: num(8.0),
                rest: vec![
                    (BinaryOp::Subtract, Expr::Number(4.0)),
                    (BinaryOp::Subtract, Expr::Number(2.0)),
                ],
            }
        );
    }

    #[test]
    fn test_long_chain_is_flat() {
        let text = format!("1{}", "+1".repeat(200_000));
        match parse(&text).unwrap() {
            Expr::Chain { rest, .. } => assert_eq!(rest.len(), 200_000),
            other => panic!("expected a chain, got {other:?}"),
        }
    }

    #[test]
    fn test_parentheses_and_unary() {
        assert_eq!(
            parse("-(2)").unwrap(),
            Expr::Negate(Box::new(Expr::Number(2.0)))
        );
        assert_eq!(parse("(+3)").unwrap(), Expr::Number(3.0));
        assert_eq!(parse(" ( 4 ) ").unwrap(), Expr::Number(4.0));
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(parse("1.").unwrap(), Expr::Number(1.0));
        assert_eq!(parse(".5").unwrap(), Expr::Number(0.5));
        assert_eq!(parse("007").unwrap(), Expr::Number(7.0));
    }

    #[test]
    fn test_structural_errors() {
        assert!(is_malformed("(1+2"));
        assert!(is_malformed("1+2)"));
        assert!(is_malformed("1+"));
        assert!(is_malformed("()"));
        assert!(is_malformed("2(3)"));
        assert!(is_malformed("1 2"));
        assert!(is_malformed("."));
        assert!(is_malformed("1.2.3"));
        assert!(is_malformed("   "));
    }

    #[test]
    fn test_percent_error_position() {
        for (text, position) in [("50%", 2), ("-%", 1), ("(5%)", 2), ("7*%", 2)] {
            let Err(CalcError::MalformedExpression { reason }) = parse(text) else {
                panic!("{text} should be malformed");
            };
            assert!(
                reason.contains(&format!("position {position}")),
                "{text}: {reason}"
            );
        }
    }

    #[test]
    fn test_percent_always_rejected() {
        assert!(is_malformed("50%"));
        assert!(is_malformed("10%3"));
        assert!(is_malformed("-%"));
        assert!(is_malformed("(5%)"));
    }

    #[test]
    fn test_unknown_character() {
        assert_eq!(
            parse("1x"),
            Err(CalcError::InvalidCharacter {
                found: 'x',
                position: 1
            })
        );
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(is_malformed(&deep));
        let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(parse(&ok).unwrap(), Expr::Number(1.0));
    }
}

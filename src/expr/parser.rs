//! Recursive-descent parser for arithmetic expression text.
//!
//! Grammar (standard precedence: `^` right-associative and tighter than
//! unary minus, so `-2 ^ 2` is `-(2 ^ 2)` while `2 ^ -3` still parses):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | name | name '(' expr (',' expr)* ')' | '(' expr ')'
//! ```
//!
//! Function names are resolved against the built-in table at parse time,
//! so an unknown function or wrong argument count surfaces as a
//! `ParseError` when the expression is stored, not when it is read.

use crate::error::ParseError;
use crate::expr::lexer::{tokenize, SpannedToken, Token};
use crate::expr::{BinaryOp, ExprNode, Function, UnaryOp};

pub(crate) fn parse(text: &str) -> Result<ExprNode, ParseError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0 };
    let root = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(ParseError::TrailingInput {
            position: tok.position,
        });
    }
    Ok(root)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        match self.advance() {
            Some(tok) if tok.token == *expected => Ok(()),
            Some(tok) => Err(ParseError::UnexpectedToken {
                position: tok.position,
                found: tok.token.describe(),
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<ExprNode, ParseError> {
        let mut lhs = self.term()?;
        while let Some(tok) = self.peek() {
            let op = match tok.token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.term()?;
            lhs = ExprNode::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<ExprNode, ParseError> {
        let mut lhs = self.unary()?;
        while let Some(tok) = self.peek() {
            let op = match tok.token {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = ExprNode::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<ExprNode, ParseError> {
        match self.peek().map(|t| t.token.clone()) {
            Some(Token::Minus) => {
                self.advance();
                // Negation applies to the whole power: -a^b is -(a^b).
                let operand = self.unary()?;
                Ok(ExprNode::unary(UnaryOp::Neg, operand))
            }
            Some(Token::Plus) => {
                self.advance();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<ExprNode, ParseError> {
        let base = self.primary()?;
        if matches!(self.peek(), Some(tok) if tok.token == Token::Caret) {
            self.advance();
            // Right-associative (a^b^c is a^(b^c)); the exponent goes
            // through `unary` so a signed exponent parses.
            let exponent = self.unary()?;
            return Ok(ExprNode::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<ExprNode, ParseError> {
        let Some(tok) = self.advance() else {
            return Err(ParseError::UnexpectedEnd);
        };

        match tok.token {
            Token::Number(value) => Ok(ExprNode::Number(value)),
            Token::Ident(name) => {
                if matches!(self.peek(), Some(t) if t.token == Token::LParen) {
                    self.call(&name)
                } else {
                    Ok(ExprNode::Variable(name))
                }
            }
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            other => Err(ParseError::UnexpectedToken {
                position: tok.position,
                found: other.describe(),
            }),
        }
    }

    fn call(&mut self, name: &str) -> Result<ExprNode, ParseError> {
        let function = Function::from_name(name).ok_or_else(|| ParseError::UnknownFunction {
            name: name.to_string(),
        })?;

        self.expect(&Token::LParen)?;
        let mut args = vec![self.expr()?];
        while matches!(self.peek(), Some(t) if t.token == Token::Comma) {
            self.advance();
            args.push(self.expr()?);
        }
        self.expect(&Token::RParen)?;

        if args.len() != function.arity() {
            return Err(ParseError::ArityMismatch {
                function: name.to_string(),
                expected: function.arity(),
                actual: args.len(),
            });
        }
        Ok(ExprNode::Call { function, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_const(text: &str) -> f64 {
        parse(text)
            .unwrap()
            .eval(&mut |name| panic!("unexpected variable {name}"))
            .unwrap()
    }

    #[test]
    fn test_parse_precedence() {
        assert_eq!(eval_const("1 + 2 * 3"), 7.0);
        assert_eq!(eval_const("(1 + 2) * 3"), 9.0);
        assert_eq!(eval_const("10 - 4 - 3"), 3.0);
        assert_eq!(eval_const("12 / 2 / 3"), 2.0);
    }

    #[test]
    fn test_parse_power_right_associative() {
        assert_eq!(eval_const("2 ^ 3 ^ 2"), 512.0);
        assert_eq!(eval_const("2 ^ 3 * 4"), 32.0);
    }

    #[test]
    fn test_parse_unary_minus() {
        assert_eq!(eval_const("-3 + 5"), 2.0);
        assert_eq!(eval_const("--4"), 4.0);
        assert_eq!(eval_const("2 * -3"), -6.0);
        // Unary minus binds looser than '^': -2^2 == -(2^2).
        assert_eq!(eval_const("-2 ^ 2"), -4.0);
    }

    #[test]
    fn test_parse_signed_exponent() {
        assert_eq!(eval_const("2 ^ -2"), 0.25);
        assert_eq!(eval_const("2 ^ +2"), 4.0);
        assert_eq!(eval_const("-2 ^ -2"), -0.25);
        // Signed exponents keep right-associativity: -(2^(-(3^2))).
        assert_eq!(eval_const("-2 ^ -3 ^ 2"), -(2.0f64.powf(-9.0)));
    }

    #[test]
    fn test_parse_functions() {
        assert!((eval_const("sqrt(16)") - 4.0).abs() < 1e-12);
        assert!((eval_const("max(2, 7)") - 7.0).abs() < 1e-12);
        assert!((eval_const("atan2(1, 1)") - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert!((eval_const("cos(0)") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_variable_reference() {
        let node = parse("41.85 - delftPressYStep").unwrap();
        let value = node
            .eval(&mut |name| {
                assert_eq!(name, "delftPressYStep");
                Ok(1.85)
            })
            .unwrap();
        assert!((value - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_unknown_function() {
        let err = parse("sinh(1)").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownFunction {
                name: "sinh".to_string()
            }
        );
    }

    #[test]
    fn test_parse_arity_mismatch() {
        let err = parse("min(1)").unwrap_err();
        assert!(matches!(err, ParseError::ArityMismatch { .. }));
        let err = parse("sqrt(1, 2)").unwrap_err();
        assert!(matches!(err, ParseError::ArityMismatch { .. }));
    }

    #[test]
    fn test_parse_trailing_input() {
        let err = parse("1 + 2 3").unwrap_err();
        assert!(matches!(err, ParseError::TrailingInput { .. }));
    }

    #[test]
    fn test_parse_unclosed_paren() {
        assert_eq!(parse("(1 + 2").unwrap_err(), ParseError::UnexpectedEnd);
    }

    #[test]
    fn test_parse_dangling_operator() {
        assert_eq!(parse("1 +").unwrap_err(), ParseError::UnexpectedEnd);
        assert!(matches!(
            parse("* 2").unwrap_err(),
            ParseError::UnexpectedToken { .. }
        ));
    }
}

//! Tokenizer for arithmetic expression text.
//!
//! Expression sources are short (a formula over a handful of variable
//! names), so the lexer is a simple character walk producing the whole
//! token stream up front.

use crate::error::ParseError;

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// Numeric literal.
    Number(f64),
    /// Variable or function name.
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl Token {
    /// Short rendering used in parse-error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Number(v) => format!("{v}"),
            Self::Ident(name) => name.clone(),
            Self::Plus => "+".to_string(),
            Self::Minus => "-".to_string(),
            Self::Star => "*".to_string(),
            Self::Slash => "/".to_string(),
            Self::Caret => "^".to_string(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
            Self::Comma => ",".to_string(),
        }
    }
}

/// A token plus its byte offset into the source, for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpannedToken {
    pub token: Token,
    pub position: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenizes `text`, skipping ASCII whitespace.
pub(crate) fn tokenize(text: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let position = i;
        let token = match c {
            '+' => {
                i += 1;
                Token::Plus
            }
            '-' => {
                i += 1;
                Token::Minus
            }
            '*' => {
                i += 1;
                Token::Star
            }
            '/' => {
                i += 1;
                Token::Slash
            }
            '^' => {
                i += 1;
                Token::Caret
            }
            '(' => {
                i += 1;
                Token::LParen
            }
            ')' => {
                i += 1;
                Token::RParen
            }
            ',' => {
                i += 1;
                Token::Comma
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Exponent suffix: 1.5e-3, 2E+8
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                    position: start,
                    text: text.clone(),
                })?;
                Token::Number(value)
            }
            c if is_ident_start(c) => {
                let start = i;
                while i < chars.len() && is_ident_continue(chars[i]) {
                    i += 1;
                }
                Token::Ident(chars[start..i].iter().collect())
            }
            other => {
                return Err(ParseError::UnexpectedChar {
                    position,
                    found: other,
                })
            }
        };

        tokens.push(SpannedToken { token, position });
    }

    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<Token> {
        tokenize(text).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(kinds("42"), vec![Token::Number(42.0)]);
        assert_eq!(kinds("3.5"), vec![Token::Number(3.5)]);
        assert_eq!(kinds(".5"), vec![Token::Number(0.5)]);
        assert_eq!(kinds("1.5e-3"), vec![Token::Number(0.0015)]);
        assert_eq!(kinds("2E+2"), vec![Token::Number(200.0)]);
    }

    #[test]
    fn test_tokenize_idents_and_operators() {
        assert_eq!(
            kinds("41.85 - delftPressYStep"),
            vec![
                Token::Number(41.85),
                Token::Minus,
                Token::Ident("delftPressYStep".to_string()),
            ]
        );
        assert_eq!(
            kinds("a*(b+c)"),
            vec![
                Token::Ident("a".to_string()),
                Token::Star,
                Token::LParen,
                Token::Ident("b".to_string()),
                Token::Plus,
                Token::Ident("c".to_string()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_positions() {
        let tokens = tokenize("ab + cd").unwrap();
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[1].position, 3);
        assert_eq!(tokens[2].position, 5);
    }

    #[test]
    fn test_tokenize_empty_is_error() {
        assert_eq!(tokenize(""), Err(ParseError::Empty));
        assert_eq!(tokenize("   "), Err(ParseError::Empty));
    }

    #[test]
    fn test_tokenize_bad_character() {
        let err = tokenize("1 + $x").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedChar {
                position: 4,
                found: '$'
            }
        );
    }

    #[test]
    fn test_tokenize_bad_number() {
        let err = tokenize("1.2.3").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn test_exponent_not_consumed_without_digits() {
        // "2e" is ident-like garbage after a number: "2" then ident "e".
        assert_eq!(
            kinds("2e"),
            vec![Token::Number(2.0), Token::Ident("e".to_string())]
        );
    }
}

//! Tokenizer for function text.

use std::fmt;

use super::error::ExpressionError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
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

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::Ident(name) => write!(f, "{name}"),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Caret => f.write_str("^"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Comma => f.write_str(","),
        }
    }
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Split function text into tokens.
///
/// `**` is read as `^`. Numeric literals accept a fractional part and an
/// exponent (`1.5e-3`); an `e` that is not followed by digits is left for
/// the parser, where it names Euler's number.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ExpressionError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (position, c) = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && next_is_digit(&chars, i + 1)) {
            let end = scan_number(&chars, i);
            let text = slice(input, &chars, i, end);
            let value = text
                .parse::<f64>()
                .map_err(|_| ExpressionError::InvalidNumber {
                    text: text.to_string(),
                    position,
                })?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                position,
            });
            i = end;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let mut end = i + 1;
            while end < chars.len() && (chars[end].1.is_alphanumeric() || chars[end].1 == '_') {
                end += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(slice(input, &chars, i, end).to_string()),
                position,
            });
            i = end;
            continue;
        }

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' if matches!(chars.get(i + 1), Some((_, '*'))) => {
                i += 1;
                TokenKind::Caret
            }
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '^' => TokenKind::Caret,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            other => {
                return Err(ExpressionError::UnexpectedCharacter {
                    character: other,
                    position,
                })
            }
        };
        tokens.push(Token { kind, position });
        i += 1;
    }

    Ok(tokens)
}

fn next_is_digit(chars: &[(usize, char)], i: usize) -> bool {
    chars.get(i).is_some_and(|(_, c)| c.is_ascii_digit())
}

/// Returns the index one past the end of the numeric literal starting at `start`.
fn scan_number(chars: &[(usize, char)], start: usize) -> usize {
    let mut end = start;
    while next_is_digit(chars, end) {
        end += 1;
    }
    if matches!(chars.get(end), Some((_, '.'))) {
        end += 1;
        while next_is_digit(chars, end) {
            end += 1;
        }
    }
    if matches!(chars.get(end), Some((_, 'e' | 'E'))) {
        let mut lookahead = end + 1;
        if matches!(chars.get(lookahead), Some((_, '+' | '-'))) {
            lookahead += 1;
        }
        if next_is_digit(chars, lookahead) {
            end = lookahead;
            while next_is_digit(chars, end) {
                end += 1;
            }
        }
    }
    end
}

fn slice<'a>(input: &'a str, chars: &[(usize, char)], start: usize, end: usize) -> &'a str {
    let from = chars[start].0;
    let to = chars.get(end).map_or(input.len(), |(offset, _)| *offset);
    &input[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_operators_and_numbers() {
        assert_eq!(
            kinds("x^2 - 4"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Caret,
                TokenKind::Number(2.0),
                TokenKind::Minus,
                TokenKind::Number(4.0),
            ]
        );
    }

    #[test]
    fn test_double_star_is_power() {
        assert_eq!(
            kinds("x**3"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Caret,
                TokenKind::Number(3.0)
            ]
        );
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(kinds("1.5e-3"), vec![TokenKind::Number(1.5e-3)]);
        assert_eq!(kinds(".25"), vec![TokenKind::Number(0.25)]);
    }

    #[test]
    fn test_trailing_e_is_identifier() {
        // "2e" is two times Euler's number, not a malformed exponent
        assert_eq!(
            kinds("2e"),
            vec![TokenKind::Number(2.0), TokenKind::Ident("e".into())]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("x # 2").unwrap_err();
        assert_eq!(
            err,
            ExpressionError::UnexpectedCharacter {
                character: '#',
                position: 2
            }
        );
    }

    #[test]
    fn test_unicode_pi_identifier() {
        assert_eq!(kinds("π"), vec![TokenKind::Ident("π".into())]);
    }
}

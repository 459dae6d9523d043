//! Recursive-descent parser producing a [`Node`] tree.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary | implicit)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := NUMBER | IDENT | IDENT '(' expr (',' expr)* ')' | '(' expr ')'
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus, so `-x^2`
//! is `-(x^2)` and `2^-1` is `0.5`. Implicit multiplication is only read
//! after a numeric literal (`2x`, `3(x + 1)`, `2sin(x)`).
//!
//! Both parser recursion and tree depth are capped at [`MAX_DEPTH`], so the
//! tree-walking passes over a parsed [`Node`] stay within a bounded stack.

use std::f64::consts::{E, PI};

use super::ast::{BinaryOp, Function, Node, UnaryOp};
use super::error::ExpressionError;
use super::lexer::{tokenize, Token, TokenKind};

/// Deepest nesting accepted, counted both as parser recursion (parentheses,
/// calls, unary signs, exponents) and as depth of the resulting tree.
pub const MAX_DEPTH: usize = 256;

/// Parse function text into a syntax tree.
pub fn parse(input: &str) -> Result<Node, ExpressionError> {
    if input.trim().is_empty() {
        return Err(ExpressionError::Empty);
    }

    let tokens = tokenize(input)?;
    let mut parser = Parser::new(&tokens);
    let node = parser.parse_expr()?;

    match parser.peek() {
        None => Ok(node),
        Some(token) => Err(unexpected(token)),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&'a TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Byte offset of the next token, or of the last one at end of input.
    fn position(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.position)
    }

    fn too_deep(position: usize) -> ExpressionError {
        ExpressionError::TooDeep {
            limit: MAX_DEPTH,
            position,
        }
    }

    /// Reject a node whose tree is deeper than [`MAX_DEPTH`].
    fn bounded(node: Node, position: usize) -> Result<Node, ExpressionError> {
        if node.depth() > MAX_DEPTH {
            return Err(Self::too_deep(position));
        }
        Ok(node)
    }

    fn expect(&mut self, expected: &TokenKind) -> Result<(), ExpressionError> {
        match self.advance() {
            Some(token) if &token.kind == expected => Ok(()),
            Some(token) => Err(unexpected(token)),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }

    fn parse_expr(&mut self) -> Result<Node, ExpressionError> {
        let mut left = self.parse_term()?;

        while let Some(kind) = self.peek_kind() {
            let op = match kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let position = self.position();
            self.advance();
            let right = self.parse_term()?;
            left = Self::bounded(Node::binary(op, left, right), position)?;
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Node, ExpressionError> {
        let mut left = self.parse_unary()?;

        loop {
            let position = self.position();
            let (op, right) = match self.peek_kind() {
                Some(TokenKind::Star) => {
                    self.advance();
                    (BinaryOp::Mul, self.parse_unary()?)
                }
                Some(TokenKind::Slash) => {
                    self.advance();
                    (BinaryOp::Div, self.parse_unary()?)
                }
                Some(TokenKind::Ident(_) | TokenKind::LParen) if self.follows_number() => {
                    (BinaryOp::Mul, self.parse_power()?)
                }
                _ => break,
            };
            left = Self::bounded(Node::binary(op, left, right), position)?;
        }

        Ok(left)
    }

    /// True when the previous token was a numeric literal.
    fn follows_number(&self) -> bool {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .is_some_and(|t| matches!(t.kind, TokenKind::Number(_)))
    }

    /// Every recursive path in the grammar passes through here, so this is
    /// where parser recursion is counted.
    fn parse_unary(&mut self) -> Result<Node, ExpressionError> {
        let position = self.position();
        if self.depth >= MAX_DEPTH {
            return Err(Self::too_deep(position));
        }
        self.depth += 1;

        let node = match self.peek_kind() {
            Some(TokenKind::Minus) => {
                self.advance();
                let operand = self.parse_unary()?;
                Self::bounded(Node::unary(UnaryOp::Neg, operand), position)?
            }
            Some(TokenKind::Plus) => {
                self.advance();
                self.parse_unary()?
            }
            _ => self.parse_power()?,
        };

        self.depth -= 1;
        Ok(node)
    }

    fn parse_power(&mut self) -> Result<Node, ExpressionError> {
        let base = self.parse_primary()?;

        if let Some(TokenKind::Caret) = self.peek_kind() {
            let position = self.position();
            self.advance();
            let exponent = self.parse_unary()?;
            Self::bounded(Node::binary(BinaryOp::Pow, base, exponent), position)
        } else {
            Ok(base)
        }
    }

    fn parse_primary(&mut self) -> Result<Node, ExpressionError> {
        let token = self.advance().ok_or(ExpressionError::UnexpectedEnd)?;

        match &token.kind {
            TokenKind::Number(n) => Ok(Node::Number(*n)),
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                if let Some(TokenKind::LParen) = self.peek_kind() {
                    self.advance();
                    return self.parse_call(name, token.position);
                }
                identifier(name, token.position)
            }
            _ => Err(unexpected(token)),
        }
    }

    fn parse_call(&mut self, name: &str, position: usize) -> Result<Node, ExpressionError> {
        let function = Function::from_name(name).ok_or_else(|| ExpressionError::UnknownFunction {
            name: name.to_string(),
            position,
        })?;

        let mut args = vec![self.parse_expr()?];
        while let Some(TokenKind::Comma) = self.peek_kind() {
            self.advance();
            args.push(self.parse_expr()?);
        }
        self.expect(&TokenKind::RParen)?;

        let found = args.len();
        match <[Node; 1]>::try_from(args) {
            Ok([arg]) => Self::bounded(Node::call(function, arg), position),
            Err(_) => Err(ExpressionError::WrongArity {
                function: function.name().to_string(),
                expected: function.arity(),
                found,
            }),
        }
    }
}

/// Resolve a bare identifier: the variable or a named constant.
fn identifier(name: &str, position: usize) -> Result<Node, ExpressionError> {
    match name {
        "x" => Ok(Node::Variable),
        "pi" | "PI" | "π" => Ok(Node::Number(PI)),
        "e" | "E" => Ok(Node::Number(E)),
        _ if Function::from_name(name).is_some() => Err(ExpressionError::UnexpectedToken {
            found: name.to_string(),
            position,
        }),
        _ => Err(ExpressionError::UnknownIdentifier {
            name: name.to_string(),
            position,
        }),
    }
}

fn unexpected(token: &Token) -> ExpressionError {
    ExpressionError::UnexpectedToken {
        found: token.kind.to_string(),
        position: token.position,
    }
}

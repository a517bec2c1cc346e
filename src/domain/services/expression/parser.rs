//! Recursive-descent parser for derived-field expressions
//!
//! Precedence, lowest first: `?:`, `??`, `||`, `&&`, equality, relational,
//! additive, multiplicative, unary, postfix (`.length`, calls), primary.

use super::ast::{BinaryOp, Expr, LogicalOp, UnaryOp};
use super::lexer::{tokenize, Token, TokenKind};
use super::library::{math_constant, Function};
use super::ParseError;
use crate::domain::value_objects::{FieldId, Value};

/// Longest accepted expression, in characters
pub const MAX_EXPRESSION_LEN: usize = 4096;
/// Deepest accepted nesting of sub-expressions
pub const MAX_DEPTH: usize = 64;

/// Parse an expression string into a syntax tree
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let len = source.chars().count();
    if len > MAX_EXPRESSION_LEN {
        return Err(ParseError::new(
            format!(
                "expression is {} characters long (limit {})",
                len, MAX_EXPRESSION_LEN
            ),
            0,
        ));
    }

    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };

    if parser.check(&TokenKind::Eof) {
        return Err(ParseError::new("empty expression", 0));
    }

    let expr = parser.parse_expression()?;
    let trailing = parser.current();
    if trailing.kind != TokenKind::Eof {
        return Err(ParseError::new(
            format!("unexpected {} after expression", trailing.kind),
            trailing.position,
        ));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        // The token list always ends with Eof, and `advance` never moves past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.match_token(&kind) {
            Ok(())
        } else {
            let found = self.current();
            Err(ParseError::new(
                format!("expected {}, found {}", kind, found.kind),
                found.position,
            ))
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::new(
                format!("expression nests deeper than {} levels", MAX_DEPTH),
                self.current().position,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let result = self.parse_conditional();
        self.leave();
        result
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let condition = self.parse_coalesce()?;
        if !self.match_token(&TokenKind::Question) {
            return Ok(condition);
        }
        let then = self.parse_expression()?;
        self.expect(TokenKind::Colon)?;
        let otherwise = self.parse_expression()?;
        Ok(Expr::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_coalesce(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_or()?;
        while self.match_token(&TokenKind::Coalesce) {
            let right = self.parse_or()?;
            left = logical(LogicalOp::Coalesce, left, right);
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.match_token(&TokenKind::OrOr) {
            let right = self.parse_and()?;
            left = logical(LogicalOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        while self.match_token(&TokenKind::AndAnd) {
            let right = self.parse_equality()?;
            left = logical(LogicalOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.current().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::StrictEq => BinaryOp::StrictEq,
                TokenKind::StrictNotEq => BinaryOp::StrictNotEq,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_relational()?;
            left = binary(op, left, right);
        }
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Ge => BinaryOp::Ge,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.current().kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Negate,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_postfix(),
        };
        self.advance();
        self.enter()?;
        let operand = self.parse_unary();
        self.leave();
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand?),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        while self.check(&TokenKind::Dot) {
            let dot = self.advance();
            match self.advance().kind {
                TokenKind::Ident(name) if name == "length" => {
                    expr = Expr::Length(Box::new(expr));
                }
                TokenKind::Ident(name) => {
                    return Err(ParseError::new(
                        format!("unknown property '{}' (only 'length' is supported)", name),
                        dot.position,
                    ))
                }
                other => {
                    return Err(ParseError::new(
                        format!("expected property name, found {}", other),
                        dot.position,
                    ))
                }
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Literal(Value::Number(n))),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::Text(s))),
            TokenKind::LParen => {
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => self.parse_identifier(name, token.position),
            other => Err(ParseError::new(
                format!("unexpected {}", other),
                token.position,
            )),
        }
    }

    fn parse_identifier(&mut self, name: String, position: usize) -> Result<Expr, ParseError> {
        match name.as_str() {
            "true" => Ok(Expr::Literal(Value::Bool(true))),
            "false" => Ok(Expr::Literal(Value::Bool(false))),
            "null" | "undefined" => Ok(Expr::Literal(Value::Null)),
            "fields" => self.parse_field_access(position),
            "Math" => self.parse_math_member(position),
            _ => match Function::global(&name) {
                Some(function) if self.check(&TokenKind::LParen) => {
                    self.parse_call(function, position)
                }
                Some(_) => Err(ParseError::new(
                    format!("function '{}' must be called", name),
                    position,
                )),
                None => Err(ParseError::new(
                    format!("unknown identifier '{}'", name),
                    position,
                )),
            },
        }
    }

    /// `fields['id']`, `fields["id"]` or `fields.id`
    fn parse_field_access(&mut self, position: usize) -> Result<Expr, ParseError> {
        if self.match_token(&TokenKind::LBracket) {
            let key = self.advance();
            let TokenKind::Str(id) = key.kind else {
                return Err(ParseError::new(
                    "field key must be a quoted string",
                    key.position,
                ));
            };
            self.expect(TokenKind::RBracket)?;
            return Ok(Expr::Field(FieldId::new(id)));
        }

        if self.match_token(&TokenKind::Dot) {
            let key = self.advance();
            if let TokenKind::Ident(id) = key.kind {
                return Ok(Expr::Field(FieldId::new(id)));
            }
            return Err(ParseError::new("expected field name after 'fields.'", key.position));
        }

        Err(ParseError::new(
            "'fields' must be indexed, e.g. fields['id']",
            position,
        ))
    }

    fn parse_math_member(&mut self, position: usize) -> Result<Expr, ParseError> {
        self.expect(TokenKind::Dot)?;
        let member = self.advance();
        let TokenKind::Ident(name) = member.kind else {
            return Err(ParseError::new("expected name after 'Math.'", member.position));
        };

        if let Some(value) = math_constant(&name) {
            return Ok(Expr::Literal(Value::Number(value)));
        }
        match Function::math(&name) {
            Some(function) if self.check(&TokenKind::LParen) => self.parse_call(function, position),
            Some(_) => Err(ParseError::new(
                format!("function 'Math.{}' must be called", name),
                position,
            )),
            None => Err(ParseError::new(
                format!("'Math.{}' is not available", name),
                member.position,
            )),
        }
    }

    fn parse_call(&mut self, function: Function, position: usize) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let arity = function.arity();
        if !arity.accepts(args.len()) {
            return Err(ParseError::new(
                format!(
                    "{} expects {} argument(s), got {}",
                    function.name(),
                    arity,
                    args.len()
                ),
                position,
            ));
        }
        Ok(Expr::Call { function, args })
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
    Expr::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

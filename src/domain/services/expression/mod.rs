//! Derived-field expression language
//!
//! A small, sandboxed language for computing one field from others:
//! arithmetic, string, comparison and date operations over `fields['id']`
//! lookups plus an allow-listed function library. There is no way to reach
//! the host environment, perform I/O, or loop.
//!
//! ```
//! use formsmith::domain::services::expression::Expression;
//! use formsmith::domain::value_objects::{FieldId, Value, ValueMap};
//!
//! let expr = Expression::parse("fields['A'] * 2").unwrap();
//! let mut values = ValueMap::new();
//! values.insert(FieldId::from("A"), Value::Number(10.0));
//! let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! assert_eq!(expr.evaluate(&values, today).unwrap(), Value::Number(20.0));
//! ```

mod ast;
mod eval;
mod lexer;
mod library;
mod parser;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use thiserror::Error;

pub use ast::{BinaryOp, Expr, LogicalOp, UnaryOp};
pub use eval::{evaluate, EvalContext};
pub use library::{Arity, Function};
pub use parser::{parse, MAX_DEPTH, MAX_EXPRESSION_LEN};

use crate::domain::value_objects::{FieldId, Value, ValueMap};

/// Malformed expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct ParseError {
    pub message: String,
    /// Character offset into the source
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Failure while evaluating a well-formed expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("'{context}' cannot use a null value")]
    NullOperand { context: &'static str },

    #[error("'{context}' expected a number, got '{text}'")]
    NotANumber { context: &'static str, text: String },

    #[error("'{context}' cannot use a {found} value")]
    TypeMismatch {
        context: &'static str,
        found: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("'{context}' produced a non-finite number")]
    NonFinite { context: &'static str },

    #[error("{function}: '{text}' is not a YYYY-MM-DD date")]
    InvalidDate { function: &'static str, text: String },

    #[error("{function}: {message}")]
    InvalidArgument {
        function: &'static str,
        message: String,
    },
}

/// A parsed expression together with its source text
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    ast: Expr,
}

impl Expression {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Ok(Self {
            source: source.to_string(),
            ast: parse(source)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Expr {
        &self.ast
    }

    /// Field ids the expression reads
    pub fn field_refs(&self) -> BTreeSet<FieldId> {
        self.ast.field_refs()
    }

    pub fn evaluate(&self, fields: &ValueMap, today: NaiveDate) -> Result<Value, EvalError> {
        evaluate(&self.ast, &EvalContext::new(fields, today))
    }
}

//! Tree-walking evaluator
//!
//! The only inputs an expression can observe are the values in its
//! `EvalContext` and the injected `today` date.

use std::cmp::Ordering;

use chrono::NaiveDate;

use super::ast::{BinaryOp, Expr, LogicalOp, UnaryOp};
use super::EvalError;
use crate::domain::value_objects::{format_number, Value, ValueMap};

/// Read-only sandbox an expression runs in
#[derive(Debug, Clone)]
pub struct EvalContext<'a> {
    fields: &'a ValueMap,
    today: NaiveDate,
}

impl<'a> EvalContext<'a> {
    pub fn new(fields: &'a ValueMap, today: NaiveDate) -> Self {
        Self { fields, today }
    }

    fn field(&self, id: &str) -> Value {
        self.fields.get(id).cloned().unwrap_or(Value::Null)
    }
}

pub fn evaluate(expr: &Expr, ctx: &EvalContext<'_>) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Field(id) => Ok(ctx.field(id.as_str())),
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, ctx)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                UnaryOp::Negate => Ok(Value::Number(-to_number(&value, "-")?)),
                UnaryOp::Plus => Ok(Value::Number(to_number(&value, "+")?)),
            }
        }
        Expr::Binary { op, left, right } => {
            let left = evaluate(left, ctx)?;
            let right = evaluate(right, ctx)?;
            binary(*op, &left, &right)
        }
        Expr::Logical { op, left, right } => {
            let left = evaluate(left, ctx)?;
            let short_circuit = match op {
                LogicalOp::And => !left.is_truthy(),
                LogicalOp::Or => left.is_truthy(),
                LogicalOp::Coalesce => left != Value::Null,
            };
            if short_circuit {
                Ok(left)
            } else {
                evaluate(right, ctx)
            }
        }
        Expr::Conditional {
            condition,
            then,
            otherwise,
        } => {
            if evaluate(condition, ctx)?.is_truthy() {
                evaluate(then, ctx)
            } else {
                evaluate(otherwise, ctx)
            }
        }
        Expr::Length(inner) => match evaluate(inner, ctx)? {
            Value::Text(s) => Ok(Value::Number(s.chars().count() as f64)),
            other => Err(EvalError::TypeMismatch {
                context: ".length",
                found: other.kind(),
            }),
        },
        Expr::Call { function, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            function.call(&args, ctx.today)
        }
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let symbol = op.symbol();
    let value = match op {
        BinaryOp::Add => {
            if matches!(left, Value::Text(_)) || matches!(right, Value::Text(_)) {
                Value::Text(format!("{}{}", concat_text(left), concat_text(right)))
            } else {
                let sum = to_number(left, symbol)? + to_number(right, symbol)?;
                Value::Number(finite(sum, symbol)?)
            }
        }
        BinaryOp::Sub => arithmetic(left, right, symbol, |a, b| a - b)?,
        BinaryOp::Mul => arithmetic(left, right, symbol, |a, b| a * b)?,
        BinaryOp::Div | BinaryOp::Rem => {
            let divisor = to_number(right, symbol)?;
            let dividend = to_number(left, symbol)?;
            if divisor == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            let result = if op == BinaryOp::Div {
                dividend / divisor
            } else {
                dividend % divisor
            };
            Value::Number(finite(result, symbol)?)
        }
        BinaryOp::Eq => Value::Bool(loose_eq(left, right)),
        BinaryOp::NotEq => Value::Bool(!loose_eq(left, right)),
        BinaryOp::StrictEq => Value::Bool(left == right),
        BinaryOp::StrictNotEq => Value::Bool(left != right),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare(left, right, symbol)?;
            Value::Bool(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            })
        }
    };
    Ok(value)
}

fn arithmetic(
    left: &Value,
    right: &Value,
    symbol: &'static str,
    apply: impl Fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    let result = apply(to_number(left, symbol)?, to_number(right, symbol)?);
    Ok(Value::Number(finite(result, symbol)?))
}

fn concat_text(value: &Value) -> String {
    match value {
        Value::Number(n) => format_number(*n),
        other => other.to_string(),
    }
}

/// Equality that lets numeric text and booleans meet numbers halfway
fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Text(a), Value::Text(b)) => a == b,
        _ => match (to_number(left, "=="), to_number(right, "==")) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        },
    }
}

fn compare(left: &Value, right: &Value, symbol: &'static str) -> Result<Ordering, EvalError> {
    if let (Value::Text(a), Value::Text(b)) = (left, right) {
        return Ok(a.cmp(b));
    }
    let a = to_number(left, symbol)?;
    let b = to_number(right, symbol)?;
    a.partial_cmp(&b).ok_or(EvalError::NonFinite { context: symbol })
}

/// Numeric view of a value; null and non-numeric text are errors
pub fn to_number(value: &Value, context: &'static str) -> Result<f64, EvalError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<f64>() {
                Ok(n) if !trimmed.is_empty() && n.is_finite() => Ok(n),
                _ => Err(EvalError::NotANumber {
                    context,
                    text: s.clone(),
                }),
            }
        }
        Value::Null => Err(EvalError::NullOperand { context }),
    }
}

pub fn finite(n: f64, context: &'static str) -> Result<f64, EvalError> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(EvalError::NonFinite { context })
    }
}

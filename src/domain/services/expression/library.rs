//! The allow-listed function library
//!
//! Nothing outside this table is callable from an expression. Functions are
//! resolved and arity-checked at parse time, so evaluation never sees an
//! unknown name.

use chrono::{Datelike, Duration, NaiveDate};

use super::eval::{finite, to_number};
use super::EvalError;
use crate::domain::value_objects::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    // Math.*
    Abs,
    Round,
    Floor,
    Ceil,
    Trunc,
    Sign,
    Sqrt,
    Pow,
    Min,
    Max,
    // conversions and text
    ToNumber,
    ToText,
    Len,
    Upper,
    Lower,
    Trim,
    Concat,
    IsEmpty,
    RoundTo,
    // dates
    Today,
    CurrentYear,
    Year,
    Month,
    Day,
    AgeInYears,
    DaysBetween,
    AddDays,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exact(k) => n == k,
            Arity::Range(lo, hi) => (lo..=hi).contains(&n),
            Arity::AtLeast(lo) => n >= lo,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exact(k) => write!(f, "{}", k),
            Arity::Range(lo, hi) => write!(f, "{} to {}", lo, hi),
            Arity::AtLeast(lo) => write!(f, "at least {}", lo),
        }
    }
}

/// Constants reachable as `Math.<NAME>`
pub fn math_constant(name: &str) -> Option<f64> {
    match name {
        "PI" => Some(std::f64::consts::PI),
        "E" => Some(std::f64::consts::E),
        _ => None,
    }
}

impl Function {
    /// Resolve `Math.<name>`
    pub fn math(name: &str) -> Option<Self> {
        Some(match name {
            "abs" => Function::Abs,
            "round" => Function::Round,
            "floor" => Function::Floor,
            "ceil" => Function::Ceil,
            "trunc" => Function::Trunc,
            "sign" => Function::Sign,
            "sqrt" => Function::Sqrt,
            "pow" => Function::Pow,
            "min" => Function::Min,
            "max" => Function::Max,
            _ => return None,
        })
    }

    /// Resolve a bare function name
    pub fn global(name: &str) -> Option<Self> {
        Some(match name {
            "Number" => Function::ToNumber,
            "String" => Function::ToText,
            "len" => Function::Len,
            "upper" => Function::Upper,
            "lower" => Function::Lower,
            "trim" => Function::Trim,
            "concat" => Function::Concat,
            "isEmpty" => Function::IsEmpty,
            "round" => Function::RoundTo,
            "today" => Function::Today,
            "currentYear" => Function::CurrentYear,
            "year" => Function::Year,
            "month" => Function::Month,
            "day" => Function::Day,
            "ageInYears" => Function::AgeInYears,
            "daysBetween" => Function::DaysBetween,
            "addDays" => Function::AddDays,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Abs => "Math.abs",
            Function::Round => "Math.round",
            Function::Floor => "Math.floor",
            Function::Ceil => "Math.ceil",
            Function::Trunc => "Math.trunc",
            Function::Sign => "Math.sign",
            Function::Sqrt => "Math.sqrt",
            Function::Pow => "Math.pow",
            Function::Min => "Math.min",
            Function::Max => "Math.max",
            Function::ToNumber => "Number",
            Function::ToText => "String",
            Function::Len => "len",
            Function::Upper => "upper",
            Function::Lower => "lower",
            Function::Trim => "trim",
            Function::Concat => "concat",
            Function::IsEmpty => "isEmpty",
            Function::RoundTo => "round",
            Function::Today => "today",
            Function::CurrentYear => "currentYear",
            Function::Year => "year",
            Function::Month => "month",
            Function::Day => "day",
            Function::AgeInYears => "ageInYears",
            Function::DaysBetween => "daysBetween",
            Function::AddDays => "addDays",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Function::Today | Function::CurrentYear => Arity::Exact(0),
            Function::Pow | Function::DaysBetween | Function::AddDays => Arity::Exact(2),
            Function::Min | Function::Max => Arity::AtLeast(1),
            Function::Concat => Arity::AtLeast(0),
            Function::RoundTo => Arity::Range(1, 2),
            _ => Arity::Exact(1),
        }
    }

    /// Apply to already-evaluated arguments; arity has been checked by the parser
    pub fn call(&self, args: &[Value], today: NaiveDate) -> Result<Value, EvalError> {
        let name = self.name();
        let arg = |i: usize| args.get(i).unwrap_or(&Value::Null);
        let num = |i: usize| to_number(arg(i), name);

        let value = match self {
            Function::Abs => Value::Number(num(0)?.abs()),
            // Half-up rounding, as scripting runtimes do
            Function::Round => Value::Number((num(0)? + 0.5).floor()),
            Function::Floor => Value::Number(num(0)?.floor()),
            Function::Ceil => Value::Number(num(0)?.ceil()),
            Function::Trunc => Value::Number(num(0)?.trunc()),
            Function::Sign => {
                let n = num(0)?;
                Value::Number(if n == 0.0 { 0.0 } else { n.signum() })
            }
            Function::Sqrt => {
                let n = num(0)?;
                if n < 0.0 {
                    return Err(EvalError::InvalidArgument {
                        function: name,
                        message: "square root of a negative number".to_string(),
                    });
                }
                Value::Number(n.sqrt())
            }
            Function::Pow => Value::Number(finite(num(0)?.powf(num(1)?), name)?),
            Function::Min | Function::Max => {
                let mut acc = num(0)?;
                for i in 1..args.len() {
                    let n = num(i)?;
                    acc = if *self == Function::Min {
                        acc.min(n)
                    } else {
                        acc.max(n)
                    };
                }
                Value::Number(acc)
            }
            Function::ToNumber => Value::Number(num(0)?),
            Function::ToText => Value::Text(arg(0).to_string()),
            Function::Len => Value::Number(display(arg(0)).chars().count() as f64),
            Function::Upper => Value::Text(display(arg(0)).to_uppercase()),
            Function::Lower => Value::Text(display(arg(0)).to_lowercase()),
            Function::Trim => Value::Text(display(arg(0)).trim().to_string()),
            Function::Concat => Value::Text(args.iter().map(display).collect()),
            Function::IsEmpty => Value::Bool(arg(0).is_empty()),
            Function::RoundTo => {
                let n = num(0)?;
                let digits = if args.len() > 1 { num(1)? } else { 0.0 };
                if !(0.0..=12.0).contains(&digits) {
                    return Err(EvalError::InvalidArgument {
                        function: name,
                        message: format!("digits must be between 0 and 12, got {}", digits),
                    });
                }
                let factor = 10f64.powi(digits as i32);
                Value::Number((n * factor).round() / factor)
            }
            Function::Today => Value::Text(today.format("%Y-%m-%d").to_string()),
            Function::CurrentYear => Value::Number(today.year() as f64),
            Function::Year => Value::Number(to_date(arg(0), name)?.year() as f64),
            Function::Month => Value::Number(to_date(arg(0), name)?.month() as f64),
            Function::Day => Value::Number(to_date(arg(0), name)?.day() as f64),
            Function::AgeInYears => {
                let born = to_date(arg(0), name)?;
                let mut years = today.year() - born.year();
                if (today.month(), today.day()) < (born.month(), born.day()) {
                    years -= 1;
                }
                Value::Number(years as f64)
            }
            Function::DaysBetween => {
                let from = to_date(arg(0), name)?;
                let to = to_date(arg(1), name)?;
                Value::Number((to - from).num_days() as f64)
            }
            Function::AddDays => {
                let date = to_date(arg(0), name)?;
                let days = num(1)?;
                if days.fract() != 0.0 || days.abs() > 1_000_000.0 {
                    return Err(EvalError::InvalidArgument {
                        function: name,
                        message: format!("day offset must be a whole number, got {}", days),
                    });
                }
                let shifted = date
                    .checked_add_signed(Duration::days(days as i64))
                    .ok_or_else(|| EvalError::InvalidArgument {
                        function: name,
                        message: "date out of range".to_string(),
                    })?;
                Value::Text(shifted.format("%Y-%m-%d").to_string())
            }
        };
        Ok(value)
    }
}

/// Text form used by string helpers; null renders as empty
fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse `YYYY-MM-DD`, also accepting a full timestamp with that prefix
pub fn to_date(value: &Value, function: &'static str) -> Result<NaiveDate, EvalError> {
    let text = match value {
        Value::Text(s) => s.trim(),
        other => {
            return Err(EvalError::TypeMismatch {
                context: function,
                found: other.kind(),
            })
        }
    };
    let prefix = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").map_err(|_| EvalError::InvalidDate {
        function,
        text: text.to_string(),
    })
}

//! Expression syntax tree

use std::collections::BTreeSet;

use super::library::Function;
use crate::domain::value_objects::{FieldId, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

/// Short-circuiting operators; they yield an operand, not a boolean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Coalesce,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    /// `fields['id']`
    Field(FieldId),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// `<expr>.length`
    Length(Box<Expr>),
    Call {
        function: Function,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Field ids the expression reads, deduplicated and sorted
    pub fn field_refs(&self) -> BTreeSet<FieldId> {
        let mut refs = BTreeSet::new();
        self.collect_refs(&mut refs);
        refs
    }

    fn collect_refs(&self, refs: &mut BTreeSet<FieldId>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Field(id) => {
                refs.insert(id.clone());
            }
            Expr::Unary { operand, .. } | Expr::Length(operand) => operand.collect_refs(refs),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                left.collect_refs(refs);
                right.collect_refs(refs);
            }
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                condition.collect_refs(refs);
                then.collect_refs(refs);
                otherwise.collect_refs(refs);
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.collect_refs(refs);
                }
            }
        }
    }
}

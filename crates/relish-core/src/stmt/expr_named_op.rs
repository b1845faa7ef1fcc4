use super::{Expr, Value};

/// A named operator applied to an expression and a literal: `like`, `ilike`,
/// `similar to`, or any other operator the backend understands. Produced
/// from operator-call filter values such as `like("%john%")`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNamedOp {
    /// The expression the operator applies to.
    pub expr: Box<Expr>,

    /// The operator name, passed through to the backend.
    pub op: String,

    /// The operand literal.
    pub value: Value,
}

impl Expr {
    pub fn named_op(expr: impl Into<Self>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        ExprNamedOp {
            expr: Box::new(expr.into()),
            op: op.into(),
            value: value.into(),
        }
        .into()
    }
}

impl From<ExprNamedOp> for Expr {
    fn from(value: ExprNamedOp) -> Self {
        Self::NamedOp(value)
    }
}

use super::*;
use crate::schema::FieldId;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of conditions
    And(ExprAnd),

    /// Binary comparison between two expressions
    BinaryOp(ExprBinaryOp),

    /// References a field (column) of a model
    Field(ExprField),

    /// Zero-or-more-argument function applied to an expression, used by
    /// sort-key transforms
    Func(ExprFunc),

    /// Set membership
    InList(ExprInList),

    /// Whether an expression is (or is not) null. Kept separate from binary
    /// comparison because of how databases treat null comparisons.
    IsNull(ExprIsNull),

    /// Column-equality predicate connecting a relation's source and target
    /// tables; appended to the filter list so the planner connects them
    Join(ExprJoin),

    /// Named operator applied to a field and a literal (`like`, `ilike`, or
    /// any backend-specific operator)
    NamedOp(ExprNamedOp),

    /// OR a set of conditions
    Or(ExprOr),

    /// Evaluates to a constant value
    Value(Value),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// Is a value that evaluates to null
    pub fn is_value_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// Returns true if the expression is a constant value.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(..))
    }

    pub fn is_join(&self) -> bool {
        matches!(self, Self::Join(..))
    }

    pub fn is_binary_op(&self) -> bool {
        matches!(self, Self::BinaryOp(..))
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Value(value) => value,
            _ => panic!("expected value expression, but was {self:?}"),
        }
    }

    /// Collects the fields this condition constrains: the left-hand side of
    /// every leaf comparison, recursing through boolean combinators. Join
    /// predicates constrain nothing a client asked for and are skipped.
    pub fn constrained_fields(&self, out: &mut Vec<FieldId>) {
        match self {
            Self::And(expr) => expr.operands.iter().for_each(|e| e.constrained_fields(out)),
            Self::Or(expr) => expr.operands.iter().for_each(|e| e.constrained_fields(out)),
            Self::BinaryOp(expr) => expr.lhs.constrained_fields(out),
            Self::InList(expr) => expr.expr.constrained_fields(out),
            Self::IsNull(expr) => expr.expr.constrained_fields(out),
            Self::NamedOp(expr) => expr.expr.constrained_fields(out),
            Self::Func(expr) => expr.args.iter().for_each(|e| e.constrained_fields(out)),
            Self::Field(expr) => out.push(expr.field),
            Self::Join(_) | Self::Value(_) => {}
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

use super::Expr;
use crate::schema::FieldId;

/// References a field (column) of a model in the statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprField {
    pub field: FieldId,
}

impl Expr {
    pub fn field(field: impl Into<FieldId>) -> Self {
        ExprField {
            field: field.into(),
        }
        .into()
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Self::Field(..))
    }

    pub fn as_field(&self) -> Option<FieldId> {
        match self {
            Self::Field(expr) => Some(expr.field),
            _ => None,
        }
    }
}

impl From<ExprField> for Expr {
    fn from(value: ExprField) -> Self {
        Self::Field(value)
    }
}

impl From<FieldId> for Expr {
    fn from(value: FieldId) -> Self {
        Self::field(value)
    }
}

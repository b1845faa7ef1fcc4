use super::Expr;
use crate::schema::FieldId;

/// A column-equality predicate connecting a relation's source and target
/// tables. Emitted by the attribute-path resolver and appended to the flat
/// filter list in traversal order; duplicates are tolerated, never merged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprJoin {
    /// Column on the relation's source side
    pub source: FieldId,

    /// Column on the relation's target side
    pub target: FieldId,

    /// True for the join-table leg of a many-to-many relation
    pub secondary: bool,
}

impl Expr {
    pub fn join(source: impl Into<FieldId>, target: impl Into<FieldId>) -> Self {
        ExprJoin {
            source: source.into(),
            target: target.into(),
            secondary: false,
        }
        .into()
    }

    pub fn secondary_join(source: impl Into<FieldId>, target: impl Into<FieldId>) -> Self {
        ExprJoin {
            source: source.into(),
            target: target.into(),
            secondary: true,
        }
        .into()
    }
}

impl From<ExprJoin> for Expr {
    fn from(value: ExprJoin) -> Self {
        Self::Join(value)
    }
}

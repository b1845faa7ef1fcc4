use crate::schema::{FieldId, FieldTy, Model, ModelId, Schema};
use crate::stmt;

/// A single-valued relation: this model carries a foreign key referencing
/// the target model's primary key.
#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Model the relation points at
    pub target: ModelId,

    /// The scalar field on the owning model holding the foreign key
    pub foreign_key: FieldId,

    /// The `HasMany` association that pairs with this, if any
    pub pair: Option<FieldId>,
}

impl BelongsTo {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }

    /// The column a filter on this relation compares against: the remote
    /// primary key.
    pub fn remote_column(&self, schema: &Schema) -> FieldId {
        self.target(schema).primary_key
    }

    /// The join predicate connecting the owning table to the target table.
    pub fn primary_join(&self, schema: &Schema) -> stmt::Expr {
        stmt::Expr::join(self.foreign_key, self.target(schema).primary_key)
    }

    /// Join predicates contributed when an attribute path traverses this
    /// relation. Single-valued relations never have a secondary join.
    pub fn join_exprs(&self, schema: &Schema, _source: &Model) -> Vec<stmt::Expr> {
        vec![self.primary_join(schema)]
    }
}

impl From<BelongsTo> for FieldTy {
    fn from(value: BelongsTo) -> Self {
        Self::BelongsTo(value)
    }
}

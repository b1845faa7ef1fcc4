use crate::schema::{BelongsTo, FieldId, FieldTy, Model, ModelId, Schema};
use crate::stmt;

/// A multi-valued relation. Plain one-to-many relations pair with a
/// `BelongsTo` on the target; many-to-many relations are mediated by a
/// join-table model described by [`Through`].
#[derive(Debug, Clone)]
pub struct HasMany {
    /// Associated model
    pub target: ModelId,

    /// The `BelongsTo` association on the target that pairs with this.
    /// Left as a placeholder until the schema builder links relations, and
    /// unused when `through` is set.
    pub pair: FieldId,

    /// Join-table mediation for many-to-many relations
    pub through: Option<Through>,
}

/// Describes the join table of a many-to-many relation.
#[derive(Debug, Clone)]
pub struct Through {
    /// The model mapped to the join table
    pub model: ModelId,

    /// Scalar field on the join model referencing the owning model's
    /// primary key
    pub source: FieldId,

    /// Scalar field on the join model referencing the target model's
    /// primary key
    pub target: FieldId,
}

impl HasMany {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }

    pub fn pair<'a>(&self, schema: &'a Schema) -> &'a BelongsTo {
        schema.field(self.pair).ty.expect_belongs_to()
    }

    pub fn is_many_to_many(&self) -> bool {
        self.through.is_some()
    }

    /// The column a filter on this relation compares against: the remote
    /// primary key.
    pub fn remote_column(&self, schema: &Schema) -> FieldId {
        self.target(schema).primary_key
    }

    /// Join predicates contributed when an attribute path traverses this
    /// relation, in traversal order. Many-to-many relations contribute the
    /// primary join into the join table and the secondary join out of it.
    pub fn join_exprs(&self, schema: &Schema, source: &Model) -> Vec<stmt::Expr> {
        match &self.through {
            Some(through) => vec![
                stmt::Expr::join(source.primary_key, through.source),
                stmt::Expr::secondary_join(through.target, self.target(schema).primary_key),
            ],
            None => {
                let fk = self.pair(schema).foreign_key;
                vec![stmt::Expr::join(source.primary_key, fk)]
            }
        }
    }
}

impl From<HasMany> for FieldTy {
    fn from(value: HasMany) -> Self {
        Self::HasMany(value)
    }
}

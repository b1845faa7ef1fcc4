use crate::schema::{Field, FieldId, FieldTy, HasMany, Schema};
use crate::Result;

/// A virtual attribute exposing one attribute of the rows reachable through
/// a `HasMany` on the same model.
#[derive(Debug, Clone)]
pub struct AssociationProxy {
    /// The `HasMany` field on the owning model the proxy reads through
    pub through: FieldId,

    /// The attribute exposed on the relation's target model
    pub attr: String,
}

impl AssociationProxy {
    pub fn has_many<'a>(&self, schema: &'a Schema) -> &'a HasMany {
        schema.field(self.through).ty.expect_has_many()
    }

    /// The proxied field on the remote model.
    pub fn target_field<'a>(&self, schema: &'a Schema) -> Result<&'a Field> {
        let target = self.has_many(schema).target(schema);
        target.field_by_name(&self.attr).ok_or_else(|| {
            crate::Error::unknown_attribute(target.name.upper_camel_case(), self.attr.clone())
        })
    }
}

impl From<AssociationProxy> for FieldTy {
    fn from(value: AssociationProxy) -> Self {
        Self::AssociationProxy(value)
    }
}

mod builder;
pub use builder::Builder;

mod field;
pub use field::{Field, FieldId, FieldName, FieldScalar, FieldTy};

mod model;
pub use model::{Model, ModelId};

mod name;
pub use name::Name;

pub mod relation;
pub use relation::{AssociationProxy, BelongsTo, HasMany, Through};

mod resource;
pub use resource::{AllowedFilters, Resource};

use crate::stmt;
use indexmap::IndexMap;

/// RFC 1123, the format HTTP dates travel in. Used to auto-detect date
/// literals in filter strings unless the builder overrides it.
pub const DEFAULT_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Default)]
pub struct Schema {
    /// All registered models, keyed by id.
    pub models: IndexMap<ModelId, Model>,

    /// Resource endpoints, keyed by resource name.
    pub resources: IndexMap<String, Resource>,

    /// strftime-style format used when probing string literals for dates.
    pub date_format: String,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Get a model by ID
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    /// Get a field by ID
    pub fn field(&self, id: FieldId) -> &Field {
        self.model(id.model).field(id)
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    pub fn resource(&self, name: &str) -> crate::Result<&Resource> {
        self.resources
            .get(name)
            .ok_or_else(|| crate::err!("unknown resource `{name}`"))
    }

    /// Try to parse a string literal as a date using the schema's date
    /// format. Falls back to `None` so callers keep the plain string.
    pub fn str_to_date(&self, src: &str) -> Option<stmt::Value> {
        chrono::NaiveDateTime::parse_from_str(src, &self.date_format)
            .ok()
            .map(stmt::Value::DateTime)
    }
}

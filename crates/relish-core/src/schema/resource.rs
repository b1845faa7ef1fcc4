use super::{Field, Model, ModelId, Schema};
use crate::{stmt, Result};

/// Per-endpoint configuration the request orchestrator consults: which model
/// backs the resource, its identifier field, which fields may be filtered
/// on, soft-delete and freshness flags, and the schema-declared defaults
/// merged into every query.
#[derive(Debug, Clone)]
pub struct Resource {
    /// Endpoint name, e.g. `"invoices"`
    pub name: String,

    /// Model backing the resource
    pub model: ModelId,

    /// Identifier field name; immutable after creation
    pub id_field: String,

    /// Fields clients may filter on
    pub allowed_filters: AllowedFilters,

    /// Soft-delete flag field; rows with the flag set are excluded from
    /// default queries
    pub soft_delete: Option<String>,

    /// Freshness field compared against `If-Modified-Since`
    pub last_updated: Option<String>,

    /// Schema-declared filter merged into every query, in either filter
    /// syntax
    pub default_filter: Option<String>,

    /// Sort applied when the client supplies none
    pub default_sort: Vec<(String, stmt::Direction)>,

    /// Fields returned by default; empty means all scalar fields
    pub projection: Vec<String>,

    /// Names the connection pool serving this resource; `None` uses the
    /// default pool
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub enum AllowedFilters {
    /// Any field may be filtered on (`"*"` in the original configuration)
    #[default]
    Any,

    /// Only the named fields may be filtered on
    Only(Vec<String>),
}

impl Resource {
    pub fn new(name: impl Into<String>, model: impl Into<ModelId>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            id_field: "id".to_string(),
            allowed_filters: AllowedFilters::Any,
            soft_delete: None,
            last_updated: None,
            default_filter: None,
            default_sort: vec![],
            projection: vec![],
            prefix: None,
        }
    }

    pub fn id_field(mut self, name: impl Into<String>) -> Self {
        self.id_field = name.into();
        self
    }

    pub fn allowed_filters(mut self, filters: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allowed_filters = AllowedFilters::Only(filters.into_iter().map(Into::into).collect());
        self
    }

    pub fn soft_delete(mut self, field: impl Into<String>) -> Self {
        self.soft_delete = Some(field.into());
        self
    }

    pub fn last_updated(mut self, field: impl Into<String>) -> Self {
        self.last_updated = Some(field.into());
        self
    }

    pub fn default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = Some(filter.into());
        self
    }

    pub fn default_sort(mut self, field: impl Into<String>, direction: stmt::Direction) -> Self {
        self.default_sort.push((field.into(), direction));
        self
    }

    pub fn projection(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.projection = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn model<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.model)
    }

    pub fn id_field_of<'a>(&self, schema: &'a Schema) -> Result<&'a Field> {
        let model = self.model(schema);
        model.field_by_name(&self.id_field).ok_or_else(|| {
            crate::Error::unknown_attribute(model.name.upper_camel_case(), self.id_field.clone())
        })
    }

    /// True if clients may filter on the named field.
    pub fn filter_allowed(&self, field: &str) -> bool {
        match &self.allowed_filters {
            AllowedFilters::Any => true,
            AllowedFilters::Only(fields) => fields.iter().any(|f| f == field),
        }
    }
}

impl AllowedFilters {
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

use super::Value;

/// The storage type of a scalar field, used for schema-driven coercion of
/// incoming document values.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Bool,
    DateTime,
    F64,
    I64,
    String,
}

impl Type {
    /// Coerce a JSON document value to this type. Strings coerce to dates
    /// when the field is date-typed and the text matches `date_format`.
    pub fn coerce(&self, src: &serde_json::Value, date_format: &str) -> Option<Value> {
        use serde_json::Value as Json;

        Some(match (self, src) {
            (_, Json::Null) => Value::Null,
            (Type::Bool, Json::Bool(v)) => Value::Bool(*v),
            (Type::I64, Json::Number(v)) => Value::I64(v.as_i64()?),
            (Type::F64, Json::Number(v)) => Value::F64(v.as_f64()?),
            (Type::String, Json::String(v)) => Value::String(v.clone()),
            (Type::DateTime, Json::String(v)) => Value::DateTime(
                chrono::NaiveDateTime::parse_from_str(v, date_format).ok()?,
            ),
            _ => return None,
        })
    }
}

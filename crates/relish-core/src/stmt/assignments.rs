use super::Value;
use crate::schema::FieldId;
use indexmap::IndexMap;

/// Field assignments for an insert or update, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignments {
    fields: IndexMap<FieldId, Value>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<FieldId>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: impl Into<FieldId>) -> Option<&Value> {
        self.fields.get(&field.into())
    }

    pub fn contains(&self, field: impl Into<FieldId>) -> bool {
        self.fields.contains_key(&field.into())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &Value)> + '_ {
        self.fields.iter().map(|(field, value)| (*field, value))
    }
}

impl IntoIterator for Assignments {
    type Item = (FieldId, Value);
    type IntoIter = indexmap::map::IntoIter<FieldId, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

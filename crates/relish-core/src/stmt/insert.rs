use super::Assignments;
use crate::schema::ModelId;

/// Insert one or more rows into a model's table.
#[derive(Debug, Clone)]
pub struct Insert {
    pub model: ModelId,
    pub rows: Vec<Assignments>,
}

impl Insert {
    pub fn new(model: impl Into<ModelId>, rows: Vec<Assignments>) -> Self {
        Self {
            model: model.into(),
            rows,
        }
    }
}

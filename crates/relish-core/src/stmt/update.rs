use super::{Assignments, Expr};
use crate::schema::ModelId;

/// Update the rows matching `filter`.
#[derive(Debug, Clone)]
pub struct Update {
    pub model: ModelId,
    pub filter: Vec<Expr>,
    pub assignments: Assignments,
}

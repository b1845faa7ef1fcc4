use super::Expr;
use crate::schema::ModelId;

/// Delete the rows matching `filter`.
#[derive(Debug, Clone)]
pub struct Delete {
    pub model: ModelId,
    pub filter: Vec<Expr>,
}

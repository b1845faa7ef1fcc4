use super::{Expr, Limit, OrderBy, Projection};
use crate::schema::ModelId;

/// A resolved read query: the target model, a flat condition list ANDed at
/// the top level (joins included in traversal order), the projection, the
/// resolved sort keys, and pagination.
#[derive(Debug, Clone)]
pub struct Select {
    /// The model rows are selected from
    pub model: ModelId,

    /// Conditions ANDed together. Compound OR/AND structure lives inside
    /// individual elements; the list itself is never nested.
    pub filter: Vec<Expr>,

    /// Field subset to return
    pub projection: Projection,

    /// Resolved sort keys, outermost first
    pub order_by: Option<OrderBy>,

    /// Pagination
    pub limit: Option<Limit>,
}

impl Select {
    pub fn new(model: impl Into<ModelId>) -> Self {
        Self {
            model: model.into(),
            filter: vec![],
            projection: Projection::All,
            order_by: None,
            limit: None,
        }
    }

    /// Flat concatenation of another condition list onto this one. No
    /// de-duplication or contradiction detection.
    pub fn combine(&mut self, conditions: Vec<Expr>) {
        self.filter.extend(conditions);
    }

    /// The same query without pagination, used for total counts.
    pub fn unpaginated(&self) -> Self {
        Self {
            limit: None,
            ..self.clone()
        }
    }
}

use super::{Direction, Expr};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    /// The expression to order by
    pub expr: Expr,

    /// Ascending or descending
    pub order: Direction,
}

impl OrderByExpr {
    /// Flips the direction by which the query is ordered.
    pub fn reverse(&mut self) {
        self.order = match self.order {
            Direction::Desc => Direction::Asc,
            Direction::Asc => Direction::Desc,
        }
    }
}

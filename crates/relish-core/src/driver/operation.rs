use crate::stmt;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Query rows, with pagination and projection applied
    Select(stmt::Select),

    /// Count the rows matching a query's filter
    Count(stmt::Select),

    /// Create new rows
    Insert(stmt::Insert),

    /// Update rows in place
    Update(stmt::Update),

    /// Delete rows
    Delete(stmt::Delete),
}

impl From<stmt::Select> for Operation {
    fn from(value: stmt::Select) -> Self {
        Self::Select(value)
    }
}

impl From<stmt::Insert> for Operation {
    fn from(value: stmt::Insert) -> Self {
        Self::Insert(value)
    }
}

impl From<stmt::Update> for Operation {
    fn from(value: stmt::Update) -> Self {
        Self::Update(value)
    }
}

impl From<stmt::Delete> for Operation {
    fn from(value: stmt::Delete) -> Self {
        Self::Delete(value)
    }
}

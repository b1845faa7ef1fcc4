use crate::stmt::Value;
use indexmap::IndexMap;

/// One row, as an ordered mapping of app-level field names to values.
pub type Record = IndexMap<String, Value>;

#[derive(Debug)]
pub enum Response {
    /// Rows produced by a select
    Rows(Vec<Record>),

    /// Result of a count operation
    Count(u64),

    /// Number of rows affected by a write, plus any driver-assigned
    /// identifiers in insertion order
    Written {
        affected: u64,
        identifiers: Vec<Value>,
    },
}

impl Response {
    pub fn into_rows(self) -> crate::Result<Vec<Record>> {
        match self {
            Self::Rows(rows) => Ok(rows),
            other => Err(crate::err!("expected rows response, got {other:?}")),
        }
    }

    pub fn into_count(self) -> crate::Result<u64> {
        match self {
            Self::Count(count) => Ok(count),
            other => Err(crate::err!("expected count response, got {other:?}")),
        }
    }

    pub fn into_written(self) -> crate::Result<(u64, Vec<Value>)> {
        match self {
            Self::Written {
                affected,
                identifiers,
            } => Ok((affected, identifiers)),
            other => Err(crate::err!("expected write response, got {other:?}")),
        }
    }
}

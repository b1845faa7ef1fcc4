pub mod operation;
pub use operation::Operation;

mod response;
pub use response::{Record, Response};

use crate::{async_trait, schema::Schema};

use std::fmt::Debug;

/// Creates connections to one relational backend. SQL rendering,
/// transactions, and storage all live behind this boundary.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Open a new connection.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;
}

/// A single database connection executing resolved operations.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute an operation. Each write operation commits before returning.
    async fn execute(&mut self, schema: &Schema, operation: Operation) -> crate::Result<Response>;
}

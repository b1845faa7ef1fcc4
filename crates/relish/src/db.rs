mod builder;
pub use builder::Builder;

mod pool;
pub use pool::{Pool, PoolConnection};

/// Prefix of the pool used when a resource does not name one.
pub const DEFAULT_PREFIX: &str = "default";

//! Connection pooling for database connections.
//!
//! Pools are constructed once at startup by the [`Builder`] and owned by
//! the [`DataLayer`] for the life of the process. No connection state is
//! materialized lazily per request.
//!
//! [`Builder`]: crate::Builder
//! [`DataLayer`]: crate::DataLayer

use std::fmt;
use std::ops::{Deref, DerefMut};

use relish_core::driver::{Connection, Driver};

/// A connection pool over one configured backend.
pub struct Pool {
    inner: deadpool::managed::Pool<Manager>,
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool").finish_non_exhaustive()
    }
}

impl Pool {
    /// Creates a new connection pool from the given driver and eagerly
    /// opens one connection so misconfiguration fails at startup, not on
    /// the first request.
    pub async fn new(driver: impl Driver) -> crate::Result<Self> {
        Self::from_boxed(Box::new(driver)).await
    }

    pub(crate) async fn from_boxed(driver: Box<dyn Driver>) -> crate::Result<Self> {
        let inner = deadpool::managed::Pool::builder(Manager { driver })
            .runtime(deadpool::Runtime::Tokio1)
            .build()
            .map_err(relish_core::Error::connection_pool)?;

        inner
            .get()
            .await
            .map_err(relish_core::Error::connection_pool)?;

        Ok(Self { inner })
    }

    /// Retrieves a connection from the pool.
    pub async fn get(&self) -> crate::Result<PoolConnection> {
        let connection = self
            .inner
            .get()
            .await
            .map_err(relish_core::Error::connection_pool)?;
        Ok(PoolConnection { inner: connection })
    }

    /// Closes the pool. Outstanding connections are dropped as they are
    /// returned.
    pub fn close(&self) {
        self.inner.close();
    }
}

#[derive(Debug)]
struct Manager {
    driver: Box<dyn Driver>,
}

impl deadpool::managed::Manager for Manager {
    type Type = Box<dyn Connection>;
    type Error = crate::Error;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        self.driver.connect().await
    }

    async fn recycle(
        &self,
        _obj: &mut Self::Type,
        _metrics: &deadpool::managed::Metrics,
    ) -> deadpool::managed::RecycleResult<Self::Error> {
        Ok(())
    }
}

/// A connection retrieved from a pool.
///
/// When dropped, the connection is returned to the pool for reuse.
pub struct PoolConnection {
    inner: deadpool::managed::Object<Manager>,
}

impl Deref for PoolConnection {
    type Target = Box<dyn Connection>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

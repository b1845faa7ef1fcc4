use super::{Pool, DEFAULT_PREFIX};
use crate::DataLayer;
use relish_core::driver::Driver;
use relish_core::schema::{self, Model, Resource};

use indexmap::IndexMap;
use std::sync::Arc;

/// Assembles a [`DataLayer`]: registers models, resources, and one
/// connection per prefix, then verifies the schema and opens every pool up
/// front.
#[derive(Default)]
pub struct Builder {
    schema: schema::Builder,
    drivers: Vec<(String, Box<dyn Driver>)>,
}

impl Builder {
    pub fn model(&mut self, model: Model) -> &mut Self {
        self.schema.model(model);
        self
    }

    pub fn resource(&mut self, resource: Resource) -> &mut Self {
        self.schema.resource(resource);
        self
    }

    /// Overrides the strftime-style format used to auto-detect date
    /// literals in filter strings.
    pub fn date_format(&mut self, format: impl Into<String>) -> &mut Self {
        self.schema.date_format(format);
        self
    }

    /// Registers the default connection.
    pub fn connection(&mut self, driver: impl Driver) -> &mut Self {
        self.prefixed_connection(DEFAULT_PREFIX, driver)
    }

    /// Registers a connection under a named prefix, for resources served by
    /// a different database.
    pub fn prefixed_connection(&mut self, prefix: impl Into<String>, driver: impl Driver) -> &mut Self {
        self.drivers.push((prefix.into(), Box::new(driver)));
        self
    }

    pub async fn build(&mut self) -> crate::Result<DataLayer> {
        let schema = self.schema.build()?;

        if self.drivers.is_empty() {
            return Err(relish_core::err!(
                "no connection registered; call `connection()` before `build()`"
            ));
        }

        let mut pools = IndexMap::new();
        for (prefix, driver) in self.drivers.drain(..) {
            if pools.contains_key(&prefix) {
                return Err(relish_core::err!(
                    "two connections registered under prefix `{prefix}`"
                ));
            }
            let pool = Pool::from_boxed(driver).await?;
            pools.insert(prefix, pool);
        }

        for resource in schema.resources.values() {
            let prefix = resource.prefix.as_deref().unwrap_or(DEFAULT_PREFIX);
            if !pools.contains_key(prefix) {
                return Err(relish_core::Error::invalid_schema(format!(
                    "resource `{}` names connection prefix `{}`, which is not registered",
                    resource.name, prefix,
                )));
            }
        }

        Ok(DataLayer::new(Arc::new(schema), pools))
    }
}

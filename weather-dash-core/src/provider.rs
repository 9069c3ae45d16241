use crate::{Config, ReadingsTable, error::Result};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

pub use openmeteo::OpenMeteoClient;

/// Anything that can produce a fresh readings table for one dashboard cycle.
#[async_trait]
pub trait ReadingsSource: Send + Sync + Debug {
    async fn fetch(&self) -> Result<ReadingsTable>;
}

/// A source that always returns the same table. Useful for tests and offline demos.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    table: ReadingsTable,
}

impl StaticSource {
    pub fn new(table: ReadingsTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl ReadingsSource for StaticSource {
    async fn fetch(&self) -> Result<ReadingsTable> {
        Ok(self.table.clone())
    }
}

/// Construct the live Open-Meteo source from config.
pub fn source_from_config(config: &Config) -> Result<Box<dyn ReadingsSource>> {
    let client = OpenMeteoClient::new(&config.api)?;
    Ok(Box::new(client))
}

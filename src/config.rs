//! Pipeline configuration
//!
//! Every knob of a run (connection string, source table, column schema,
//! split fraction, seed, target, exclusions) travels in one explicit
//! [`PipelineConfig`] passed to [`crate::pipeline::run`]. Nothing is read
//! from globals or the environment.

use crate::model::ModelSpec;
use crate::schema::TableSchema;
use serde::{Deserialize, Serialize};

/// Default training share (80/20 split)
pub const DEFAULT_SPLIT_FRACTION: f64 = 0.8;

/// Default sampling seed
pub const DEFAULT_SEED: u64 = 1;

/// Configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    connection: String,
    table: String,
    schema: TableSchema,
    split_fraction: f64,
    seed: u64,
    target: String,
    excluded: Vec<String>,
}

impl PipelineConfig {
    /// Configuration with the default split fraction (0.8) and seed (1)
    #[must_use]
    pub fn new(
        connection: impl Into<String>,
        table: impl Into<String>,
        schema: TableSchema,
        target: impl Into<String>,
    ) -> Self {
        Self {
            connection: connection.into(),
            table: table.into(),
            schema,
            split_fraction: DEFAULT_SPLIT_FRACTION,
            seed: DEFAULT_SEED,
            target: target.into(),
            excluded: Vec::new(),
        }
    }

    /// Set the training share (must lie in `(0, 1)`; checked at split time)
    #[must_use]
    pub const fn with_split_fraction(mut self, fraction: f64) -> Self {
        self.split_fraction = fraction;
        self
    }

    /// Set the sampling seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Exclude a column from the feature set
    #[must_use]
    pub fn exclude(mut self, column: impl Into<String>) -> Self {
        self.excluded.push(column.into());
        self
    }

    /// Connection string, as supplied
    #[must_use]
    pub fn connection(&self) -> &str {
        &self.connection
    }

    /// Fully-qualified source table name
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Declared column schema
    #[must_use]
    pub const fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Training share
    #[must_use]
    pub const fn split_fraction(&self) -> f64 {
        self.split_fraction
    }

    /// Sampling seed
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Target column name
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Columns excluded from the feature set
    #[must_use]
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Model spec derived from target + exclusions
    #[must_use]
    pub fn model_spec(&self) -> ModelSpec {
        let mut spec = ModelSpec::new(&self.target);
        for column in &self.excluded {
            spec = spec.exclude(column);
        }
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::new("conn", "t", TableSchema::new(), "y");
        assert!((config.split_fraction() - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.seed(), 1);
        assert!(config.excluded().is_empty());
    }

    #[test]
    fn test_builder_overrides() {
        let config = PipelineConfig::new("conn", "t", TableSchema::new(), "y")
            .with_split_fraction(0.7)
            .with_seed(99)
            .exclude("Year")
            .exclude("Id");
        assert!((config.split_fraction() - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.seed(), 99);
        assert_eq!(config.excluded(), ["Year", "Id"]);
    }

    #[test]
    fn test_model_spec_carries_exclusions() {
        let config =
            PipelineConfig::new("conn", "t", TableSchema::new(), "RentalCount").exclude("Year");
        let spec = config.model_spec();
        assert_eq!(spec.target(), "RentalCount");
        assert_eq!(spec.excluded(), ["Year"]);
    }
}

//! Embedded table server over Arrow record batches
//!
//! The pipeline's data source issues its import query through the
//! [`SqlExecutor`] seam. In production that seam fronts a remote database; this
//! module provides the embedded implementation, a registry of named tables
//! held as Arrow batches, so the pipeline runs and tests end to end on a
//! single machine. Tables are registered from in-memory batches or loaded from
//! Parquet files; the only write operation is whole-table registration.

use crate::sql::QueryPlan;
use crate::{Error, Result};
use arrow::array::RecordBatch;
use arrow::datatypes::Schema;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Executes parsed import queries against some table store
///
/// The remote SQL server the connection string points at is an external
/// collaborator; implementations of this trait stand in for it.
pub trait SqlExecutor {
    /// Execute a plan, returning the matching record batches
    ///
    /// # Errors
    /// Returns an error if the table or a projected column does not exist.
    fn execute(&self, plan: &QueryPlan) -> Result<Vec<RecordBatch>>;
}

/// In-memory registry of named tables
pub struct TableRegistry {
    tables: HashMap<String, Vec<RecordBatch>>,
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Register a table from in-memory batches
    ///
    /// An empty batch list registers an empty table. All batches must share
    /// one schema.
    ///
    /// # Errors
    /// Returns [`Error::Storage`] on a schema mismatch between batches, or if
    /// the table name is already taken.
    pub fn register(&mut self, name: impl Into<String>, batches: Vec<RecordBatch>) -> Result<()> {
        let name = name.into();
        if self.tables.contains_key(&name) {
            return Err(Error::Storage(format!(
                "table '{name}' is already registered"
            )));
        }
        if let Some(first) = batches.first() {
            let schema = first.schema();
            for batch in &batches[1..] {
                if batch.schema() != schema {
                    return Err(Error::Storage(format!(
                        "schema mismatch in table '{name}': expected {:?}, got {:?}",
                        schema,
                        batch.schema()
                    )));
                }
            }
        }
        self.tables.insert(name, batches);
        Ok(())
    }

    /// Load a table from a Parquet file
    ///
    /// # Errors
    /// Returns [`Error::Storage`] if the file cannot be read or parsed.
    pub fn load_parquet<P: AsRef<Path>>(&mut self, name: impl Into<String>, path: P) -> Result<()> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
        use std::fs::File;

        let file = File::open(path.as_ref())
            .map_err(|e| Error::Storage(format!("failed to open Parquet file: {e}")))?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| Error::Storage(format!("failed to parse Parquet file: {e}")))?;

        let reader = builder
            .build()
            .map_err(|e| Error::Storage(format!("failed to create Parquet reader: {e}")))?;

        let mut batches = Vec::new();
        for batch in reader {
            let batch = batch
                .map_err(|e| Error::Storage(format!("failed to read record batch: {e}")))?;
            batches.push(batch);
        }

        self.register(name, batches)
    }

    /// Registered table names, unordered
    #[must_use]
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Batches of a registered table, if present
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&[RecordBatch]> {
        self.tables.get(name).map(Vec::as_slice)
    }

    /// Project a batch down to the named columns, in projection order
    fn project(batch: &RecordBatch, columns: &[String]) -> Result<RecordBatch> {
        let schema = batch.schema();
        let mut fields = Vec::with_capacity(columns.len());
        let mut arrays = Vec::with_capacity(columns.len());

        for name in columns {
            let Some((idx, field)) = schema.column_with_name(name) else {
                return Err(Error::Query(format!(
                    "column '{name}' not found in table schema"
                )));
            };
            fields.push(field.clone());
            arrays.push(batch.column(idx).clone());
        }

        let projected = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(projected)
    }
}

impl SqlExecutor for TableRegistry {
    fn execute(&self, plan: &QueryPlan) -> Result<Vec<RecordBatch>> {
        let batches = self.tables.get(&plan.table).ok_or_else(|| {
            let mut known = self.table_names();
            known.sort_unstable();
            Error::Query(format!(
                "table '{}' not found; registered tables: {known:?}",
                plan.table
            ))
        })?;

        if plan.is_wildcard() {
            return Ok(batches.clone());
        }

        batches
            .iter()
            .map(|batch| Self::project(batch, &plan.columns))
            .collect()
    }
}

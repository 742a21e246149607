//! Column typing for imported tables
//!
//! A [`TableSchema`] declares, in column order, how each source column is
//! typed: plain numerics, or factors restricted to an explicit level set.
//! The declaration drives both the Arrow schema of the materialized frame and
//! the validation applied to every imported batch, so bad remote data fails at
//! import time rather than deep inside the model fit.

use crate::{Error, Result};
use arrow::array::{Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Declared type of a single source column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// 32-bit integer column
    Integer,
    /// 64-bit floating point column
    Double,
    /// Categorical column restricted to an explicit, ordered set of levels
    Factor {
        /// Allowed textual levels, in declaration order
        levels: Vec<String>,
    },
}

impl ColumnType {
    /// Arrow data type this column materializes as
    #[must_use]
    pub const fn arrow_type(&self) -> DataType {
        match self {
            Self::Integer => DataType::Int32,
            Self::Double => DataType::Float64,
            Self::Factor { .. } => DataType::Utf8,
        }
    }

    /// Whether the column is directly usable as a numeric feature
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Double)
    }
}

/// Ordered mapping from column name to declared type
///
/// # Example
/// ```
/// use predecir::schema::TableSchema;
///
/// let schema = TableSchema::new()
///     .with_integer("Day")
///     .with_factor("Holiday", ["1", "0"]);
/// assert_eq!(schema.len(), 2);
/// assert!(schema.get("Holiday").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    columns: Vec<(String, ColumnType)>,
}

impl TableSchema {
    /// Create an empty schema
    #[must_use]
    pub const fn new() -> Self {
        Self { columns: Vec::new() }
    }

    /// Declare an integer column
    #[must_use]
    pub fn with_integer(mut self, name: impl Into<String>) -> Self {
        self.columns.push((name.into(), ColumnType::Integer));
        self
    }

    /// Declare a double-precision column
    #[must_use]
    pub fn with_double(mut self, name: impl Into<String>) -> Self {
        self.columns.push((name.into(), ColumnType::Double));
        self
    }

    /// Declare a factor column with its allowed levels, in order
    #[must_use]
    pub fn with_factor<I, S>(mut self, name: impl Into<String>, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let levels = levels.into_iter().map(Into::into).collect();
        self.columns
            .push((name.into(), ColumnType::Factor { levels }));
        self
    }

    /// Number of declared columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no columns are declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Declared type of a column, if present
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnType> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| ty)
    }

    /// Iterate over `(name, type)` pairs in declaration order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnType)> {
        self.columns.iter().map(|(n, ty)| (n.as_str(), ty))
    }

    /// Column names in declaration order
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Derive the Arrow schema of the materialized frame
    ///
    /// All declared columns are non-nullable: the importer rejects nulls, so
    /// downstream consumers never see them.
    #[must_use]
    pub fn to_arrow(&self) -> SchemaRef {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|(name, ty)| Field::new(name, ty.arrow_type(), false))
            .collect();
        Arc::new(Schema::new(fields))
    }

    /// Validate an imported batch against the declaration
    ///
    /// Checks, in order:
    /// - every declared column is present with the declared Arrow type
    /// - the batch carries no columns beyond the declaration
    /// - no declared column contains nulls
    /// - factor values all belong to their declared level set
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] naming the offending column (and value, for
    /// out-of-level factors).
    pub fn validate_batch(&self, batch: &RecordBatch) -> Result<()> {
        let batch_schema = batch.schema();

        for (name, ty) in self.columns() {
            let Some((idx, field)) = batch_schema.column_with_name(name) else {
                return Err(Error::Schema(format!(
                    "declared column '{name}' missing from imported data"
                )));
            };
            let expected = ty.arrow_type();
            if field.data_type() != &expected {
                return Err(Error::Schema(format!(
                    "column '{name}' has type {:?}, declared as {expected:?}",
                    field.data_type()
                )));
            }

            let column = batch.column(idx);
            if column.null_count() > 0 {
                return Err(Error::Schema(format!(
                    "column '{name}' contains {} null value(s); declared columns are non-nullable",
                    column.null_count()
                )));
            }

            if let ColumnType::Factor { levels } = ty {
                let values = column.as_any().downcast_ref::<StringArray>().ok_or_else(
                    || Error::Schema(format!("factor column '{name}' is not a string array")),
                )?;
                for i in 0..values.len() {
                    let value = values.value(i);
                    if !levels.iter().any(|l| l == value) {
                        return Err(Error::Schema(format!(
                            "factor column '{name}' row {i} has value '{value}' \
                             outside declared levels {levels:?}"
                        )));
                    }
                }
            }
        }

        for field in batch_schema.fields() {
            if self.get(field.name()).is_none() {
                return Err(Error::Schema(format!(
                    "imported column '{}' is not declared in the schema",
                    field.name()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int32Array, StringArray};

    fn rental_schema() -> TableSchema {
        TableSchema::new()
            .with_integer("Day")
            .with_factor("Holiday", ["1", "0"])
    }

    fn batch(days: Vec<i32>, holidays: Vec<&str>) -> RecordBatch {
        let schema = rental_schema().to_arrow();
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int32Array::from(days)),
                Arc::new(StringArray::from(holidays)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_arrow_type_mapping() {
        assert_eq!(ColumnType::Integer.arrow_type(), DataType::Int32);
        assert_eq!(ColumnType::Double.arrow_type(), DataType::Float64);
        let factor = ColumnType::Factor {
            levels: vec!["a".to_string()],
        };
        assert_eq!(factor.arrow_type(), DataType::Utf8);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let schema = rental_schema();
        assert_eq!(schema.column_names(), vec!["Day", "Holiday"]);
    }

    #[test]
    fn test_validate_clean_batch() {
        let schema = rental_schema();
        let batch = batch(vec![1, 2, 3], vec!["1", "0", "0"]);
        assert!(schema.validate_batch(&batch).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_level_factor() {
        let schema = rental_schema();
        let batch = batch(vec![1, 2], vec!["1", "5"]);
        let err = schema.validate_batch(&batch).unwrap_err();
        assert!(err.to_string().contains("outside declared levels"));
        assert!(err.to_string().contains("Holiday"));
    }

    #[test]
    fn test_validate_rejects_missing_column() {
        let schema = rental_schema().with_integer("Month");
        let batch = batch(vec![1], vec!["0"]);
        let err = schema.validate_batch(&batch).unwrap_err();
        assert!(err.to_string().contains("Month"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_validate_rejects_undeclared_column() {
        let schema = TableSchema::new().with_integer("Day");
        let batch = batch(vec![1], vec!["0"]);
        let err = schema.validate_batch(&batch).unwrap_err();
        assert!(err.to_string().contains("Holiday"));
        assert!(err.to_string().contains("not declared"));
    }

    #[test]
    fn test_validate_rejects_nulls() {
        let schema = TableSchema::new().with_factor("Holiday", ["1", "0"]);
        let arrow_schema = Arc::new(Schema::new(vec![Field::new(
            "Holiday",
            DataType::Utf8,
            true,
        )]));
        let batch = RecordBatch::try_new(
            arrow_schema,
            vec![Arc::new(StringArray::from(vec![Some("1"), None]))],
        )
        .unwrap();
        let err = schema.validate_batch(&batch).unwrap_err();
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn test_serde_round_trip() {
        let schema = rental_schema();
        let json = serde_json::to_string(&schema).unwrap();
        let back: TableSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, back);
    }
}

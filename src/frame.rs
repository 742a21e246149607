//! In-memory tabular dataset
//!
//! A [`DataFrame`] is the materialized result of an import: one combined Arrow
//! record batch in declared column order, paired with the [`TableSchema`] that
//! produced it. Frames are immutable once built; the splitter derives new
//! frames by row subsetting, and the model layer reads columns out as
//! `ndarray` structures.

use crate::schema::{ColumnType, TableSchema};
use crate::{Error, Result};
use arrow::array::{Array, Float64Array, Int32Array, RecordBatch, StringArray, UInt32Array};
use arrow::compute;
use ndarray::{Array1, Array2};
use std::fmt;

/// Rows shown by the `Display` preview before eliding
const PREVIEW_ROWS: usize = 10;

/// Numeric design matrix with expanded column names
///
/// Factor columns expand to indicator columns (`WeekDay=2`, ...); numeric
/// columns pass through under their own name. `columns.len()` always equals
/// `values.ncols()`.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    /// Expanded column names, in feature order
    pub columns: Vec<String>,
    /// Row-major matrix, one row per frame row
    pub values: Array2<f64>,
}

/// Immutable tabular dataset over Arrow columnar data
#[derive(Debug)]
pub struct DataFrame {
    schema: TableSchema,
    batch: RecordBatch,
}

impl DataFrame {
    /// Build a frame from imported batches
    ///
    /// Each batch is validated against the declaration, normalized to declared
    /// column order, and concatenated. An empty batch list yields an empty
    /// frame with the declared schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if any batch fails validation.
    pub fn new(schema: TableSchema, batches: Vec<RecordBatch>) -> Result<Self> {
        let arrow_schema = schema.to_arrow();

        let batch = if batches.is_empty() {
            RecordBatch::new_empty(arrow_schema)
        } else {
            let mut normalized = Vec::with_capacity(batches.len());
            for batch in &batches {
                schema.validate_batch(batch)?;
                let columns = schema
                    .column_names()
                    .iter()
                    .map(|name| {
                        let (idx, _) = batch
                            .schema()
                            .column_with_name(name)
                            .expect("validated column present");
                        batch.column(idx).clone()
                    })
                    .collect();
                normalized.push(RecordBatch::try_new(arrow_schema.clone(), columns)?);
            }
            compute::concat_batches(&arrow_schema, &normalized)?
        };

        Ok(Self { schema, batch })
    }

    /// Declared column schema
    #[must_use]
    pub const fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Underlying combined record batch
    #[must_use]
    pub const fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Number of rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of columns
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// `(rows, columns)` shape
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_columns())
    }

    /// Whether the frame holds no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Column names in declared order
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.column_names()
    }

    /// New frame holding the given rows, in index order
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] if any index is out of bounds.
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let num_rows = self.num_rows();
        let mut idx = Vec::with_capacity(indices.len());
        for &i in indices {
            if i >= num_rows {
                return Err(Error::Query(format!(
                    "row index {i} out of bounds for frame with {num_rows} rows"
                )));
            }
            idx.push(u32::try_from(i).map_err(|_| {
                Error::Query(format!("row index {i} exceeds u32 range"))
            })?);
        }
        let idx = UInt32Array::from(idx);

        let columns = self
            .batch
            .columns()
            .iter()
            .map(|column| compute::take(column.as_ref(), &idx, None))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let batch = RecordBatch::try_new(self.batch.schema(), columns)?;

        Ok(Self {
            schema: self.schema.clone(),
            batch,
        })
    }

    /// Extract a numeric column as `f64` values, in row order
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] for unknown columns and for factor columns;
    /// factors carry textual levels and must go through
    /// [`design_matrix`](Self::design_matrix) encoding instead.
    pub fn numeric_column(&self, name: &str) -> Result<Array1<f64>> {
        let ty = self.schema.get(name).ok_or_else(|| {
            Error::Schema(format!("unknown column '{name}'"))
        })?;
        let (idx, _) = self
            .batch
            .schema()
            .column_with_name(name)
            .expect("schema and batch stay in sync");
        let column = self.batch.column(idx);

        match ty {
            ColumnType::Integer => {
                let values = column
                    .as_any()
                    .downcast_ref::<Int32Array>()
                    .expect("integer column is Int32");
                Ok(values.values().iter().map(|&v| f64::from(v)).collect())
            }
            ColumnType::Double => {
                let values = column
                    .as_any()
                    .downcast_ref::<Float64Array>()
                    .expect("double column is Float64");
                Ok(values.values().iter().copied().collect())
            }
            ColumnType::Factor { .. } => Err(Error::Schema(format!(
                "column '{name}' is a factor; factors are one-hot encoded, not read as numeric"
            ))),
        }
    }

    /// Build the numeric design matrix for the given feature columns
    ///
    /// Numeric features contribute one column each. A factor with k declared
    /// levels contributes k-1 indicator columns named `feature=level`. The
    /// first declared level is the reference and has no column, which keeps
    /// the matrix full-rank alongside a fitted intercept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] for unknown feature columns.
    pub fn design_matrix(&self, features: &[String]) -> Result<DesignMatrix> {
        let mut columns = Vec::new();
        for name in features {
            match self.schema.get(name) {
                None => {
                    return Err(Error::Schema(format!(
                        "unknown feature column '{name}'"
                    )))
                }
                Some(ColumnType::Integer | ColumnType::Double) => columns.push(name.clone()),
                Some(ColumnType::Factor { levels }) => {
                    for level in levels.iter().skip(1) {
                        columns.push(format!("{name}={level}"));
                    }
                }
            }
        }

        let num_rows = self.num_rows();
        let mut values = Array2::<f64>::zeros((num_rows, columns.len()));
        let mut offset = 0;

        for name in features {
            match self.schema.get(name).expect("checked above") {
                ColumnType::Integer | ColumnType::Double => {
                    let column = self.numeric_column(name)?;
                    for (row, v) in column.iter().enumerate() {
                        values[[row, offset]] = *v;
                    }
                    offset += 1;
                }
                ColumnType::Factor { levels } => {
                    let (idx, _) = self
                        .batch
                        .schema()
                        .column_with_name(name)
                        .expect("schema and batch stay in sync");
                    let strings = self
                        .batch
                        .column(idx)
                        .as_any()
                        .downcast_ref::<StringArray>()
                        .expect("factor column is Utf8");
                    for row in 0..num_rows {
                        let value = strings.value(row);
                        let level = levels.iter().position(|l| l == value).ok_or_else(|| {
                            Error::Schema(format!(
                                "factor column '{name}' row {row} has unvalidated value '{value}'"
                            ))
                        })?;
                        if level > 0 {
                            values[[row, offset + level - 1]] = 1.0;
                        }
                    }
                    offset += levels.len().saturating_sub(1);
                }
            }
        }

        Ok(DesignMatrix { columns, values })
    }

    fn cell(&self, row: usize, col: usize) -> String {
        let column = self.batch.column(col);
        match column.data_type() {
            arrow::datatypes::DataType::Int32 => {
                let values = column
                    .as_any()
                    .downcast_ref::<Int32Array>()
                    .expect("Int32 column");
                values.value(row).to_string()
            }
            arrow::datatypes::DataType::Float64 => {
                let values = column
                    .as_any()
                    .downcast_ref::<Float64Array>()
                    .expect("Float64 column");
                format!("{:.3}", values.value(row))
            }
            _ => {
                let values = column
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .expect("Utf8 column");
                values.value(row).to_string()
            }
        }
    }
}

impl fmt::Display for DataFrame {
    /// Bounded preview: header plus the first rows, eliding the rest
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.column_names() {
            write!(f, "{name:>12}")?;
        }
        writeln!(f)?;

        let shown = self.num_rows().min(PREVIEW_ROWS);
        for row in 0..shown {
            for col in 0..self.num_columns() {
                write!(f, "{:>12}", self.cell(row, col))?;
            }
            writeln!(f)?;
        }
        if self.num_rows() > shown {
            writeln!(f, "... ({} more rows)", self.num_rows() - shown)?;
        }
        write!(f, "[{} rows x {} columns]", self.num_rows(), self.num_columns())
    }
}

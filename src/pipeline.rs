//! The straight-line regression pipeline
//!
//! One unit of work, executed top to bottom: connect → import → split → fit →
//! predict → score. No component has an independent lifecycle; everything runs
//! once, synchronously, in-process. Stage boundaries emit `tracing` events and
//! the outcome lands in a serializable [`PipelineReport`]. Errors are never
//! caught here; any stage failure propagates to the caller.

use crate::config::PipelineConfig;
use crate::metrics::mean_squared_error;
use crate::source::{DataSource, SqlTableSource};
use crate::split::train_test_split;
use crate::sql::SqlExecutor;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Source table the rows came from
    pub table: String,
    /// Rows materialized by the import
    pub imported_rows: usize,
    /// `(rows, columns)` of the training subset
    pub train_shape: (usize, usize),
    /// `(rows, columns)` of the test subset
    pub test_shape: (usize, usize),
    /// Fitted intercept
    pub intercept: f64,
    /// `(design column, coefficient)` pairs, in design order
    pub coefficients: Vec<(String, f64)>,
    /// Predictions for the test subset, in row order
    pub predictions: Vec<f64>,
    /// Mean squared error of the predictions against ground truth
    pub mean_squared_error: f64,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run
    pub finished_at: DateTime<Utc>,
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table: {} ({} rows imported)", self.table, self.imported_rows)?;
        writeln!(f, "Training set shape: {:?}", self.train_shape)?;
        writeln!(f, "Testing set shape: {:?}", self.test_shape)?;
        writeln!(f, "Intercept: {:.6}", self.intercept)?;
        for (column, coefficient) in &self.coefficients {
            writeln!(f, "  {column}: {coefficient:.6}")?;
        }
        writeln!(f, "Predictions: {:?}", self.predictions)?;
        write!(f, "Computed error: {:.6}", self.mean_squared_error)
    }
}

/// Run the full pipeline described by the configuration
///
/// The executor is the collaborator standing in for the remote SQL server the
/// connection string points at; pass a
/// [`TableRegistry`](crate::sql::TableRegistry) for embedded execution.
///
/// # Errors
///
/// Propagates the first failure of any stage: connection parsing, query
/// parse/execution, schema validation, split configuration, model fitting,
/// or evaluation.
pub fn run(config: &PipelineConfig, executor: &dyn SqlExecutor) -> Result<PipelineReport> {
    let started_at = Utc::now();

    let source = SqlTableSource::new(
        config.connection(),
        config.table(),
        config.schema().clone(),
        executor,
    )?;
    let frame = source.import()?;
    info!(
        table = config.table(),
        rows = frame.num_rows(),
        columns = frame.num_columns(),
        "imported table"
    );
    info!("data frame:\n{frame}");

    let (train, test) = train_test_split(&frame, config.split_fraction(), config.seed())?;
    info!(
        train_rows = train.num_rows(),
        test_rows = test.num_rows(),
        "split dataset"
    );

    let model = config.model_spec().fit(&train)?;
    info!(
        target = model.target(),
        design_columns = model.design_columns().len(),
        "fitted linear model"
    );

    let predictions = model.predict(&test)?;
    let actual = test.numeric_column(config.target())?;
    let mse = mean_squared_error(&predictions, &actual)?;
    info!(mse, predictions = predictions.len(), "evaluated model");

    Ok(PipelineReport {
        table: config.table().to_string(),
        imported_rows: frame.num_rows(),
        train_shape: train.shape(),
        test_shape: test.shape(),
        intercept: model.intercept(),
        coefficients: model.coefficients(),
        predictions: predictions.to_vec(),
        mean_squared_error: mse,
        started_at,
        finished_at: Utc::now(),
    })
}

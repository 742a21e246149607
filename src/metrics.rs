//! Evaluation metrics
//!
//! Pure numeric reductions over prediction/ground-truth pairs. No side
//! effects; reporting is the pipeline's job.

use crate::{Error, Result};
use ndarray::Array1;

/// Mean squared error between predictions and ground truth
///
/// Average of squared differences; always a finite non-negative scalar for
/// finite inputs.
///
/// # Errors
///
/// Returns [`Error::Evaluation`] when the lengths differ, and for empty
/// inputs: a mean over zero residuals would silently read as a perfect
/// model.
///
/// # Example
/// ```
/// use ndarray::array;
/// use predecir::metrics::mean_squared_error;
///
/// let mse = mean_squared_error(&array![1.0, 2.0], &array![1.0, 4.0])?;
/// assert!((mse - 2.0).abs() < f64::EPSILON);
/// # Ok::<(), predecir::Error>(())
/// ```
pub fn mean_squared_error(predicted: &Array1<f64>, actual: &Array1<f64>) -> Result<f64> {
    if predicted.len() != actual.len() {
        return Err(Error::Evaluation(format!(
            "length mismatch: {} predictions vs {} ground-truth values",
            predicted.len(),
            actual.len()
        )));
    }
    if predicted.is_empty() {
        return Err(Error::Evaluation(
            "cannot compute mean squared error over zero rows".to_string(),
        ));
    }

    let residuals = predicted - actual;
    let mse = residuals.mapv(|r| r * r).mean().expect("non-empty residuals");
    Ok(mse)
}

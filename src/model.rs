//! Ordinary least squares model fitting
//!
//! [`ModelSpec`] names a numeric target and the columns to leave out of the
//! features; every remaining declared column becomes a feature, factors via
//! one-hot encoding. The fit itself is `linfa-linear` OLS over an `ndarray`
//! design matrix. A [`FittedModel`] is immutable once fit and predicts with
//! the exact encoding the training frame used.

use crate::frame::{DataFrame, DesignMatrix};
use crate::schema::ColumnType;
use crate::{Error, Result};
use linfa::dataset::Dataset;
use linfa::traits::{Fit, Predict};
use linfa_linear::{FittedLinearRegression, LinearRegression};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// What to fit: target column plus columns excluded from the feature set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    target: String,
    excluded: Vec<String>,
}

impl ModelSpec {
    /// Spec predicting `target` from every other declared column
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            excluded: Vec::new(),
        }
    }

    /// Exclude a column from the feature set (identifier columns, leakage)
    #[must_use]
    pub fn exclude(mut self, column: impl Into<String>) -> Self {
        self.excluded.push(column.into());
        self
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

    /// Feature columns for a frame: declared columns minus target minus
    /// exclusions, in declaration order
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fit`] for a missing or non-numeric target,
    /// [`Error::Config`] for an excluded column the schema does not declare,
    /// and [`Error::Fit`] if no feature columns remain.
    pub fn resolve_features(&self, frame: &DataFrame) -> Result<Vec<String>> {
        match frame.schema().get(&self.target) {
            None => {
                return Err(Error::Fit(format!(
                    "target column '{}' is not declared in the schema",
                    self.target
                )))
            }
            Some(ColumnType::Factor { .. }) => {
                return Err(Error::Fit(format!(
                    "target column '{}' is a factor; linear regression needs a numeric target",
                    self.target
                )))
            }
            Some(_) => {}
        }

        for excluded in &self.excluded {
            if frame.schema().get(excluded).is_none() {
                return Err(Error::Config(format!(
                    "excluded column '{excluded}' is not declared in the schema"
                )));
            }
        }

        let features: Vec<String> = frame
            .column_names()
            .into_iter()
            .filter(|name| *name != self.target && !self.excluded.iter().any(|e| e == name))
            .map(String::from)
            .collect();

        if features.is_empty() {
            return Err(Error::Fit(
                "no feature columns remain after exclusions".to_string(),
            ));
        }

        Ok(features)
    }

    /// Fit an ordinary least squares model on the training frame
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fit`] for an empty training set, a degenerate design
    /// matrix, or a least squares failure; feature resolution errors pass
    /// through.
    pub fn fit(&self, train: &DataFrame) -> Result<FittedModel> {
        let features = self.resolve_features(train)?;

        if train.is_empty() {
            return Err(Error::Fit(format!(
                "training set is empty; cannot fit '{}'",
                self.target
            )));
        }

        let DesignMatrix { columns, values } = train.design_matrix(&features)?;
        if columns.is_empty() {
            return Err(Error::Fit(
                "design matrix has no columns; every feature encoded to nothing".to_string(),
            ));
        }

        let targets = train.numeric_column(&self.target)?;
        let dataset = Dataset::new(values, targets);
        let inner = LinearRegression::new()
            .fit(&dataset)
            .map_err(|e| Error::Fit(format!("least squares fit failed: {e}")))?;

        Ok(FittedModel {
            inner,
            features,
            design_columns: columns,
            target: self.target.clone(),
        })
    }
}

/// Immutable fitted linear model
#[derive(Debug)]
pub struct FittedModel {
    inner: FittedLinearRegression<f64>,
    features: Vec<String>,
    design_columns: Vec<String>,
    target: String,
}

impl FittedModel {
    /// Predictions for every row of the frame, in row order
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if the frame's feature encoding differs from
    /// the training frame's (different declared levels, missing columns).
    pub fn predict(&self, frame: &DataFrame) -> Result<Array1<f64>> {
        let design = frame.design_matrix(&self.features)?;
        if design.columns != self.design_columns {
            return Err(Error::Schema(format!(
                "frame encodes features as {:?}, model was trained on {:?}",
                design.columns, self.design_columns
            )));
        }
        Ok(self.inner.predict(&design.values))
    }

    /// Fitted intercept
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.inner.intercept()
    }

    /// `(design column, coefficient)` pairs, in design order
    #[must_use]
    pub fn coefficients(&self) -> Vec<(String, f64)> {
        self.design_columns
            .iter()
            .cloned()
            .zip(self.inner.params().iter().copied())
            .collect()
    }

    /// Raw feature columns the model was fit on
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Expanded design column names
    #[must_use]
    pub fn design_columns(&self) -> &[String] {
        &self.design_columns
    }

    /// Target column the model predicts
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableSchema;
    use arrow::array::{Int32Array, RecordBatch, StringArray};
    use std::sync::Arc;

    fn linear_frame(num_rows: i32) -> DataFrame {
        // RentalCount = 10 * Day, exactly
        let schema = TableSchema::new()
            .with_integer("Day")
            .with_integer("RentalCount");
        let days: Vec<i32> = (1..=num_rows).collect();
        let counts: Vec<i32> = days.iter().map(|d| d * 10).collect();
        let batch = RecordBatch::try_new(
            schema.to_arrow(),
            vec![
                Arc::new(Int32Array::from(days)),
                Arc::new(Int32Array::from(counts)),
            ],
        )
        .unwrap();
        DataFrame::new(schema, vec![batch]).unwrap()
    }

    #[test]
    fn test_fit_recovers_linear_relationship() {
        let frame = linear_frame(20);
        let model = ModelSpec::new("RentalCount").fit(&frame).unwrap();

        assert!((model.coefficients()[0].1 - 10.0).abs() < 1e-6);
        assert!(model.intercept().abs() < 1e-6);

        let predictions = model.predict(&frame).unwrap();
        let actual = frame.numeric_column("RentalCount").unwrap();
        for (p, a) in predictions.iter().zip(actual.iter()) {
            assert!((p - a).abs() < 1e-6);
        }
    }

    #[test]
    fn test_resolve_features_order_and_exclusions() {
        let schema = TableSchema::new()
            .with_integer("Year")
            .with_integer("Day")
            .with_integer("RentalCount")
            .with_factor("Snow", ["1", "0"]);
        let batch = RecordBatch::try_new(
            schema.to_arrow(),
            vec![
                Arc::new(Int32Array::from(vec![2014])),
                Arc::new(Int32Array::from(vec![1])),
                Arc::new(Int32Array::from(vec![10])),
                Arc::new(StringArray::from(vec!["0"])),
            ],
        )
        .unwrap();
        let frame = DataFrame::new(schema, vec![batch]).unwrap();

        let spec = ModelSpec::new("RentalCount").exclude("Year");
        let features = spec.resolve_features(&frame).unwrap();
        assert_eq!(features, vec!["Day", "Snow"]);
    }

    #[test]
    fn test_fit_empty_training_set() {
        let schema = TableSchema::new()
            .with_integer("Day")
            .with_integer("RentalCount");
        let frame = DataFrame::new(schema, vec![]).unwrap();
        let err = ModelSpec::new("RentalCount").fit(&frame).unwrap_err();
        assert!(err.to_string().contains("training set is empty"));
    }

    #[test]
    fn test_fit_unknown_target() {
        let frame = linear_frame(5);
        let err = ModelSpec::new("Missing").fit(&frame).unwrap_err();
        assert!(err.to_string().contains("not declared"));
    }

    #[test]
    fn test_fit_factor_target_rejected() {
        let schema = TableSchema::new()
            .with_integer("Day")
            .with_factor("Holiday", ["1", "0"]);
        let batch = RecordBatch::try_new(
            schema.to_arrow(),
            vec![
                Arc::new(Int32Array::from(vec![1])),
                Arc::new(StringArray::from(vec!["0"])),
            ],
        )
        .unwrap();
        let frame = DataFrame::new(schema, vec![batch]).unwrap();
        let err = ModelSpec::new("Holiday").fit(&frame).unwrap_err();
        assert!(err.to_string().contains("numeric target"));
    }

    #[test]
    fn test_fit_unknown_excluded_column() {
        let frame = linear_frame(5);
        let err = ModelSpec::new("RentalCount")
            .exclude("Typo")
            .fit(&frame)
            .unwrap_err();
        assert!(err.to_string().contains("Typo"));
    }

    #[test]
    fn test_fit_no_features_remaining() {
        let frame = linear_frame(5);
        let err = ModelSpec::new("RentalCount")
            .exclude("Day")
            .fit(&frame)
            .unwrap_err();
        assert!(err.to_string().contains("no feature columns"));
    }

    #[test]
    fn test_predict_rejects_different_encoding() {
        let train = {
            let schema = TableSchema::new()
                .with_factor("Snow", ["1", "0"])
                .with_integer("RentalCount");
            let batch = RecordBatch::try_new(
                schema.to_arrow(),
                vec![
                    Arc::new(StringArray::from(vec!["0", "1"])),
                    Arc::new(Int32Array::from(vec![10, 20])),
                ],
            )
            .unwrap();
            DataFrame::new(schema, vec![batch]).unwrap()
        };
        let other = {
            let schema = TableSchema::new()
                .with_factor("Snow", ["1", "0", "2"])
                .with_integer("RentalCount");
            let batch = RecordBatch::try_new(
                schema.to_arrow(),
                vec![
                    Arc::new(StringArray::from(vec!["2"])),
                    Arc::new(Int32Array::from(vec![30])),
                ],
            )
            .unwrap();
            DataFrame::new(schema, vec![batch]).unwrap()
        };

        let model = ModelSpec::new("RentalCount").fit(&train).unwrap();
        let err = model.predict(&other).unwrap_err();
        assert!(err.to_string().contains("encodes features"));
    }

    #[test]
    fn test_predict_on_empty_frame_yields_no_predictions() {
        let train = linear_frame(10);
        let model = ModelSpec::new("RentalCount").fit(&train).unwrap();

        let schema = TableSchema::new()
            .with_integer("Day")
            .with_integer("RentalCount");
        let empty = DataFrame::new(schema, vec![]).unwrap();
        let predictions = model.predict(&empty).unwrap();
        assert_eq!(predictions.len(), 0);
    }
}

//! Column-wise preprocessing over a `Frame`.

use churn_domain::Frame;
use ndarray::{concatenate, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::encoder::OneHotEncoder;
use crate::error::{LearnError, Result};
use crate::scaler::StandardScaler;

/// Standard-scales the numeric columns and one-hot encodes the categorical
/// ones. Output layout is the numeric block followed by the categorical
/// block; any other column of the frame is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformer {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub scaler: StandardScaler,
    pub encoder: OneHotEncoder,
}

impl ColumnTransformer {
    pub fn new(numeric_columns: Vec<String>, categorical_columns: Vec<String>) -> Self {
        Self { numeric_columns,
               categorical_columns,
               scaler: StandardScaler::new(),
               encoder: OneHotEncoder::new() }
    }

    pub fn is_fitted(&self) -> bool {
        self.scaler.is_fitted && self.encoder.is_fitted
    }

    pub fn fit(&mut self, frame: &Frame, rows: &[usize]) -> Result<&mut Self> {
        let numeric = self.numeric_block(frame, rows)?;
        let categorical = self.categorical_block(frame, rows)?;
        self.scaler.fit(&numeric)?;
        self.encoder.fit(&categorical)?;
        Ok(self)
    }

    /// Feature matrix for `rows` (indices into `frame`).
    pub fn transform(&self, frame: &Frame, rows: &[usize]) -> Result<Array2<f64>> {
        if !self.is_fitted() {
            return Err(LearnError::ModelNotFitted);
        }
        let numeric = self.scaler.transform(&self.numeric_block(frame, rows)?)?;
        let categorical = if self.categorical_columns.is_empty() {
            Array2::zeros((rows.len(), 0))
        } else {
            self.encoder.transform(&self.categorical_block(frame, rows)?)?
        };
        concatenate(Axis(1), &[numeric.view(), categorical.view()]).map_err(|e| LearnError::ShapeError {
            expected: "aligned feature blocks".into(),
            actual: e.to_string(),
        })
    }

    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.numeric_columns.clone();
        names.extend(self.encoder.feature_names(&self.categorical_columns));
        names
    }

    fn numeric_block(&self, frame: &Frame, rows: &[usize]) -> Result<Array2<f64>> {
        let mut block = Array2::<f64>::zeros((rows.len(), self.numeric_columns.len()));
        for (c, name) in self.numeric_columns.iter().enumerate() {
            let values = frame.numeric_column(name)
                              .ok_or_else(|| LearnError::FeatureNotFound(format!("numeric column {name}")))?;
            for (r, &row) in rows.iter().enumerate() {
                let v = *values.get(row)
                               .ok_or_else(|| LearnError::DataError(format!("row {row} out of range")))?;
                if !v.is_finite() {
                    return Err(LearnError::DataError(format!("numeric column {name} has a missing value at row {row}")));
                }
                block[[r, c]] = v;
            }
        }
        Ok(block)
    }

    fn categorical_block<'f>(&self, frame: &'f Frame, rows: &[usize]) -> Result<Vec<Vec<Option<&'f str>>>> {
        self.categorical_columns
            .iter()
            .map(|name| {
                let values = frame.column(name).ok_or_else(|| LearnError::FeatureNotFound(name.clone()))?;
                rows.iter()
                    .map(|&row| {
                        values.get(row)
                              .copied()
                              .ok_or_else(|| LearnError::DataError(format!("row {row} out of range")))
                    })
                    .collect()
            })
            .collect()
    }
}

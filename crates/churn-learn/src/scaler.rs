//! Standard (z-score) scaling.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};

/// `(x - mean) / std` per column, with the population standard deviation.
/// Constant columns keep a scale of 1 so they map to 0 instead of NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Option<Array1<f64>>,
    pub scale: Option<Array1<f64>>,
    pub is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(LearnError::DataError("cannot fit scaler on zero rows".into()));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(LearnError::DataError("numeric features contain missing or non-finite values".into()));
        }
        let mean = x.mean_axis(Axis(0))
                    .ok_or_else(|| LearnError::DataError("empty numeric block".into()))?;
        let scale = x.std_axis(Axis(0), 0.0).mapv(|s| if s == 0.0 { 1.0 } else { s });
        self.mean = Some(mean);
        self.scale = Some(scale);
        self.is_fitted = true;
        Ok(self)
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (Some(mean), Some(scale)) = (&self.mean, &self.scale) else {
            return Err(LearnError::ModelNotFitted);
        };
        if x.ncols() != mean.len() {
            return Err(LearnError::ShapeError { expected: format!("{} columns", mean.len()),
                                                actual: format!("{} columns", x.ncols()) });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(LearnError::DataError("numeric features contain missing or non-finite values".into()));
        }
        Ok((x - mean) / scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn standardizes_and_handles_constant_columns() {
        let x = array![[1.0, 5.0], [3.0, 5.0]];
        let mut s = StandardScaler::new();
        s.fit(&x).unwrap();
        let t = s.transform(&x).unwrap();
        assert_eq!(t, array![[-1.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn nan_is_rejected() {
        let mut s = StandardScaler::new();
        assert!(matches!(s.fit(&array![[1.0], [f64::NAN]]), Err(LearnError::DataError(_))));
        assert!(matches!(StandardScaler::new().transform(&array![[1.0]]), Err(LearnError::ModelNotFitted)));
    }
}

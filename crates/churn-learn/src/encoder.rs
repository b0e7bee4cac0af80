//! One-hot encoding of categorical columns.

use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};

/// Learns the sorted category list of each column; a missing value is a
/// category of its own, placed last. Values never seen during `fit` encode
/// as all zeros for that column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub categories: Vec<Vec<Option<String>>>,
    pub is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `columns[c][r]` is the value of column `c` at row `r`.
    pub fn fit(&mut self, columns: &[Vec<Option<&str>>]) -> Result<&mut Self> {
        self.categories = columns.iter()
                                 .map(|col| {
                                     let seen: BTreeSet<&str> = col.iter().flatten().copied().collect();
                                     let mut cats: Vec<Option<String>> = seen.into_iter().map(|v| Some(v.to_string())).collect();
                                     if col.iter().any(Option::is_none) {
                                         cats.push(None);
                                     }
                                     cats
                                 })
                                 .collect();
        self.is_fitted = true;
        Ok(self)
    }

    pub fn n_features(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub fn transform(&self, columns: &[Vec<Option<&str>>]) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(LearnError::ModelNotFitted);
        }
        if columns.len() != self.categories.len() {
            return Err(LearnError::ShapeError { expected: format!("{} categorical columns", self.categories.len()),
                                                actual: format!("{} categorical columns", columns.len()) });
        }
        let n_rows = columns.first().map_or(0, Vec::len);
        let mut out = Array2::<f64>::zeros((n_rows, self.n_features()));
        let mut offset = 0;
        for (col, cats) in columns.iter().zip(&self.categories) {
            for (r, value) in col.iter().enumerate() {
                if let Some(k) = cats.iter().position(|c| c.as_deref() == *value) {
                    out[[r, offset + k]] = 1.0;
                }
            }
            offset += cats.len();
        }
        Ok(out)
    }

    /// Output names in `column=value` form (`column=<NA>` for missing).
    pub fn feature_names(&self, column_names: &[String]) -> Vec<String> {
        column_names.iter()
                    .zip(&self.categories)
                    .flat_map(|(name, cats)| cats.iter().map(move |c| format!("{}={}", name, c.as_deref().unwrap_or("<NA>"))))
                    .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn unseen_categories_encode_as_zeros() {
        let mut enc = OneHotEncoder::new();
        enc.fit(&[vec![Some("b"), Some("a"), None]]).unwrap();
        assert_eq!(enc.categories[0], vec![Some("a".to_string()), Some("b".to_string()), None]);
        let t = enc.transform(&[vec![Some("a"), Some("zzz"), None]]).unwrap();
        assert_eq!(t, array![[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(enc.feature_names(&["c".to_string()]), vec!["c=a", "c=b", "c=<NA>"]);
    }
}

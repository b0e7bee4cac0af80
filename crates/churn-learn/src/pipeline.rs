//! Baseline churn training: label mapping, preprocessing, split, fit and
//! held-out scoring.

use churn_domain::{DType, Frame};
use log::{debug, info};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};
use crate::logistic::LogisticRegression;
use crate::metrics::{accuracy, roc_auc, Metrics};
use crate::split::{stratified_split, TrainTestSplit};
use crate::transformer::ColumnTransformer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub test_size: f64,
    pub seed: u64,
    /// Inverse L2 strength of the classifier.
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub positive_label: String,
    pub negative_label: String,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self { test_size: 0.2,
               seed: 42,
               c: 1.0,
               max_iter: 500,
               tol: 1e-6,
               positive_label: "Yes".into(),
               negative_label: "No".into() }
    }
}

/// Preprocessor and classifier fitted together. The model document holds
/// both; the preprocessor document holds the preprocessor alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    pub preprocessor: ColumnTransformer,
    pub classifier: LogisticRegression,
}

impl FittedPipeline {
    /// Positive-class probability for `rows` of `frame`.
    pub fn predict_proba(&self, frame: &Frame, rows: &[usize]) -> Result<Array1<f64>> {
        let x = self.preprocessor.transform(frame, rows)?;
        self.classifier.predict_proba(&x)
    }

    pub fn preprocessor_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.preprocessor)?)
    }

    pub fn model_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_model_json(model: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(model)?)
    }
}

#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub pipeline: FittedPipeline,
    pub metrics: Metrics,
    pub split: TrainTestSplit,
}

fn encode_labels(frame: &Frame, label_column: &str, config: &TrainConfig) -> Result<Vec<u8>> {
    let values = frame.column(label_column)
                      .ok_or_else(|| LearnError::FeatureNotFound(format!("label column {label_column}")))?;
    values.iter()
          .enumerate()
          .map(|(row, v)| match v {
              Some(v) if *v == config.positive_label => Ok(1u8),
              Some(v) if *v == config.negative_label => Ok(0u8),
              Some(v) => Err(LearnError::DataError(format!("label '{v}' at row {row} is neither '{}' nor '{}'",
                                                           config.positive_label, config.negative_label))),
              None => Err(LearnError::DataError(format!("missing label at row {row}"))),
          })
          .collect()
}

/// Splits the feature columns by dtype. Integer and float columns are
/// numeric, text columns are categorical and boolean columns are left out.
fn feature_columns(frame: &Frame, label_column: &str, id_column: &str) -> (Vec<String>, Vec<String>) {
    let mut numeric = Vec::new();
    let mut categorical = Vec::new();
    for (name, dtype) in frame.dtypes() {
        if name == label_column || name == id_column {
            continue;
        }
        if numeric.iter().chain(categorical.iter()).any(|c: &String| c == name) {
            continue;
        }
        match dtype {
            DType::Int64 | DType::Float64 => numeric.push(name.to_string()),
            DType::Object => categorical.push(name.to_string()),
            DType::Bool => debug!("column {name} has dtype bool and is not used as a feature"),
        }
    }
    (numeric, categorical)
}

fn labels_as_f64(labels: &[u8], rows: &[usize]) -> Array1<f64> {
    rows.iter().map(|&r| f64::from(labels[r])).collect()
}

/// Fits the baseline pipeline on `frame`.
///
/// The id and label columns are never features. The preprocessor is fitted on
/// the training rows only and the metrics come from the test rows.
pub fn fit_baseline(frame: &Frame, label_column: &str, id_column: &str, config: &TrainConfig) -> Result<TrainOutcome> {
    if !frame.has_column(id_column) {
        return Err(LearnError::FeatureNotFound(format!("id column {id_column}")));
    }
    let labels = encode_labels(frame, label_column, config)?;
    let split = stratified_split(&labels, config.test_size, config.seed)?;

    let (numeric, categorical) = feature_columns(frame, label_column, id_column);
    if numeric.is_empty() && categorical.is_empty() {
        return Err(LearnError::DataError("no feature columns left after dropping id and label".into()));
    }
    info!("training on {} rows ({} numeric, {} categorical features), holding out {}",
          split.train.len(),
          numeric.len(),
          categorical.len(),
          split.test.len());

    let mut preprocessor = ColumnTransformer::new(numeric, categorical);
    preprocessor.fit(frame, &split.train)?;
    let x_train = preprocessor.transform(frame, &split.train)?;
    let y_train = labels_as_f64(&labels, &split.train);

    let mut classifier = LogisticRegression::new().with_c(config.c)
                                                  .with_max_iter(config.max_iter)
                                                  .with_tol(config.tol);
    classifier.fit(&x_train, &y_train)?;
    debug!("classifier stopped after {} iterations (converged={})", classifier.n_iter, classifier.converged);

    let pipeline = FittedPipeline { preprocessor, classifier };
    let y_test = labels_as_f64(&labels, &split.test);
    let x_test = pipeline.preprocessor.transform(frame, &split.test)?;
    let predicted = pipeline.classifier.predict(&x_test)?;
    let proba = pipeline.classifier.predict_proba(&x_test)?;
    let metrics = Metrics { accuracy: accuracy(&y_test, &predicted)?,
                            roc_auc: roc_auc(&y_test, &proba)? };

    Ok(TrainOutcome { pipeline, metrics, split })
}

//! Baseline binary classifier for the churn pipeline: column-wise
//! preprocessing, L2 logistic regression, seeded stratified split and
//! evaluation metrics.

pub mod encoder;
pub mod error;
pub mod logistic;
pub mod metrics;
pub mod pipeline;
pub mod scaler;
pub mod split;
pub mod transformer;

pub use encoder::OneHotEncoder;
pub use error::{LearnError, Result};
pub use logistic::LogisticRegression;
pub use metrics::{accuracy, roc_auc, Metrics};
pub use pipeline::{fit_baseline, FittedPipeline, TrainConfig, TrainOutcome};
pub use scaler::StandardScaler;
pub use split::{stratified_split, TrainTestSplit};
pub use transformer::ColumnTransformer;

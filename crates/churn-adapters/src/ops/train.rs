use churn_domain::contract::CHURN_ID_COLUMN;
use churn_domain::{DatasetRef, DomainError};
use churn_learn::{fit_baseline, TrainConfig, TrainOutcome};
use churn_storage::ObjectStore;
use log::info;

use super::fetch_frame;

/// Entrena sobre su propia lectura del dataset; no reutiliza nada de la
/// validación. Cualquier fallo de ajuste o de métricas es `TrainingFailure`.
pub fn train_from_store(store: &dyn ObjectStore,
                        dataset: &DatasetRef,
                        label_column: &str,
                        config: &TrainConfig)
                        -> Result<TrainOutcome, DomainError> {
    let frame = fetch_frame(store, dataset)?;
    let outcome = fit_baseline(&frame, label_column, CHURN_ID_COLUMN, config)?;
    info!("Training completed");
    info!("accuracy={:.4} roc_auc={:.4}", outcome.metrics.accuracy, outcome.metrics.roc_auc);
    Ok(outcome)
}

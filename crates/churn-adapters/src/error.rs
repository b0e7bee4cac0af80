//! Traducción de errores de dominio a errores del motor.

use churn_core::{CoreEngineError, ErrorClass};
use churn_domain::DomainError;

pub fn error_class(e: &DomainError) -> ErrorClass {
    if e.is_retryable() {
        ErrorClass::Retryable
    } else if e.is_validation() {
        ErrorClass::Validation
    } else if matches!(e, DomainError::Configuration(_)) {
        ErrorClass::Configuration
    } else {
        ErrorClass::Fatal
    }
}

/// Conserva clase y código para que `StepFailed` y el binario los reporten.
pub fn step_error(e: DomainError) -> CoreEngineError {
    CoreEngineError::step(error_class(&e), e.code(), e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use churn_domain::ContractViolation;

    #[test]
    fn classes_follow_domain_kind() {
        let e = step_error(ContractViolation::TooFewRows { rows: 50, min_rows: 100 }.into());
        assert_eq!(e.class(), ErrorClass::Validation);
        assert!(e.to_string().starts_with("[contract_violation.too_few_rows]"));

        assert_eq!(step_error(DomainError::StorageUnavailable("down".into())).class(),
                   ErrorClass::Retryable);
        assert_eq!(step_error(DomainError::TrainingFailure("singular".into())).class(),
                   ErrorClass::Fatal);
        assert_eq!(step_error(DomainError::Configuration("invalid model prefix run id".into())).class(),
                   ErrorClass::Configuration);
    }
}

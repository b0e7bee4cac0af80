//! Contrato de esquema: columnas requeridas (en orden) y valores de label
//! permitidos. Es configuración estática; un cambio es un contrato nuevo.

use std::collections::BTreeSet;

/// Columnas del dataset Telco de churn.
pub const CHURN_REQUIRED_COLUMNS: [&str; 21] = ["customerID",
                                                "gender",
                                                "SeniorCitizen",
                                                "Partner",
                                                "Dependents",
                                                "tenure",
                                                "PhoneService",
                                                "MultipleLines",
                                                "InternetService",
                                                "OnlineSecurity",
                                                "OnlineBackup",
                                                "DeviceProtection",
                                                "TechSupport",
                                                "StreamingTV",
                                                "StreamingMovies",
                                                "Contract",
                                                "PaperlessBilling",
                                                "PaymentMethod",
                                                "MonthlyCharges",
                                                "TotalCharges",
                                                "Churn"];

pub const CHURN_ALLOWED_LABELS: [&str; 2] = ["Yes", "No"];

/// Columna identificadora que el entrenamiento descarta.
pub const CHURN_ID_COLUMN: &str = "customerID";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaContract {
    required_columns: &'static [&'static str],
    allowed_labels: &'static [&'static str],
}

impl SchemaContract {
    pub const fn new(required_columns: &'static [&'static str], allowed_labels: &'static [&'static str]) -> Self {
        Self { required_columns,
               allowed_labels }
    }

    pub const fn churn() -> Self {
        Self::new(&CHURN_REQUIRED_COLUMNS, &CHURN_ALLOWED_LABELS)
    }

    pub fn required_columns(&self) -> &'static [&'static str] {
        self.required_columns
    }

    pub fn allowed_labels(&self) -> BTreeSet<&'static str> {
        self.allowed_labels.iter().copied().collect()
    }

    pub fn allows_label(&self, value: &str) -> bool {
        self.allowed_labels.contains(&value)
    }
}

impl Default for SchemaContract {
    fn default() -> Self {
        Self::churn()
    }
}

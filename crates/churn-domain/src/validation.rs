//! Reglas del Validator y reportes que emite.

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{ContractViolation, Frame, SchemaContract};

/// `schema.json`: filas, columna label y tipo declarado por columna.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub rows: usize,
    pub label_column: String,
    pub columns: IndexMap<String, String>,
}

/// `data_profile.json`: % de nulos por columna (0-100), conteo de valores del
/// label (mayor a menor) y número de filas duplicadas completas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataProfile {
    pub missing_pct: IndexMap<String, f64>,
    pub label_distribution: IndexMap<String, usize>,
    pub duplicate_rows: usize,
}

/// Aplica el contrato en orden fijo: tamaño, columnas duplicadas, columnas
/// faltantes, valores de label. Las reglas que pueden juntar varios
/// elementos los reportan todos en un solo error.
pub fn validate_frame(frame: &Frame,
                      label_column: &str,
                      min_rows: usize,
                      contract: &SchemaContract)
                      -> Result<(ValidationReport, DataProfile), ContractViolation> {
    let rows = frame.n_rows();
    if rows < min_rows {
        return Err(ContractViolation::TooFewRows { rows, min_rows });
    }

    let duplicates = duplicate_columns(frame.headers());
    if !duplicates.is_empty() {
        return Err(ContractViolation::DuplicateColumns(duplicates));
    }

    let mut missing: Vec<String> = contract.required_columns()
                                           .iter()
                                           .filter(|c| !frame.has_column(c))
                                           .map(|c| c.to_string())
                                           .collect();
    if !frame.has_column(label_column) && !missing.iter().any(|m| m == label_column) {
        missing.push(label_column.to_string());
    }
    if !missing.is_empty() {
        return Err(ContractViolation::MissingColumns(missing));
    }

    let labels = frame.column(label_column).unwrap_or_default();
    let offending: BTreeSet<String> = labels.iter()
                                            .flatten()
                                            .filter(|v| !contract.allows_label(v))
                                            .map(|v| v.to_string())
                                            .collect();
    if !offending.is_empty() {
        return Err(ContractViolation::InvalidLabelValues(offending));
    }

    let report = ValidationReport { rows,
                                    label_column: label_column.to_string(),
                                    columns: frame.dtypes()
                                                  .map(|(n, t)| (n.to_string(), t.to_string()))
                                                  .collect() };
    let profile = DataProfile { missing_pct: missing_pct(frame),
                                label_distribution: value_counts(&labels),
                                duplicate_rows: duplicate_rows(frame) };
    Ok((report, profile))
}

/// Cada nombre repetido una sola vez, en orden de primera repetición.
fn duplicate_columns(headers: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dups: Vec<String> = Vec::new();
    for h in headers {
        if !seen.insert(h.as_str()) && !dups.contains(h) {
            dups.push(h.clone());
        }
    }
    dups
}

fn missing_pct(frame: &Frame) -> IndexMap<String, f64> {
    let n = frame.n_rows();
    frame.headers()
         .iter()
         .enumerate()
         .map(|(i, h)| {
             let nulls = frame.rows().iter().filter(|r| r[i].is_none()).count();
             let pct = if n == 0 { 0.0 } else { nulls as f64 * 100.0 / n as f64 };
             (h.clone(), pct)
         })
         .collect()
}

/// Conteo de valores no nulos, de mayor a menor; empates por valor.
fn value_counts(values: &[Option<&str>]) -> IndexMap<String, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values.iter().flatten() {
        *counts.entry(*v).or_default() += 1;
    }
    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    pairs.into_iter().map(|(v, c)| (v.to_string(), c)).collect()
}

/// Filas idénticas a una fila anterior (la primera ocurrencia no cuenta).
/// Los nulos se consideran iguales entre sí.
fn duplicate_rows(frame: &Frame) -> usize {
    let mut seen: HashSet<&[Option<String>]> = HashSet::with_capacity(frame.n_rows());
    frame.rows().iter().filter(|r| !seen.insert(r.as_slice())).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 3] = ["id", "x", "Churn"];
    const LABELS: [&str; 2] = ["Yes", "No"];
    const CONTRACT: SchemaContract = SchemaContract::new(&REQUIRED, &LABELS);

    fn frame(csv: &str) -> Frame {
        Frame::from_csv_bytes(csv.as_bytes()).unwrap()
    }

    #[test]
    fn profile_counts_labels_nulls_and_duplicates() {
        let f = frame("id,x,Churn\na,1,Yes\nb,,No\nb,,No\nc,2,Yes\nd,3,Yes\n,,\n");
        let (report, profile) = validate_frame(&f, "Churn", 1, &CONTRACT).unwrap();
        assert_eq!(report.rows, 6);
        assert_eq!(report.columns["x"], "float64");
        assert_eq!(profile.label_distribution.iter().collect::<Vec<_>>(), vec![(&"Yes".to_string(), &3), (&"No".to_string(), &2)]);
        assert_eq!(profile.duplicate_rows, 1);
        assert!((profile.missing_pct["x"] - 50.0).abs() < 1e-9);
        assert!((profile.missing_pct["id"] - 100.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_columns_reported_once_each() {
        let f = frame("id,x,x,Churn,id,x\na,1,2,Yes,b,3\n");
        assert_eq!(validate_frame(&f, "Churn", 1, &CONTRACT).unwrap_err(),
                   ContractViolation::DuplicateColumns(vec!["x".into(), "id".into()]));
    }

    #[test]
    fn rule_order_is_rows_first() {
        // Faltan columnas y hay pocas filas: gana TooFewRows.
        let f = frame("id\na\n");
        assert_eq!(validate_frame(&f, "Churn", 5, &CONTRACT).unwrap_err(),
                   ContractViolation::TooFewRows { rows: 1, min_rows: 5 });
    }

    #[test]
    fn label_outside_contract_is_missing_too() {
        let f = frame("id,x,Churn\na,1,Yes\n");
        assert_eq!(validate_frame(&f, "Target", 1, &CONTRACT).unwrap_err(),
                   ContractViolation::MissingColumns(vec!["Target".into()]));
    }
}

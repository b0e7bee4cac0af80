//! Tabla en memoria cargada desde CSV.
//!
//! Las celdas se guardan como texto; las vacías y los marcadores NA usuales
//! son `None`. El tipo declarado de cada columna se infiere una vez al cargar
//! con las reglas de los lectores CSV de pandas: `int64` sin nulos,
//! `float64` si hay números con nulos o decimales, `bool` para columnas
//! completas de True/False y `object` para el resto.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;

const NA_TOKENS: [&str; 19] = ["", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
                               "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Int64,
    Float64,
    Bool,
    Object,
}

impl DType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::Object => "object",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    headers: Vec<String>,
    dtypes: Vec<DType>,
    rows: Vec<Vec<Option<String>>>,
}

fn parse_cell(raw: &str) -> Option<String> {
    if NA_TOKENS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

fn is_bool_token(s: &str) -> bool {
    matches!(s, "True" | "TRUE" | "true" | "False" | "FALSE" | "false")
}

fn infer_dtype<'a>(cells: impl Iterator<Item = Option<&'a str>>) -> DType {
    let mut any_null = false;
    let mut any_value = false;
    let (mut all_int, mut all_float, mut all_bool) = (true, true, true);
    for cell in cells {
        match cell {
            None => any_null = true,
            Some(v) => {
                any_value = true;
                all_int &= v.parse::<i64>().is_ok();
                all_float &= v.parse::<f64>().is_ok();
                all_bool &= is_bool_token(v);
            }
        }
    }
    match (any_value, any_null) {
        (false, true) => DType::Float64,
        (false, false) => DType::Object,
        _ if all_int && !any_null => DType::Int64,
        _ if all_int || all_float => DType::Float64,
        _ if all_bool && !any_null => DType::Bool,
        _ => DType::Object,
    }
}

impl Frame {
    /// Construye un frame validando que todas las filas tengan el ancho del
    /// header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self, DomainError> {
        if headers.is_empty() {
            return Err(DomainError::MalformedDataset("no columns to parse".into()));
        }
        if let Some(i) = rows.iter().position(|r| r.len() != headers.len()) {
            return Err(DomainError::MalformedDataset(format!("row {} has {} fields, expected {}",
                                                             i + 1,
                                                             rows[i].len(),
                                                             headers.len())));
        }
        let dtypes = (0..headers.len()).map(|c| infer_dtype(rows.iter().map(|r| r[c].as_deref())))
                                       .collect();
        Ok(Self { headers, dtypes, rows })
    }

    /// Lee un CSV con header. Los nombres de columna se conservan tal cual,
    /// repetidos incluidos.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(bytes);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(parse_cell).collect());
        }
        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Índice de la primera columna con ese nombre.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn dtype(&self, name: &str) -> Option<DType> {
        self.column_index(name).map(|i| self.dtypes[i])
    }

    /// Pares (nombre, tipo) en orden de columna.
    pub fn dtypes(&self) -> impl Iterator<Item = (&str, DType)> {
        self.headers.iter().map(String::as_str).zip(self.dtypes.iter().copied())
    }

    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx].as_deref()).collect())
    }

    /// Columna numérica como `f64`; los nulos son NaN. `None` si la columna
    /// no existe o no es numérica.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        if !self.dtypes[idx].is_numeric() {
            return None;
        }
        Some(self.rows
                 .iter()
                 .map(|r| r[idx].as_deref().and_then(|v| v.parse::<f64>().ok()).unwrap_or(f64::NAN))
                 .collect())
    }
}

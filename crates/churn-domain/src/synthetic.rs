//! Generador determinista de datasets con la forma del contrato de churn.
//! Sirve para poblar un storage local y para pruebas.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::contract::CHURN_REQUIRED_COLUMNS;
use crate::DomainError;

const YES_NO: [&str; 2] = ["Yes", "No"];
const CONTRACTS: [&str; 3] = ["Month-to-month", "One year", "Two year"];
const INTERNET: [&str; 3] = ["DSL", "Fiber optic", "No"];
const PAYMENT: [&str; 4] = ["Electronic check", "Mailed check", "Bank transfer (automatic)", "Credit card (automatic)"];

fn pick<'a>(rng: &mut ChaCha8Rng, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

/// `rows` filas con el header del contrato; misma semilla, mismos bytes.
/// El label depende del tipo de contrato, el servicio de internet, la
/// antigüedad y el cargo mensual, así que un clasificador lineal aprende
/// algo. Los clientes con `tenure` 0 llevan `TotalCharges` en blanco.
pub fn synthetic_churn_csv(rows: usize, seed: u64) -> Result<Vec<u8>, DomainError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CHURN_REQUIRED_COLUMNS)?;

    for i in 0..rows {
        let tenure: u32 = rng.gen_range(0..=72);
        let contract = pick(&mut rng, &CONTRACTS);
        let internet = pick(&mut rng, &INTERNET);
        let phone = pick(&mut rng, &YES_NO);
        let monthly: f64 = (rng.gen_range(18.0..120.0_f64) * 100.0).round() / 100.0;

        let internet_extra = |rng: &mut ChaCha8Rng| {
            if internet == "No" {
                "No internet service".to_string()
            } else {
                pick(rng, &YES_NO).to_string()
            }
        };
        let multiple_lines = if phone == "No" {
            "No phone service".to_string()
        } else {
            pick(&mut rng, &YES_NO).to_string()
        };
        let total = if tenure == 0 {
            " ".to_string()
        } else {
            format!("{:.2}", monthly * f64::from(tenure))
        };

        let score = -1.0 + 1.4 * f64::from(u8::from(contract == "Month-to-month")) + 0.8 * f64::from(u8::from(internet == "Fiber optic"))
                    - 0.045 * f64::from(tenure)
                    + 0.012 * (monthly - 70.0);
        let p = 1.0 / (1.0 + (-score).exp());
        let churn = if rng.gen::<f64>() < p { "Yes" } else { "No" };

        let record = vec![format!("{:04}-SYNTH", i),
                          pick(&mut rng, &["Male", "Female"]).to_string(),
                          rng.gen_range(0..=1).to_string(),
                          pick(&mut rng, &YES_NO).to_string(),
                          pick(&mut rng, &YES_NO).to_string(),
                          tenure.to_string(),
                          phone.to_string(),
                          multiple_lines,
                          internet.to_string(),
                          internet_extra(&mut rng),
                          internet_extra(&mut rng),
                          internet_extra(&mut rng),
                          internet_extra(&mut rng),
                          internet_extra(&mut rng),
                          internet_extra(&mut rng),
                          contract.to_string(),
                          pick(&mut rng, &YES_NO).to_string(),
                          pick(&mut rng, &PAYMENT).to_string(),
                          format!("{monthly:.2}"),
                          total,
                          churn.to_string()];
        wtr.write_record(&record)?;
    }
    wtr.into_inner()
       .map_err(|e| DomainError::MalformedDataset(format!("csv writer: {e}")))
}

//! Seeded stratified train/test split.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};

/// Row indices of each side of a split, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Splits `labels` so each class keeps its proportion on both sides.
///
/// The test side gets `ceil(test_size * n)` rows, distributed across classes
/// by largest remainder. The same labels, `test_size` and `seed` always give
/// the same split.
pub fn stratified_split(labels: &[u8], test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(LearnError::DataError(format!("test_size must be in (0, 1), got {test_size}")));
    }
    let n = labels.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);

    let mut by_class: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }
    let n_classes = by_class.len();
    if let Some((class, members)) = by_class.iter().find(|(_, m)| m.len() < 2) {
        return Err(LearnError::DataError(format!("class {class} has {} member(s); at least 2 are required to stratify",
                                                 members.len())));
    }
    if n_test < n_classes || n_train < n_classes {
        return Err(LearnError::DataError(format!("cannot stratify {n} rows with {n_classes} classes into {n_train} train / {n_test} test")));
    }

    // Largest remainder allocation of n_test across classes, at least one per side.
    let mut quotas: Vec<(u8, usize, f64)> = by_class.iter()
                                                    .map(|(&c, m)| {
                                                        let exact = n_test as f64 * m.len() as f64 / n as f64;
                                                        (c, exact.floor() as usize, exact - exact.floor())
                                                    })
                                                    .collect();
    let mut assigned: usize = quotas.iter().map(|q| q.1).sum();
    let mut order: Vec<usize> = (0..quotas.len()).collect();
    order.sort_by(|&a, &b| quotas[b].2.total_cmp(&quotas[a].2).then(quotas[a].0.cmp(&quotas[b].0)));
    for &i in order.iter().cycle().take(order.len() * 2) {
        if assigned >= n_test {
            break;
        }
        let size = by_class[&quotas[i].0].len();
        if quotas[i].1 + 1 < size {
            quotas[i].1 += 1;
            assigned += 1;
        }
    }
    for q in quotas.iter_mut() {
        let size = by_class[&q.0].len();
        q.1 = q.1.clamp(1, size - 1);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for (class, take, _) in quotas {
        let mut members = by_class[&class].clone();
        members.shuffle(&mut rng);
        test.extend_from_slice(&members[..take]);
        train.extend_from_slice(&members[take..]);
    }
    train.sort_unstable();
    test.sort_unstable();
    Ok(TrainTestSplit { train, test })
}

//! L2-regularized logistic regression.

use std::collections::VecDeque;

use log::warn;
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};

/// Curvature pairs kept by the L-BFGS update.
const HISTORY: usize = 10;
/// Backtracking trials per iteration.
const MAX_LINE_SEARCH: usize = 50;
/// Armijo sufficient-decrease constant.
const ARMIJO: f64 = 1e-4;
/// Relative objective reduction below which the solver stops.
const FTOL: f64 = 64.0 * f64::EPSILON;

/// Binary logistic regression minimizing
/// `0.5 * ||w||² + C * Σ logloss(y, σ(x·w + b))` with L-BFGS. The
/// intercept is not penalized.
///
/// The solver works on the same objective divided by `C·n`, so `tol`
/// bounds the largest component of the per-sample gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    /// Inverse regularization strength.
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub n_iter: usize,
    #[serde(default)]
    pub converged: bool,
    pub is_fitted: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// log(1 + e^z) without overflow.
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

fn max_abs(v: &Array1<f64>) -> f64 {
    v.iter().fold(0.0_f64, |m, x| m.max(x.abs()))
}

/// Mean log-loss plus `alpha/2 · ||coef||²`. The last entry of `w` is the
/// intercept.
struct Objective<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    alpha: f64,
}

impl Objective<'_> {
    fn value_and_grad(&self, w: &Array1<f64>) -> (f64, Array1<f64>) {
        let p = self.x.ncols();
        let n = self.x.nrows() as f64;
        let coef = w.slice(s![..p]);
        let z = self.x.dot(&coef) + w[p];

        let loss = z.iter().zip(self.y).map(|(&z, &y)| softplus(z) - y * z).sum::<f64>() / n;
        let residual = (z.mapv(sigmoid) - self.y) / n;

        let mut grad = Array1::<f64>::zeros(p + 1);
        grad.slice_mut(s![..p]).assign(&(self.x.t().dot(&residual) + &coef * self.alpha));
        grad[p] = residual.sum();
        (loss + 0.5 * self.alpha * coef.dot(&coef), grad)
    }
}

/// Two-loop recursion: approximate inverse Hessian times `g`.
fn two_loop(g: &Array1<f64>, history: &VecDeque<(Array1<f64>, Array1<f64>, f64)>) -> Array1<f64> {
    let mut q = g.clone();
    let mut alphas = Vec::with_capacity(history.len());
    for (s, y, rho) in history.iter().rev() {
        let a = rho * s.dot(&q);
        q.scaled_add(-a, y);
        alphas.push(a);
    }
    if let Some((s, y, _)) = history.back() {
        q *= s.dot(y) / y.dot(y);
    }
    for ((s, y, rho), a) in history.iter().zip(alphas.iter().rev()) {
        let b = rho * y.dot(&q);
        q.scaled_add(a - b, s);
    }
    q
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self { coefficients: None,
               intercept: None,
               c: 1.0,
               max_iter: 500,
               tol: 1e-6,
               n_iter: 0,
               converged: false,
               is_fitted: false }
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// `y` holds 0/1 labels.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(LearnError::ShapeError { expected: format!("y length = {}", n_samples),
                                                actual: format!("y length = {}", y.len()) });
        }
        if n_samples == 0 {
            return Err(LearnError::DataError("cannot fit on zero samples".into()));
        }
        if y.iter().any(|v| *v != 0.0 && *v != 1.0) {
            return Err(LearnError::DataError("labels must be 0 or 1".into()));
        }
        if !(self.c > 0.0) {
            return Err(LearnError::TrainingError(format!("C must be positive, got {}", self.c)));
        }

        let n_features = x.ncols();
        let objective = Objective { x,
                                    y,
                                    alpha: 1.0 / (self.c * n_samples as f64) };
        let mut w = Array1::<f64>::zeros(n_features + 1);
        let (mut f, mut g) = objective.value_and_grad(&w);
        let mut history: VecDeque<(Array1<f64>, Array1<f64>, f64)> = VecDeque::with_capacity(HISTORY);
        self.converged = max_abs(&g) <= self.tol;
        self.n_iter = 0;

        while !self.converged && self.n_iter < self.max_iter {
            self.n_iter += 1;
            let mut direction = -two_loop(&g, &history);
            let mut slope = g.dot(&direction);
            if !(slope < 0.0) {
                history.clear();
                direction = -g.clone();
                slope = -g.dot(&g);
            }

            let mut step = if history.is_empty() { (1.0 / g.dot(&g).sqrt()).min(1.0) } else { 1.0 };
            let mut accepted = None;
            for _ in 0..MAX_LINE_SEARCH {
                let candidate = &w + &(&direction * step);
                let (fc, gc) = objective.value_and_grad(&candidate);
                if fc.is_finite() && fc <= f + ARMIJO * step * slope {
                    accepted = Some((candidate, fc, gc));
                    break;
                }
                step *= 0.5;
            }
            let Some((next, f_next, g_next)) = accepted else {
                break;
            };

            let s_k = &next - &w;
            let y_k = &g_next - &g;
            let sy = s_k.dot(&y_k);
            if sy > 1e-10 {
                if history.len() == HISTORY {
                    history.pop_front();
                }
                history.push_back((s_k, y_k, 1.0 / sy));
            }

            let reduction = (f - f_next) / f.abs().max(f_next.abs()).max(1.0);
            w = next;
            f = f_next;
            g = g_next;
            self.converged = max_abs(&g) <= self.tol || reduction <= FTOL;
        }

        if w.iter().any(|v| !v.is_finite()) {
            return Err(LearnError::TrainingError("coefficients diverged".into()));
        }
        if !self.converged {
            warn!("logistic regression did not converge in {} iterations", self.n_iter);
        }

        self.intercept = Some(w[n_features]);
        self.coefficients = Some(w.slice(s![..n_features]).to_owned());
        self.is_fitted = true;
        Ok(self)
    }

    /// Probability of the positive class.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let (Some(coef), Some(intercept)) = (&self.coefficients, self.intercept) else {
            return Err(LearnError::ModelNotFitted);
        };
        if x.ncols() != coef.len() {
            return Err(LearnError::ShapeError { expected: format!("{} features", coef.len()),
                                                actual: format!("{} features", x.ncols()) });
        }
        Ok((x.dot(coef) + intercept).mapv(sigmoid))
    }

    /// Class labels (0/1) at the 0.5 threshold.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self.predict_proba(x)?.mapv(|p| if p > 0.5 { 1.0 } else { 0.0 }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn separates_simple_classes() {
        let x = array![[0.0, 0.0], [0.5, 0.2], [1.0, 0.8], [3.0, 3.0], [3.5, 2.8], [4.0, 4.2]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();
        assert!(model.is_fitted);
        let proba = model.predict_proba(&x).unwrap();
        assert!(proba[0] < 0.5 && proba[5] > 0.5);
        assert_eq!(model.predict(&x).unwrap(), y);
    }

    #[test]
    fn stronger_penalty_shrinks_coefficients() {
        let x = array![[-2.0], [-1.0], [-0.5], [0.5], [1.0], [2.0]];
        let y = array![0.0, 0.0, 1.0, 0.0, 1.0, 1.0];
        let mut loose = LogisticRegression::new().with_c(10.0);
        let mut tight = LogisticRegression::new().with_c(0.01);
        loose.fit(&x, &y).unwrap();
        tight.fit(&x, &y).unwrap();
        let wl = loose.coefficients.as_ref().unwrap()[0].abs();
        let wt = tight.coefficients.as_ref().unwrap()[0].abs();
        assert!(wt < wl);
    }

    #[test]
    fn unfitted_model_refuses_to_predict() {
        let model = LogisticRegression::new();
        assert!(matches!(model.predict_proba(&array![[1.0]]), Err(LearnError::ModelNotFitted)));
    }

    #[test]
    fn fitted_weights_are_stationary() {
        let x = array![[0.2, 1.0], [1.5, -0.3], [-0.7, 0.4], [2.2, 1.1], [-1.4, -0.9], [0.9, 0.1], [0.0, -1.2], [1.1, 2.0]];
        let y = array![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        let mut model = LogisticRegression::new().with_tol(1e-9);
        model.fit(&x, &y).unwrap();
        assert!(model.converged);

        let mut w = model.coefficients.clone().unwrap().to_vec();
        w.push(model.intercept.unwrap());
        let objective = Objective { x: &x,
                                    y: &y,
                                    alpha: 1.0 / (model.c * x.nrows() as f64) };
        let (_, grad) = objective.value_and_grad(&Array1::from(w));
        assert!(max_abs(&grad) < 1e-6, "gradient {grad}");
    }

    #[test]
    fn fits_wide_one_hot_design() {
        let (n, p) = (400, 3000);
        let mut x = Array2::<f64>::zeros((n, p));
        let mut y = Array1::<f64>::zeros(n);
        for i in 0..n {
            let label = (i % 3 == 0) as u8 as f64;
            x[[i, (i * 7) % (p - 1)]] = 1.0;
            x[[i, p - 1]] = if label == 1.0 { 1.5 } else { -1.5 };
            y[i] = label;
        }
        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();
        assert!(model.n_iter <= model.max_iter);
        assert_eq!(model.coefficients.as_ref().unwrap().len(), p);
        assert_eq!(model.predict(&x).unwrap(), y);
    }
}

//! Binary logistic regression without intercept, trained by batch gradient descent.
//!
//! Labels are `-1`/`+1`. [`GradientDescent`] produces the weights,
//! [`LinearPredictor`] turns them into labels.

mod optimizer;
mod predictor;

pub use optimizer::{DescentSteps, FitReport, GradientDescent, Step};
pub use predictor::{predict, LinearPredictor};

use binclass_helpers::{Config, Float, Label, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Fits weights with the given step size and tolerance, capped at
/// [`Config::DEFAULT_MAX_ITERATIONS`] iterations.
///
/// See [`GradientDescent::fit`] for the errors.
pub fn fit<F: Float>(
    features: ArrayView2<F>,
    labels: ArrayView1<Label>,
    alpha: F,
    tolerance: F,
) -> Result<Array1<F>, F> {
    let optimizer = GradientDescent::new(alpha, tolerance, Config::DEFAULT_MAX_ITERATIONS)?;
    Ok(optimizer.fit(features, labels)?.weights)
}

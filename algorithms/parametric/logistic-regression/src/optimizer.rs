use binclass_helpers::{check_labelled, ClassifierError, Config, Float, Label, Result};
use log::{debug, info, trace, warn};
use ndarray::{Array1, ArrayView1, ArrayView2};
use ndarray_stats::QuantileExt;

use crate::LinearPredictor;

/// Batch gradient descent on the logistic loss `log(1 + exp(-y * w.x))`.
///
/// No bias term is fitted: append a constant feature column upstream if the
/// data needs an intercept.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientDescent<F: Float> {
    alpha: F,
    tolerance: F,
    max_iterations: usize,
}

/// One completed descent iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<F> {
    /// 1-based iteration count.
    pub iteration: usize,
    /// Infinity norm of the update just applied to the weights.
    pub update_norm: F,
}

/// Outcome of a converged fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport<F> {
    pub weights: Array1<F>,
    pub iterations: usize,
    pub final_update: F,
}

impl<F: Float> FitReport<F> {
    pub fn into_predictor(self) -> LinearPredictor<F> {
        LinearPredictor::from_fitted(self.weights)
    }
}

impl<F: Float> GradientDescent<F> {
    /// Creates an optimizer.
    ///
    /// # Arguments
    ///
    /// * `alpha`: The step size. Must be positive and finite.
    /// * `tolerance`: Descent stops once the infinity norm of an update drops below this. Must be positive and finite.
    /// * `max_iterations`: Hard cap on the number of iterations. Must be at least 1.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::InvalidParameter` for any value outside its domain.
    pub fn new(alpha: F, tolerance: F, max_iterations: usize) -> Result<Self, F> {
        check_positive("alpha", alpha)?;
        check_positive("tolerance", tolerance)?;
        if max_iterations == 0 {
            return Err(ClassifierError::invalid(
                "max_iterations",
                "must be at least 1",
            ));
        }
        Ok(Self {
            alpha,
            tolerance,
            max_iterations,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, F> {
        let alpha = F::from_f64(config.alpha)
            .ok_or_else(|| ClassifierError::<F>::invalid("alpha", "not representable"))?;
        let tolerance = F::from_f64(config.tolerance)
            .ok_or_else(|| ClassifierError::<F>::invalid("tolerance", "not representable"))?;
        Self::new(alpha, tolerance, config.max_iterations)
    }

    pub fn alpha(&self) -> F {
        self.alpha
    }

    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Starts a descent from the zero vector without running it.
    ///
    /// The returned iterator yields one [`Step`] per iteration and never ends
    /// by itself; [`GradientDescent::fit`] is the bounded driver.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::DimensionMismatch` if there is not exactly one
    /// label per row, or the matrix has no columns, and
    /// `ClassifierError::InvalidParameter` if it has no rows.
    pub fn steps<'a>(
        &self,
        features: ArrayView2<'a, F>,
        labels: ArrayView1<Label>,
    ) -> Result<DescentSteps<'a, F>, F> {
        check_labelled("gradient descent", features, labels)?;
        let n_samples = F::from_usize(features.nrows())
            .ok_or_else(|| ClassifierError::<F>::invalid("features", "too many samples"))?;

        Ok(DescentSteps {
            features,
            signs: labels.mapv(Label::to_float),
            weights: Array1::zeros(features.ncols()),
            update: Array1::zeros(features.ncols()),
            scale: self.alpha / n_samples,
            iteration: 0,
        })
    }

    /// Fits a weight vector to `features` and `labels`.
    ///
    /// Deterministic: the same inputs always produce the same weights.
    ///
    /// # Errors
    ///
    /// Besides the shape errors of [`GradientDescent::steps`]:
    ///
    /// * `ClassifierError::NonConvergence` once `max_iterations` updates have
    ///   been applied without one falling below the tolerance. It carries the
    ///   last weights so the caller can still use them.
    /// * `ClassifierError::NonFinite` if the update becomes NaN or infinite.
    pub fn fit(
        &self,
        features: ArrayView2<F>,
        labels: ArrayView1<Label>,
    ) -> Result<FitReport<F>, F> {
        debug!(
            "gradient descent on {}x{} samples: alpha = {}, tolerance = {:e}, max_iterations = {}",
            features.nrows(),
            features.ncols(),
            self.alpha,
            self.tolerance,
            self.max_iterations
        );
        let mut descent = self.steps(features, labels)?;

        loop {
            let step = descent.step()?;
            if step.update_norm < self.tolerance {
                info!(
                    "gradient descent converged after {} iterations (update norm {:e})",
                    step.iteration, step.update_norm
                );
                return Ok(FitReport {
                    weights: descent.weights,
                    iterations: step.iteration,
                    final_update: step.update_norm,
                });
            }
            if step.iteration >= self.max_iterations {
                warn!(
                    "gradient descent stopped at the {} iteration cap (update norm {:e})",
                    step.iteration, step.update_norm
                );
                return Err(ClassifierError::NonConvergence {
                    iterations: step.iteration,
                    last_update: step.update_norm,
                    weights: descent.weights,
                });
            }
        }
    }
}

impl<F: Float> Default for GradientDescent<F> {
    fn default() -> Self {
        Self {
            alpha: F::from_f64(Config::DEFAULT_ALPHA).unwrap_or_else(F::epsilon),
            tolerance: F::from_f64(Config::DEFAULT_TOLERANCE).unwrap_or_else(F::epsilon),
            max_iterations: Config::DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// An in-progress descent. See [`GradientDescent::steps`].
#[derive(Debug, Clone)]
pub struct DescentSteps<'a, F: Float> {
    features: ArrayView2<'a, F>,
    signs: Array1<F>,
    weights: Array1<F>,
    update: Array1<F>,
    scale: F,
    iteration: usize,
}

impl<F: Float> DescentSteps<'_, F> {
    /// Current weights.
    pub fn weights(&self) -> ArrayView1<'_, F> {
        self.weights.view()
    }

    /// Applies one update `w <- w - alpha * mean_i(-y_i * x_i * sigmoid(-y_i * w.x_i))`.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::NonFinite` if the update is not finite.
    pub fn step(&mut self) -> Result<Step<F>, F> {
        self.update.fill(F::zero());
        for (row, &sign) in self.features.rows().into_iter().zip(self.signs.iter()) {
            let margin = sign * row.dot(&self.weights);
            self.update.scaled_add(-sign * sigmoid(-margin), &row);
        }
        let scale = self.scale;
        self.update.mapv_inplace(|g| g * scale);
        self.weights -= &self.update;
        self.iteration += 1;

        let update_norm = self
            .update
            .mapv(num_traits::Float::abs)
            .max()
            .ok()
            .copied()
            .filter(|norm| norm.is_finite())
            .ok_or(ClassifierError::<F>::NonFinite {
                context: "gradient descent update",
            })?;
        trace!("iteration {}: update norm {:e}", self.iteration, update_norm);

        Ok(Step {
            iteration: self.iteration,
            update_norm,
        })
    }
}

impl<F: Float> Iterator for DescentSteps<'_, F> {
    type Item = Result<Step<F>, F>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.step())
    }
}

/// Logistic function, evaluated so that `exp` only ever sees non-positive arguments.
pub(crate) fn sigmoid<F: Float>(z: F) -> F {
    if z >= F::zero() {
        F::one() / (F::one() + (-z).exp())
    } else {
        let e = z.exp();
        e / (F::one() + e)
    }
}

fn check_positive<F: Float>(name: &'static str, value: F) -> Result<(), F> {
    if value.is_finite() && value > F::zero() {
        Ok(())
    } else {
        Err(ClassifierError::invalid(
            name,
            format!("must be a positive finite number, got {value}"),
        ))
    }
}

use log::debug;

use crate::{ClassifierError, Result};

/// Hyperparameters for both classifiers.
///
/// `alpha`, `tolerance` and `max_iterations` drive gradient descent; `k` is
/// the neighbor count of the k-NN classifier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate", default)
)]
pub struct Config {
    pub alpha: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub k: usize,
}

impl Config {
    pub const DEFAULT_ALPHA: f64 = 0.01;
    pub const DEFAULT_TOLERANCE: f64 = 1e-7;
    pub const DEFAULT_MAX_ITERATIONS: usize = 10_000_000;
    pub const DEFAULT_K: usize = 5;

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Checks every field against its domain.
    ///
    /// `k` can only be checked against zero here; the upper bound (the size of
    /// the reference set) is checked when the classifier is built.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::InvalidParameter` naming the first offending field.
    pub fn validate<F>(&self) -> Result<(), F> {
        check_positive::<F>("alpha", self.alpha)?;
        check_positive::<F>("tolerance", self.tolerance)?;
        if self.max_iterations == 0 {
            return Err(ClassifierError::invalid(
                "max_iterations",
                "must be at least 1",
            ));
        }
        if self.k == 0 {
            return Err(ClassifierError::invalid("k", "must be at least 1"));
        }
        debug!("validated {:?}", self);
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            tolerance: Self::DEFAULT_TOLERANCE,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            k: Self::DEFAULT_K,
        }
    }
}

fn check_positive<F>(name: &'static str, value: f64) -> Result<(), F> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ClassifierError::invalid(
            name,
            format!("must be a positive finite number, got {value}"),
        ))
    }
}

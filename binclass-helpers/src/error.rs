//! The error type shared by the loaders, the optimizer and both classifiers.

use ndarray::Array1;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T, F = f64> = std::result::Result<T, ClassifierError<F>>;

/// Errors that can occur while loading data, training or classifying.
///
/// `F` is the float type of the run; it only appears in
/// [`ClassifierError::NonConvergence`], which hands the best-so-far weights
/// back to the caller.
#[derive(Debug, Error)]
pub enum ClassifierError<F = f64> {
    /// A matrix or label file could not be read or parsed.
    #[error("failed to load data from {}: {reason}", .path.display())]
    DataLoad { path: PathBuf, reason: String },

    /// Predicted labels could not be written.
    #[error("failed to write labels to {}", .path.display())]
    DataWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Paired arguments disagree in shape.
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// A hyperparameter is outside its valid domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Gradient descent hit its iteration cap. `weights` is the last iterate.
    #[error(
        "gradient descent did not converge within {iterations} iterations \
         (last update norm {last_update})"
    )]
    NonConvergence {
        iterations: usize,
        last_update: F,
        weights: Array1<F>,
    },

    /// NaN or infinity showed up in the arithmetic, which means the input held one.
    #[error("non-finite value encountered in {context}")]
    NonFinite { context: &'static str },
}

impl<F> ClassifierError<F> {
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ClassifierError::DataLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ClassifierError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

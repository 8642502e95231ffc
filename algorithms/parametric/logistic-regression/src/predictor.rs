use binclass_helpers::{BinaryClassifier, ClassifierError, Float, Label, LabelVector, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Applies a weight vector to feature rows: `+1` where `x . w >= 0`, `-1` otherwise.
///
/// # Errors
///
/// Returns `ClassifierError::DimensionMismatch` if the matrix does not have one
/// column per weight.
pub fn predict<F: Float>(features: ArrayView2<F>, weights: ArrayView1<F>) -> Result<LabelVector, F> {
    Ok(scores(features, weights)?.mapv(Label::from_score))
}

fn scores<F: Float>(features: ArrayView2<F>, weights: ArrayView1<F>) -> Result<Array1<F>, F> {
    if features.ncols() != weights.len() {
        return Err(ClassifierError::DimensionMismatch {
            context: "linear predictor",
            expected: weights.len(),
            found: features.ncols(),
        });
    }
    Ok(features.dot(&weights))
}

/// A fitted linear model without intercept.
///
/// Usually obtained from [`crate::GradientDescent::fit`]; the weights cannot
/// be changed once the predictor exists.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPredictor<F: Float> {
    weights: Array1<F>,
}

impl<F: Float> LinearPredictor<F> {
    /// Wraps caller-supplied weights, e.g. the best-so-far weights of a
    /// descent that hit its iteration cap.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::DimensionMismatch` if `weights` is empty.
    pub fn from_weights(weights: Array1<F>) -> Result<Self, F> {
        if weights.is_empty() {
            return Err(ClassifierError::DimensionMismatch {
                context: "linear predictor",
                expected: 1,
                found: 0,
            });
        }
        Ok(Self { weights })
    }

    pub(crate) fn from_fitted(weights: Array1<F>) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> ArrayView1<'_, F> {
        self.weights.view()
    }

    /// Raw scores `x . w`, one per row.
    pub fn decision_function(&self, features: ArrayView2<F>) -> Result<Array1<F>, F> {
        scores(features, self.weights.view())
    }
}

impl<F: Float> BinaryClassifier<F> for LinearPredictor<F> {
    fn predict(&self, features: ArrayView2<F>) -> Result<LabelVector, F> {
        predict(features, self.weights.view())
    }

    fn name(&self) -> String {
        format!("logistic regression ({} weights)", self.weights.len())
    }

    fn n_features(&self) -> usize {
        self.weights.len()
    }
}

use ndarray::ArrayView2;

use crate::{Float, LabelVector, Result};

/// The common interface of every classifier in the workspace: given feature
/// rows, produce one label per row.
///
/// Trainable models (a fitted `LinearPredictor`) and reference-set models
/// (`KnnClassifier`) both implement it, so calling code does not care which
/// one it holds.
pub trait BinaryClassifier<F: Float> {
    /// Predicts a label for every row of `features`, in row order.
    fn predict(&self, features: ArrayView2<F>) -> Result<LabelVector, F>;

    /// Return the name of the classifier (e.g., "k-NN (k = 5)").
    fn name(&self) -> String;

    /// Number of feature columns the classifier expects.
    fn n_features(&self) -> usize;
}

impl<F: Float, C: BinaryClassifier<F> + ?Sized> BinaryClassifier<F> for Box<C> {
    fn predict(&self, features: ArrayView2<F>) -> Result<LabelVector, F> {
        (**self).predict(features)
    }

    fn name(&self) -> String {
        (**self).name()
    }

    fn n_features(&self) -> usize {
        (**self).n_features()
    }
}

//! Two binary classifiers for `-1`/`+1` labels: logistic regression trained by
//! batch gradient descent, and k-nearest neighbors with Euclidean distance.
//!
//! The algorithms live in their own crates; this crate re-exports them next
//! to the shared types and wires them to the label/matrix files.

pub mod pipeline;

pub use binclass_helpers::{
    check_features, check_labelled, distances, io, reduced_distances, BinaryClassifier,
    ClassifierError, Config, Distance, DistanceList, FeatureMatrix, Float, L2Dist, Label,
    LabelVector, Neighbor, Result,
};
pub use k_nn::{classify, KnnClassifier};
pub use logistic_regression::{
    fit, predict, DescentSteps, FitReport, GradientDescent, LinearPredictor, Step,
};

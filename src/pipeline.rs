//! Load, classify, write: the whole run for either classifier.

use std::path::PathBuf;

use log::{info, warn};

use crate::io::{load_labels, load_matrix, write_labels};
use crate::{
    BinaryClassifier, ClassifierError, Config, FeatureMatrix, GradientDescent, KnnClassifier,
    L2Dist, LabelVector, LinearPredictor, Result,
};

/// Where a run reads its inputs and writes its predictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub train_features: PathBuf,
    pub train_labels: PathBuf,
    pub test_features: PathBuf,
    pub output: PathBuf,
}

/// Training matrix, training labels and test matrix of one run.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub train_features: FeatureMatrix<f64>,
    pub train_labels: LabelVector,
    pub test_features: FeatureMatrix<f64>,
}

impl Dataset {
    /// # Errors
    ///
    /// Returns the first `ClassifierError::DataLoad` raised by the loaders.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        Ok(Self {
            train_features: load_matrix(&paths.train_features)?,
            train_labels: load_labels::<f64>(&paths.train_labels)?,
            test_features: load_matrix(&paths.test_features)?,
        })
    }
}

/// Fits logistic regression on the training set and writes test predictions.
///
/// With `accept_unconverged`, hitting the iteration cap is not fatal: the
/// best-so-far weights are used and a warning is logged.
pub fn run_logistic_regression(
    paths: &DataPaths,
    config: &Config,
    accept_unconverged: bool,
) -> Result<LabelVector> {
    config.validate::<f64>()?;
    let optimizer = GradientDescent::<f64>::from_config(config)?;
    let data = Dataset::load(paths)?;

    let predictor = match optimizer.fit(data.train_features.view(), data.train_labels.view()) {
        Ok(report) => report.into_predictor(),
        Err(ClassifierError::NonConvergence {
            iterations,
            last_update,
            weights,
        }) if accept_unconverged => {
            warn!(
                "using unconverged weights after {iterations} iterations (last update norm {last_update:e})"
            );
            LinearPredictor::from_weights(weights)?
        }
        Err(e) => return Err(e),
    };

    predict_and_write(&predictor, &data, paths)
}

/// Classifies the test set against the training set with k-NN and writes the
/// predictions.
pub fn run_knn(paths: &DataPaths, config: &Config) -> Result<LabelVector> {
    config.validate::<f64>()?;
    let data = Dataset::load(paths)?;
    let classifier = KnnClassifier::new(
        config.k,
        data.train_features.clone(),
        data.train_labels.clone(),
        L2Dist,
    )?;

    predict_and_write(&classifier, &data, paths)
}

fn predict_and_write(
    classifier: &dyn BinaryClassifier<f64>,
    data: &Dataset,
    paths: &DataPaths,
) -> Result<LabelVector> {
    let predictions = classifier.predict(data.test_features.view())?;
    write_labels::<f64>(&paths.output, predictions.view())?;

    let positives = predictions
        .iter()
        .filter(|label| label.sign() > 0)
        .count();
    info!(
        "{}: wrote {} predictions ({} positive) to {}",
        classifier.name(),
        predictions.len(),
        positives,
        paths.output.display()
    );
    Ok(predictions)
}

use std::cmp::Ordering;

use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
// These are the core components from our shared library.
use binclass_helpers::{
    check_labelled, reduced_distances, BinaryClassifier, ClassifierError, Distance, DistanceList,
    Float, L2Dist, Label, LabelVector, Neighbor, Result,
};

/// A k-Nearest Neighbors (k-NN) classifier for `-1`/`+1` labels.
///
/// This classifier predicts the label of a new data point by finding the `k`
/// closest points of its reference set and taking a majority vote among their
/// labels. There is no training step: the reference set is the model.
///
/// # Type Parameters
///
/// * `F`: The float type for the features (e.g., `f32`, `f64`).
/// * `D`: The distance metric, which must implement the `Distance` trait.
#[derive(Debug, Clone)]
pub struct KnnClassifier<F, D = L2Dist>
where
    F: Float,
    D: Distance<F>,
{
    k: usize,
    features: Array2<F>,
    labels: LabelVector,
    distance: D,
}

impl<F, D> KnnClassifier<F, D>
where
    F: Float,
    D: Distance<F>,
{
    /// Creates a new k-NN classifier.
    ///
    /// # Arguments
    ///
    /// * `k`: The number of neighbors to consider for classification. Must be between 1 and the number of reference rows.
    /// * `features`: The reference points, one per row.
    /// * `labels`: One label per reference row.
    /// * `distance`: An instance of a struct that implements the `Distance` trait (e.g., `L2Dist`).
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::InvalidParameter` if `k` is 0 or larger than the
    /// reference set (or the set is empty), and `ClassifierError::DimensionMismatch`
    /// if there is not exactly one label per row.
    pub fn new(
        k: usize,
        features: Array2<F>,
        labels: LabelVector,
        distance: D,
    ) -> Result<Self, F> {
        check_labelled("k-NN reference set", features.view(), labels.view())?;
        check_k::<F>(k, features.nrows())?;
        Ok(Self {
            k,
            features,
            labels,
            distance,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// The `k` reference rows closest to `query`, nearest first.
    ///
    /// Equal distances are ordered by reference row index.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::DimensionMismatch` if `query` has the wrong
    /// length, and `ClassifierError::NonFinite` if a distance is NaN.
    pub fn neighbors(&self, query: ArrayView1<F>) -> Result<DistanceList<F>, F> {
        nearest(self.k, self.features.view(), query, &self.distance)
    }

    /// Predicts the label for a single point.
    ///
    /// Returns `+1` only if the neighbor labels sum to a strictly positive
    /// value; a tied vote is `-1`.
    pub fn predict_point(&self, query: ArrayView1<F>) -> Result<Label, F> {
        let neighbors = self.neighbors(query)?;
        Ok(vote(&neighbors, self.labels.view()))
    }
}

impl<F, D> BinaryClassifier<F> for KnnClassifier<F, D>
where
    F: Float,
    D: Distance<F>,
{
    fn predict(&self, features: ArrayView2<F>) -> Result<LabelVector, F> {
        check_columns(self.features.view(), features)?;
        predict_rows(
            self.k,
            self.features.view(),
            self.labels.view(),
            features,
            &self.distance,
        )
    }

    fn name(&self) -> String {
        format!("k-NN (k = {})", self.k)
    }

    fn n_features(&self) -> usize {
        self.features.ncols()
    }
}

/// Classifies every row of `test` by majority vote of its `k` nearest
/// training rows under Euclidean distance.
///
/// Works on borrowed data; nothing is copied or retained between calls.
///
/// # Errors
///
/// * `ClassifierError::InvalidParameter` if `k` is 0 or exceeds the number of training rows.
/// * `ClassifierError::DimensionMismatch` if the label count differs from the
///   training row count, or the test columns differ from the training columns.
/// * `ClassifierError::NonFinite` if a distance is NaN.
pub fn classify<F: Float>(
    train: ArrayView2<F>,
    labels: ArrayView1<Label>,
    test: ArrayView2<F>,
    k: usize,
) -> Result<LabelVector, F> {
    check_labelled("k-NN reference set", train, labels)?;
    check_k::<F>(k, train.nrows())?;
    check_columns(train, test)?;
    predict_rows(k, train, labels, test, &L2Dist)
}

fn predict_rows<F: Float, D: Distance<F>>(
    k: usize,
    train: ArrayView2<F>,
    labels: ArrayView1<Label>,
    test: ArrayView2<F>,
    distance: &D,
) -> Result<LabelVector, F> {
    debug!(
        "k-NN: classifying {} rows against {} references (k = {})",
        test.nrows(),
        train.nrows(),
        k
    );
    let mut predictions = Vec::with_capacity(test.nrows());
    for (row, query) in test.rows().into_iter().enumerate() {
        let neighbors = nearest(k, train, query, distance)?;
        let label = vote(&neighbors, labels);
        trace!("row {row}: neighbors {neighbors:?} -> {label}");
        predictions.push(label);
    }
    Ok(Array1::from(predictions))
}

/// Ranks the references by (distance, index) and keeps the first `k`.
///
/// Ranking happens on the reduced distance; only the kept entries are
/// converted back.
fn nearest<F: Float, D: Distance<F>>(
    k: usize,
    references: ArrayView2<F>,
    query: ArrayView1<F>,
    distance: &D,
) -> Result<DistanceList<F>, F> {
    let mut neighbors = reduced_distances(query, references, distance)?;
    if neighbors.iter().any(|n| n.distance.is_nan()) {
        return Err(ClassifierError::NonFinite {
            context: "k-NN distance",
        });
    }

    if k < neighbors.len() {
        neighbors.select_nth_unstable_by(k - 1, by_distance_then_index);
        neighbors.truncate(k);
    }
    neighbors.sort_unstable_by(by_distance_then_index);
    for neighbor in &mut neighbors {
        neighbor.distance = distance.rdist_to_dist(neighbor.distance);
    }
    Ok(neighbors)
}

// NaN has been ruled out by the caller, so the fallback never applies.
fn by_distance_then_index<F: Float>(a: &Neighbor<F>, b: &Neighbor<F>) -> Ordering {
    a.distance
        .partial_cmp(&b.distance)
        .unwrap_or(Ordering::Equal)
        .then(a.index.cmp(&b.index))
}

fn vote<F>(neighbors: &[Neighbor<F>], labels: ArrayView1<Label>) -> Label {
    let sum: i32 = neighbors
        .iter()
        .map(|n| i32::from(labels[n.index].sign()))
        .sum();
    if sum > 0 {
        Label::Positive
    } else {
        Label::Negative
    }
}

fn check_k<F>(k: usize, n_references: usize) -> Result<(), F> {
    if k == 0 {
        return Err(ClassifierError::invalid(
            "k",
            "k cannot be zero for a k-NN classifier",
        ));
    }
    if k > n_references {
        return Err(ClassifierError::invalid(
            "k",
            format!("k = {k} exceeds the {n_references} reference points"),
        ));
    }
    Ok(())
}

fn check_columns<F>(train: ArrayView2<F>, test: ArrayView2<F>) -> Result<(), F> {
    if train.ncols() != test.ncols() {
        return Err(ClassifierError::DimensionMismatch {
            context: "k-NN test set",
            expected: train.ncols(),
            found: test.ncols(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    use binclass_helpers::Label::{Negative as N, Positive as P};

    fn diagonal_data() -> (Array2<f64>, LabelVector) {
        (
            array![[1.0, 1.0], [2.0, 2.0], [-1.0, -1.0], [-2.0, -2.0]],
            array![P, P, N, N],
        )
    }

    #[test]
    fn test_knn_classification_simple() {
        // Define training data
        let features = array![
            [1.0, 1.0],
            [2.0, 2.0],
            [1.0, 2.0],
            [8.0, 8.0],
            [9.0, 8.0],
            [8.0, 9.0],
        ];
        let labels = array![P, P, P, N, N, N];

        // Create a classifier with k=3 and L2 (Euclidean) distance
        let classifier = KnnClassifier::new(3, features, labels, L2Dist).unwrap();

        // Point close to the positive class
        assert_eq!(classifier.predict_point(array![2.5, 2.5].view()).unwrap(), P);

        // Point close to the negative class
        assert_eq!(classifier.predict_point(array![7.5, 8.5].view()).unwrap(), N);
    }

    #[test]
    fn test_three_nearest_of_diagonal_set() {
        let (x, y) = diagonal_data();
        let test = array![[1.5, 1.5]];

        let classifier = KnnClassifier::new(3, x.clone(), y.clone(), L2Dist).unwrap();
        let neighbors = classifier.neighbors(test.row(0)).unwrap();
        let indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        // Reported distances are Euclidean, not squared.
        let expected = [0.5_f64.sqrt(), 0.5_f64.sqrt(), 12.5_f64.sqrt()];
        for (neighbor, want) in neighbors.iter().zip(expected) {
            assert!((neighbor.distance - want).abs() < 1e-12);
        }

        assert_eq!(classify(x.view(), y.view(), test.view(), 3).unwrap(), array![P]);
    }

    #[test]
    fn test_training_point_classifies_as_itself_with_k_one() {
        let features = array![[0.0, 0.0], [0.1, 0.0], [5.0, 5.0], [5.0, 5.1], [2.5, 2.4]];
        let labels = array![N, P, P, N, P];
        let predictions = classify(features.view(), labels.view(), features.view(), 1).unwrap();
        assert_eq!(predictions, labels);
    }

    #[test]
    fn test_tied_vote_is_negative() {
        // Two neighbors at equal distance, one of each label.
        let features = array![[1.0], [-1.0], [10.0], [-10.0]];
        let labels = array![P, N, P, N];
        let test = array![[0.0]];
        assert_eq!(classify(features.view(), labels.view(), test.view(), 2).unwrap(), array![N]);
        assert_eq!(classify(features.view(), labels.view(), test.view(), 4).unwrap(), array![N]);

        // Order of the reference rows does not matter for a tie.
        let labels = array![N, P, N, P];
        assert_eq!(classify(features.view(), labels.view(), test.view(), 2).unwrap(), array![N]);
    }

    #[test]
    fn test_equal_distances_prefer_lower_index() {
        // Rows 1 and 2 are the same point with different labels.
        let features = array![[9.0, 9.0], [1.0, 0.0], [1.0, 0.0], [0.0, 3.0]];
        let query = array![0.0, 0.0];

        let labels = array![P, N, P, P];
        let classifier = KnnClassifier::new(1, features.clone(), labels, L2Dist).unwrap();
        assert_eq!(classifier.predict_point(query.view()).unwrap(), N);

        let labels = array![N, P, N, N];
        let classifier = KnnClassifier::new(1, features.clone(), labels, L2Dist).unwrap();
        assert_eq!(classifier.predict_point(query.view()).unwrap(), P);

        let classifier = KnnClassifier::new(3, features, array![P, N, P, P], L2Dist).unwrap();
        let indices: Vec<usize> = classifier
            .neighbors(query.view())
            .unwrap()
            .iter()
            .map(|n| n.index)
            .collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_predictions_follow_test_row_order() {
        let (x, y) = diagonal_data();
        let test = array![[-3.0, -3.0], [3.0, 3.0], [-0.5, -0.1], [0.2, 0.9]];
        let classifier = KnnClassifier::new(1, x, y, L2Dist).unwrap();
        assert_eq!(classifier.predict(test.view()).unwrap(), array![N, P, N, P]);
        assert_eq!(classifier.name(), "k-NN (k = 1)");
    }

    #[test]
    fn test_error_on_k_zero() {
        let (x, y) = diagonal_data();
        let result = KnnClassifier::new(0, x.clone(), y.clone(), L2Dist);
        assert!(matches!(
            result,
            Err(ClassifierError::InvalidParameter { name: "k", .. })
        ));
        let result = classify(x.view(), y.view(), x.view(), 0);
        assert!(matches!(
            result,
            Err(ClassifierError::InvalidParameter { name: "k", .. })
        ));
    }

    #[test]
    fn test_error_on_k_larger_than_dataset() {
        let (x, y) = diagonal_data();
        let result = KnnClassifier::new(5, x.clone(), y.clone(), L2Dist);
        assert!(matches!(
            result,
            Err(ClassifierError::InvalidParameter { name: "k", .. })
        ));
        assert!(KnnClassifier::new(4, x, y, L2Dist).is_ok());
    }

    #[test]
    fn test_error_on_empty_training_set() {
        let features = Array2::<f64>::zeros((0, 2));
        let labels: LabelVector = Array1::from(vec![]);
        let result = KnnClassifier::new(1, features, labels, L2Dist);
        assert!(result.is_err());
    }

    #[test]
    fn test_dimension_errors() {
        let (x, y) = diagonal_data();

        let wide = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            classify(x.view(), y.view(), wide.view(), 1),
            Err(ClassifierError::DimensionMismatch {
                expected: 2,
                found: 3,
                ..
            })
        ));

        let short = array![P, N];
        assert!(matches!(
            classify(x.view(), short.view(), x.view(), 1),
            Err(ClassifierError::DimensionMismatch {
                expected: 4,
                found: 2,
                ..
            })
        ));

        let classifier = KnnClassifier::new(1, x, y, L2Dist).unwrap();
        assert!(matches!(
            classifier.predict_point(array![1.0].view()),
            Err(ClassifierError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            classifier.predict(wide.view()),
            Err(ClassifierError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_nan_distance_is_reported() {
        let (x, y) = diagonal_data();
        let test = array![[f64::NAN, 0.0]];
        assert!(matches!(
            classify(x.view(), y.view(), test.view(), 3),
            Err(ClassifierError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_f32_features() {
        let features = array![[0.0_f32], [1.0], [10.0]];
        let labels = array![N, N, P];
        let test = array![[0.4_f32], [9.0]];
        assert_eq!(
            classify(features.view(), labels.view(), test.view(), 1).unwrap(),
            array![N, P]
        );
    }
}

//! Example demonstrating error handling with the k-NN classifier.
//!
//! Every precondition violation comes back as a `ClassifierError` value
//! instead of a panic.

use binclass_helpers::{BinaryClassifier, ClassifierError, L2Dist, Label};
use k_nn::{classify, KnnClassifier};
use ndarray::{array, Array1, Array2};

fn main() {
    println!("k-NN Classifier Error Handling Examples");
    println!("=======================================");

    let features = array![[1.0, 1.0], [2.0, 2.0], [-1.0, -1.0], [-2.0, -2.0]];
    let labels = array![
        Label::Positive,
        Label::Positive,
        Label::Negative,
        Label::Negative
    ];

    // Example 1: Handle invalid k value
    println!("\n1. Handling invalid k values (k = 0 and k > n):");
    for k in [0, 5] {
        match KnnClassifier::new(k, features.clone(), labels.clone(), L2Dist) {
            Ok(_) => println!("   Classifier created successfully"),
            Err(e @ ClassifierError::InvalidParameter { .. }) => {
                println!("   ✓ Caught expected error: {e}")
            }
            Err(e) => println!("   ✗ Unexpected error: {e}"),
        }
    }

    // Example 2: Handle empty training set
    println!("\n2. Handling empty training set:");
    let empty: Array2<f64> = Array2::zeros((0, 2));
    let no_labels: Array1<Label> = Array1::from(vec![]);
    match KnnClassifier::new(1, empty, no_labels, L2Dist) {
        Ok(_) => println!("   ✗ Classifier created with empty training set"),
        Err(e) => println!("   ✓ Caught expected error: {e}"),
    }

    // Example 3: Mismatched test columns
    println!("\n3. Handling a test set with the wrong number of columns:");
    let wide = array![[1.0, 2.0, 3.0]];
    match classify(features.view(), labels.view(), wide.view(), 3) {
        Ok(predicted) => println!("   ✗ Unexpected predictions: {predicted}"),
        Err(e) => println!("   ✓ Caught expected error: {e}"),
    }

    // Example 4: Successful prediction with proper error handling
    println!("\n4. Successful prediction with error handling:");
    match KnnClassifier::new(3, features.clone(), labels.clone(), L2Dist) {
        Ok(classifier) => {
            println!("   ✓ {} created successfully", classifier.name());
            let test = array![[1.5, 1.5], [-0.5, -1.5]];
            match classifier.predict(test.view()) {
                Ok(predicted) => println!("   ✓ Predictions: {predicted}"),
                Err(e) => println!("   ✗ Prediction failed: {e}"),
            }
        }
        Err(e) => println!("   ✗ Failed to create classifier: {e}"),
    }

    // Example 5: Demonstrate error propagation in a function
    println!("\n5. Error propagation in functions:");

    fn classify_with_error_handling() -> Result<Label, ClassifierError> {
        let features = array![[1.0], [-1.0]];
        let labels = array![Label::Positive, Label::Negative];
        let classifier = KnnClassifier::new(1, features, labels, L2Dist)?;
        classifier.predict_point(array![0.5].view())
    }

    match classify_with_error_handling() {
        Ok(result) => println!("   ✓ Classification result: {result}"),
        Err(e) => println!("   ✗ Classification failed: {e}"),
    }
}

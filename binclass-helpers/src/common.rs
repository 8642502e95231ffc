use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::fmt::{Display, Formatter};

use crate::{ClassifierError, Float, Result};

/// Rows are samples, columns are features.
pub type FeatureMatrix<F> = Array2<F>;

/// One [`Label`] per sample.
pub type LabelVector = Array1<Label>;

/// A binary class label, `-1` or `+1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate", into = "i8", try_from = "i8")
)]
#[repr(i8)]
pub enum Label {
    Negative = -1,
    Positive = 1,
}

impl Label {
    /// `+1` for [`Label::Positive`], `-1` for [`Label::Negative`].
    pub fn sign(self) -> i8 {
        self as i8
    }

    pub fn to_float<F: Float>(self) -> F {
        match self {
            Label::Positive => F::one(),
            Label::Negative => -F::one(),
        }
    }

    /// Sign rule shared by the linear predictor: a score of exactly zero is positive.
    pub fn from_score<F: Float>(score: F) -> Self {
        if score >= F::zero() {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    /// Parses a numeric label; anything but exactly `1` or `-1` is rejected.
    pub fn from_value<F: Float>(value: F) -> Option<Self> {
        if value == F::one() {
            Some(Label::Positive)
        } else if value == -F::one() {
            Some(Label::Negative)
        } else {
            None
        }
    }
}

impl From<Label> for i8 {
    fn from(label: Label) -> Self {
        label.sign()
    }
}

impl TryFrom<i8> for Label {
    type Error = String;

    fn try_from(value: i8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Label::Positive),
            -1 => Ok(Label::Negative),
            other => Err(format!("label must be 1 or -1, got {other}")),
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sign())
    }
}

/// Checks that a feature matrix has at least one row and one column.
pub fn check_features<F: Float>(
    context: &'static str,
    features: ArrayView2<F>,
) -> Result<(), F> {
    if features.ncols() == 0 {
        return Err(ClassifierError::DimensionMismatch {
            context,
            expected: 1,
            found: 0,
        });
    }
    if features.nrows() == 0 {
        return Err(ClassifierError::invalid(
            "features",
            format!("{context} needs at least one sample"),
        ));
    }
    Ok(())
}

/// Checks a training pair: a non-empty matrix with exactly one label per row.
pub fn check_labelled<F: Float>(
    context: &'static str,
    features: ArrayView2<F>,
    labels: ArrayView1<Label>,
) -> Result<(), F> {
    check_features(context, features)?;
    if labels.len() != features.nrows() {
        return Err(ClassifierError::DimensionMismatch {
            context,
            expected: features.nrows(),
            found: labels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_label_values() {
        assert_eq!(Label::Positive.sign(), 1);
        assert_eq!(Label::Negative.sign(), -1);
        assert_eq!(Label::Negative.to_float::<f64>(), -1.0);
        assert_eq!(Label::Positive.to_string(), "1");
        assert_eq!(Label::Negative.to_string(), "-1");
    }

    #[test]
    fn test_label_parsing_is_exact() {
        assert_eq!(Label::from_value(1.0_f64), Some(Label::Positive));
        assert_eq!(Label::from_value(-1.0_f32), Some(Label::Negative));
        assert_eq!(Label::from_value(0.0_f64), None);
        assert_eq!(Label::from_value(0.999_f64), None);
        assert_eq!(Label::from_value(2.0_f64), None);
        assert!(Label::try_from(0_i8).is_err());
        assert_eq!(Label::try_from(-1_i8), Ok(Label::Negative));
    }

    #[test]
    fn test_zero_score_is_positive() {
        assert_eq!(Label::from_score(0.0_f64), Label::Positive);
        assert_eq!(Label::from_score(-1e-12_f64), Label::Negative);
    }

    #[test]
    fn test_check_labelled() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![Label::Positive, Label::Negative];
        assert!(check_labelled("fit", x.view(), y.view()).is_ok());

        let short = array![Label::Positive];
        assert!(matches!(
            check_labelled("fit", x.view(), short.view()),
            Err(ClassifierError::DimensionMismatch {
                expected: 2,
                found: 1,
                ..
            })
        ));

        let empty = Array2::<f64>::zeros((0, 2));
        let no_labels: LabelVector = Array1::from(vec![]);
        assert!(matches!(
            check_labelled("fit", empty.view(), no_labels.view()),
            Err(ClassifierError::InvalidParameter { .. })
        ));

        let no_columns = Array2::<f64>::zeros((2, 0));
        assert!(matches!(
            check_features("fit", no_columns.view()),
            Err(ClassifierError::DimensionMismatch { .. })
        ));
    }
}

use ndarray::{NdFloat, ScalarOperand};

use num_traits::{AsPrimitive, FromPrimitive, Signed};

use std::iter::Sum;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

// Include submodules
mod classifier;
mod common;
mod config;
mod distance;
mod error;
pub mod io;

// Re-export types from submodules
pub use classifier::BinaryClassifier;
pub use common::{check_features, check_labelled, FeatureMatrix, Label, LabelVector};
pub use config::Config;
pub use distance::{distances, reduced_distances, Distance, DistanceList, L2Dist, Neighbor};
pub use error::{ClassifierError, Result};

/// Scalar type shared by every algorithm crate in the workspace.
///
/// Implemented for `f32` and `f64`.
pub trait Float:
    NdFloat
    + FromPrimitive
    + Default
    + Signed
    + Sum
    + AsPrimitive<usize>
    + for<'a> AddAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> DivAssign<&'a Self>
    + num_traits::MulAdd<Output = Self>
    + ScalarOperand
    + std::marker::Unpin
{
}

impl Float for f32 {}

impl Float for f64 {}

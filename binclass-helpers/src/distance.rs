use ndarray::{ArrayView1, ArrayView2, Zip};

use crate::{ClassifierError, Float, Result};

/// A distance metric between two feature vectors of equal length.
///
/// `rdistance` is a cheaper, order-preserving "reduced" form of the distance
/// (for Euclidean distance, the squared distance). Implementations that have
/// no cheaper form can rely on the defaults.
pub trait Distance<F: Float>: Clone + Send + Sync {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F;

    fn rdistance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        self.distance(a, b)
    }

    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist
    }

    fn dist_to_rdist(&self, dist: F) -> F {
        dist
    }
}

/// Euclidean distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L2Dist;

impl<F: Float> Distance<F> for L2Dist {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        self.rdist_to_dist(self.rdistance(a, b))
    }

    fn rdistance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        Zip::from(&a).and(&b).fold(F::zero(), |acc, &x, &y| {
            let diff = x - y;
            acc + diff * diff
        })
    }

    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist.sqrt()
    }

    fn dist_to_rdist(&self, dist: F) -> F {
        dist * dist
    }
}

/// Distance from a query to one reference row, tagged with the row's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<F> {
    pub distance: F,
    pub index: usize,
}

/// Per-query list of neighbors, in reference row order until it is ranked.
pub type DistanceList<F> = Vec<Neighbor<F>>;

/// Computes the distance from `query` to every row of `references`.
///
/// Entry `i` of the result belongs to reference row `i`.
///
/// # Errors
///
/// Returns `ClassifierError::DimensionMismatch` if `query` does not have one
/// element per reference column.
pub fn distances<F, D>(
    query: ArrayView1<F>,
    references: ArrayView2<F>,
    metric: &D,
) -> Result<DistanceList<F>, F>
where
    F: Float,
    D: Distance<F>,
{
    let mut list = reduced_distances(query, references, metric)?;
    for neighbor in &mut list {
        neighbor.distance = metric.rdist_to_dist(neighbor.distance);
    }
    Ok(list)
}

/// Like [`distances`], but in the metric's reduced form, which ranks rows
/// the same way without the final conversion.
///
/// # Errors
///
/// Same as [`distances`].
pub fn reduced_distances<F, D>(
    query: ArrayView1<F>,
    references: ArrayView2<F>,
    metric: &D,
) -> Result<DistanceList<F>, F>
where
    F: Float,
    D: Distance<F>,
{
    if query.len() != references.ncols() {
        return Err(ClassifierError::DimensionMismatch {
            context: "distances",
            expected: references.ncols(),
            found: query.len(),
        });
    }

    Ok(references
        .rows()
        .into_iter()
        .enumerate()
        .map(|(index, row)| Neighbor {
            distance: metric.rdistance(query, row),
            index,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_l2_distance() {
        let a = array![0.0, 0.0];
        let b = array![3.0, 4.0];
        assert_abs_diff_eq!(L2Dist.distance(a.view(), b.view()), 5.0);
        assert_abs_diff_eq!(L2Dist.rdistance(a.view(), b.view()), 25.0);
        assert_abs_diff_eq!(Distance::<f64>::dist_to_rdist(&L2Dist, 5.0), 25.0);
    }

    #[test]
    fn test_distances_keep_reference_order() {
        let references = array![[1.0, 1.0], [2.0, 2.0], [-1.0, -1.0], [-2.0, -2.0]];
        let query = array![1.5, 1.5];
        let list = distances(query.view(), references.view(), &L2Dist).unwrap();

        assert_eq!(list.len(), 4);
        for (i, neighbor) in list.iter().enumerate() {
            assert_eq!(neighbor.index, i);
        }
        assert_abs_diff_eq!(list[0].distance, 0.5_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(list[1].distance, 0.5_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(list[2].distance, 12.5_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(list[3].distance, 24.5_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_reduced_distances_are_squared() {
        let references = array![[1.0, 1.0], [4.0, 5.0]];
        let query = array![1.0, 1.0];
        let reduced = reduced_distances(query.view(), references.view(), &L2Dist).unwrap();
        let full = distances(query.view(), references.view(), &L2Dist).unwrap();

        assert_abs_diff_eq!(reduced[0].distance, 0.0);
        assert_abs_diff_eq!(reduced[1].distance, 25.0);
        assert_abs_diff_eq!(full[1].distance, 5.0);
        for (r, f) in reduced.iter().zip(&full) {
            assert_eq!(r.index, f.index);
            assert_abs_diff_eq!(Distance::<f64>::rdist_to_dist(&L2Dist, r.distance), f.distance);
        }
    }

    #[test]
    fn test_distances_reject_wrong_query_length() {
        let references = array![[1.0, 1.0], [2.0, 2.0]];
        for query in [array![1.0], array![1.0, 2.0, 3.0]] {
            let result = distances(query.view(), references.view(), &L2Dist);
            assert!(matches!(
                result,
                Err(ClassifierError::DimensionMismatch { expected: 2, .. })
            ));
            let result = reduced_distances(query.view(), references.view(), &L2Dist);
            assert!(result.is_err());
        }
    }
}

use pulp::{Arch, Simd, WithSimd};

/// SQUARED EUCLIDEAN DISTANCE
///
/// d(p,q)^2 = sum((p_i - q_i)^2)
///
/// Every cluster validity index in this crate is defined in terms of squared
/// distances; the square root is taken only where an index's own definition
/// calls for it (Dunn, and the centroid-distance deltas of Generalized Dunn).
/// Operating on the square keeps the hot path free of a transcendental call.
struct SquaredEuclidean<'a> {
    first: &'a [f64],
    second: &'a [f64],
}

impl WithSimd for SquaredEuclidean<'_> {
    type Output = f64;

    #[inline(always)]
    fn with_simd<S: Simd>(self, simd: S) -> Self::Output {
        let (first_head, first_tail) = S::as_simd_f64s(self.first);
        let (second_head, second_tail) = S::as_simd_f64s(self.second);

        let mut sum_of_squares = simd.splat_f64s(0.0);
        for (&coord_first, &coord_second) in first_head.iter().zip(second_head) {
            let diff = simd.sub_f64s(coord_first, coord_second);
            sum_of_squares = simd.mul_add_f64s(diff, diff, sum_of_squares);
        }

        let mut total = simd.reduce_sum_f64s(sum_of_squares);
        total += first_tail
            .iter()
            .zip(second_tail)
            .map(|(&x, &y)| {
                let diff = x - y;
                diff * diff
            })
            .sum::<f64>();

        total
    }
}

#[tracing::instrument(skip_all)]
pub fn squared_euclidean_distance(first: &[f64], second: &[f64]) -> f64 {
    assert_eq!(
        first.len(),
        second.len(),
        "points must have the same dimensionality"
    );

    let arch = Arch::new();
    arch.dispatch(SquaredEuclidean { first, second })
}

/// Plain Euclidean distance, for the handful of index definitions (Dunn,
/// Generalized Dunn's centroid-distance deltas) that take the root.
#[tracing::instrument(skip_all)]
pub fn euclidean_distance(first: &[f64], second: &[f64]) -> f64 {
    squared_euclidean_distance(first, second).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn squared_distance_matches_definition() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.0, 2.0, 2.0];
        assert_eq!(squared_euclidean_distance(&a, &b), 9.0);
        assert_eq!(euclidean_distance(&a, &b), 3.0);
    }

    #[test]
    fn zero_distance_to_self() {
        let a = [3.5, -1.25, 42.0, 7.0, -7.0];
        assert_eq!(squared_euclidean_distance(&a, &a), 0.0);
    }

    #[test]
    fn odd_length_uses_scalar_tail() {
        let a = [1.0, 1.0, 1.0, 1.0, 1.0];
        let b = [0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(squared_euclidean_distance(&a, &b), 5.0);
    }
}

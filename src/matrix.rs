//! Row-major point matrix with an optional precomputed squared-distance cache.
//!
//! Grounded on `cvi_gamma.h`/`common.h` from the originating implementation:
//! a fixed n×d buffer of points, a `CVI_MAX_N_PRECOMPUTE_DISTANCE` threshold
//! below which all pairwise squared distances are computed once, and squared
//! Euclidean distance as the primitive every index builds on.

use crate::distance::squared_euclidean_distance;
use crate::error::CviError;

/// Above this point count, the full pairwise distance matrix is not
/// precomputed; distances are instead recomputed on every access. Matches
/// `CVI_MAX_N_PRECOMPUTE_DISTANCE` in the originating C++ implementation.
pub const MAX_N_PRECOMPUTE_DISTANCE: usize = 10_000;

/// Row-major n×d view over a point buffer, with an optional packed
/// upper-triangular cache of all n(n-1)/2 squared pairwise distances.
pub struct PointMatrix {
    data: Vec<f64>,
    n: usize,
    d: usize,
    dist_cache: Option<Vec<f64>>,
}

impl PointMatrix {
    /// `data` must be row-major with exactly `n * d` entries.
    pub fn new(data: Vec<f64>, n: usize, d: usize) -> Result<Self, CviError> {
        let expected = n * d;
        if data.len() != expected {
            return Err(CviError::ShapeMismatch {
                expected,
                found: data.len(),
            });
        }

        let dist_cache = if n <= MAX_N_PRECOMPUTE_DISTANCE {
            Some(Self::precompute(&data, n, d))
        } else {
            None
        };

        Ok(Self {
            data,
            n,
            d,
            dist_cache,
        })
    }

    fn precompute(data: &[f64], n: usize, d: usize) -> Vec<f64> {
        let mut cache = vec![0.0; tri_len(n)];
        for i in 0..n {
            for j in (i + 1)..n {
                let dist = squared_euclidean_distance(row(data, d, i), row(data, d, j));
                cache[tri_index(n, i, j)] = dist;
            }
        }
        cache
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn d(&self) -> usize {
        self.d
    }

    pub fn row(&self, i: usize) -> &[f64] {
        row(&self.data, self.d, i)
    }

    /// Squared Euclidean distance between rows `i` and `j`. Zero when `i == j`.
    pub fn sq_dist(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return 0.0;
        }
        match &self.dist_cache {
            Some(cache) => cache[tri_index(self.n, i, j)],
            None => squared_euclidean_distance(self.row(i), self.row(j)),
        }
    }

    pub fn dist(&self, i: usize, j: usize) -> f64 {
        self.sq_dist(i, j).sqrt()
    }
}

fn row(data: &[f64], d: usize, i: usize) -> &[f64] {
    &data[i * d..(i + 1) * d]
}

fn tri_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Packed index of the (i, j) entry, i < j, in a row-major upper-triangular
/// layout with no diagonal.
fn tri_index(n: usize, i: usize, j: usize) -> usize {
    debug_assert!(i < j && j < n);
    // signed arithmetic avoids usize underflow for i == 0
    let (n, i, j) = (n as i64, i as i64, j as i64);
    let offset = i * (n - 1) - i * (i - 1) / 2;
    (offset + (j - i - 1)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_mismatched_buffer_length() {
        let err = PointMatrix::new(vec![0.0, 1.0, 2.0], 2, 2).unwrap_err();
        assert_eq!(
            err,
            CviError::ShapeMismatch {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn diagonal_is_zero_and_matrix_is_symmetric() {
        let m = PointMatrix::new(vec![0.0, 0.0, 3.0, 4.0, 6.0, 8.0], 3, 2).unwrap();
        assert_eq!(m.sq_dist(0, 0), 0.0);
        assert_eq!(m.sq_dist(0, 1), 25.0);
        assert_eq!(m.sq_dist(1, 0), 25.0);
        assert_eq!(m.dist(0, 2), 10.0);
    }

    #[test]
    fn uncached_path_matches_cached_path() {
        let data = vec![0.0, 0.0, 1.0, 1.0, 2.0, 5.0];
        let cached = PointMatrix::new(data.clone(), 3, 2).unwrap();
        let mut uncached = PointMatrix::new(data, 3, 2).unwrap();
        uncached.dist_cache = None;
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(cached.sq_dist(i, j), uncached.sq_dist(i, j));
            }
        }
    }
}

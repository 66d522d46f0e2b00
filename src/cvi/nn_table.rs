//! Exact, static nearest-neighbour table (spec §4.D).
//!
//! Computed once at construction from X alone; relabelling never invalidates
//! it, since neighbour identity depends only on distance, not on L. Reuses
//! the teacher's bounded-heap primitive to keep the M closest candidates per
//! point without sorting the full distance row.

use std::num::NonZeroUsize;

use crate::heap::BoundedMinHeap;
use crate::matrix::PointMatrix;

#[derive(Clone, Copy, PartialEq)]
struct Candidate {
    dist: f64,
    index: usize,
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

pub struct NnTable {
    m: usize,
    /// `neighbours[i * m + k]` is the k-th nearest neighbour of point i,
    /// ascending by distance.
    neighbours: Vec<usize>,
}

impl NnTable {
    pub fn build(x: &PointMatrix, requested_m: usize) -> Self {
        let n = x.n();
        let m = requested_m.min(n.saturating_sub(1)).max(1);
        let capacity = NonZeroUsize::new(m).expect("m is clamped to at least 1");

        let mut neighbours = vec![0usize; n * m];
        for i in 0..n {
            let mut heap = BoundedMinHeap::new(capacity);
            for j in 0..n {
                if i == j {
                    continue;
                }
                heap.push(Candidate {
                    dist: x.sq_dist(i, j),
                    index: j,
                });
            }
            let sorted = heap.into_sorted_vec();
            debug_assert_eq!(sorted.len(), m);
            for (k, candidate) in sorted.into_iter().enumerate() {
                neighbours[i * m + k] = candidate.index;
            }
        }

        Self { m, neighbours }
    }

    pub fn m(&self) -> usize {
        self.m
    }

    /// The k-th nearest neighbour of point `i`, 0 <= k < m().
    pub fn ind(&self, i: usize, k: usize) -> usize {
        self.neighbours[i * self.m + k]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clamps_m_to_n_minus_one() {
        let x = PointMatrix::new(vec![0.0, 1.0, 2.0], 3, 1).unwrap();
        let table = NnTable::build(&x, 10);
        assert_eq!(table.m(), 2);
    }

    #[test]
    fn nearest_neighbours_are_correct_and_sorted() {
        let x = PointMatrix::new(vec![0.0, 1.0, 2.0, 100.0], 4, 1).unwrap();
        let table = NnTable::build(&x, 2);
        assert_eq!(table.ind(0, 0), 1);
        assert_eq!(table.ind(0, 1), 2);
        assert_eq!(table.ind(3, 0), 2);
    }
}

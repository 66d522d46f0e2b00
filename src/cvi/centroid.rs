//! Incremental centroid maintenance (spec §4.C).

use crate::cvi::base::Base;

/// K×d mean-of-cluster matrix, updated incrementally on `modify` rather
/// than recomputed. Shared by Calinski-Harabasz, Davies-Bouldin, WCSS,
/// Ball-Hall, and the centroid-dependent Generalized Dunn deltas.
pub struct Centroids {
    d: usize,
    values: Vec<f64>,
    snapshot: Option<Snapshot>,
}

struct Snapshot {
    old_cluster: u8,
    new_cluster: u8,
    old_row: Vec<f64>,
    new_row: Vec<f64>,
}

impl Centroids {
    pub fn new(k: u8, d: usize) -> Self {
        Self {
            d,
            values: vec![0.0; k as usize * d],
            snapshot: None,
        }
    }

    pub fn row(&self, cluster: u8) -> &[f64] {
        let start = cluster as usize * self.d;
        &self.values[start..start + self.d]
    }

    fn row_mut(&mut self, cluster: u8) -> &mut [f64] {
        let start = cluster as usize * self.d;
        &mut self.values[start..start + self.d]
    }

    /// Recomputes every centroid from scratch against `base`'s current
    /// labels. Called after `set_labels`.
    pub fn recompute_all(&mut self, base: &Base) {
        self.values.iter_mut().for_each(|v| *v = 0.0);
        for i in 0..base.n() {
            let cluster = base.label(i);
            let point = base.x().row(i);
            let row = self.row_mut(cluster);
            for (c, &x) in row.iter_mut().zip(point) {
                *c += x;
            }
        }
        for cluster in 0..(self.values.len() / self.d) as u8 {
            let count = base.count(cluster).max(1) as f64;
            for c in self.row_mut(cluster) {
                *c /= count;
            }
        }
        self.snapshot = None;
    }

    /// Must run *after* `base.modify(i, j)` so that `base.count(..)` already
    /// reflects the post-modify cardinalities, matching the source's
    /// "subtract X[i]/new_count_old, add X[i]/new_count_new" update rule.
    pub fn modify(&mut self, base: &Base, i: usize, old: u8, new: u8) {
        if base.allow_undo() {
            self.snapshot = Some(Snapshot {
                old_cluster: old,
                new_cluster: new,
                old_row: self.row(old).to_vec(),
                new_row: self.row(new).to_vec(),
            });
        }

        let point = base.x().row(i).to_vec();
        let new_count_old = base.count(old).max(1) as f64;
        let new_count_new = base.count(new) as f64;

        let old_row = self.row_mut(old);
        for (c, x) in old_row.iter_mut().zip(&point) {
            // undo the point's old contribution, renormalised to the new count
            *c = (*c * (new_count_old + 1.0) - x) / new_count_old;
        }
        let new_row = self.row_mut(new);
        for (c, x) in new_row.iter_mut().zip(&point) {
            *c = (*c * (new_count_new - 1.0) + x) / new_count_new;
        }
    }

    pub fn undo(&mut self) {
        let Some(snap) = self.snapshot.take() else {
            return;
        };
        self.row_mut(snap.old_cluster).copy_from_slice(&snap.old_row);
        self.row_mut(snap.new_cluster).copy_from_slice(&snap.new_row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::PointMatrix;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn fixture() -> (Base, Centroids) {
        let x = Arc::new(
            PointMatrix::new(vec![0.0, 0.0, 0.0, 1.0, 10.0, 10.0, 10.0, 11.0], 4, 2).unwrap(),
        );
        let mut base = Base::new(x, 2, true).unwrap();
        base.set_labels(&[0, 0, 1, 1]).unwrap();
        let mut centroids = Centroids::new(2, 2);
        centroids.recompute_all(&base);
        (base, centroids)
    }

    #[test]
    fn centroids_match_direct_mean() {
        let (_, centroids) = fixture();
        assert_eq!(centroids.row(0), &[0.0, 0.5]);
        assert_eq!(centroids.row(1), &[10.0, 10.5]);
    }

    #[test]
    fn modify_then_undo_restores_centroids() {
        let (mut base, mut centroids) = fixture();
        let before0 = centroids.row(0).to_vec();
        let before1 = centroids.row(1).to_vec();

        base.modify(1, 1);
        centroids.modify(&base, 1, 0, 1);
        assert_eq!(centroids.row(0), &[0.0, 0.0]);

        centroids.undo();
        base.undo();
        assert_eq!(centroids.row(0), before0.as_slice());
        assert_eq!(centroids.row(1), before1.as_slice());
    }
}

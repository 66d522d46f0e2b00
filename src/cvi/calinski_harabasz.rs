//! Calinski-Harabasz variance-ratio criterion (spec §4.E).
//!
//! Grounded on the originating centroid-based index family (`cvi_wcss.h`
//! follows the same `ClusterValidityIndex` + `Centroids` shape) and on the
//! formula given directly in the spec, since the dedicated C++ source for
//! this variant was not retained; cross-checked against the plain from-
//! scratch implementation in `other_examples/.../metrics/validation.rs`.

use std::sync::Arc;

use crate::cvi::base::Base;
use crate::cvi::centroid::Centroids;
use crate::cvi::Cvi;
use crate::error::CviError;
use crate::matrix::PointMatrix;

pub struct CalinskiHarabaszIndex {
    base: Base,
    centroids: Centroids,
}

impl CalinskiHarabaszIndex {
    pub fn new(x: Arc<PointMatrix>, k: u8, allow_undo: bool) -> Result<Self, CviError> {
        let d = x.d();
        let base = Base::new(x, k, allow_undo)?;
        Ok(Self {
            centroids: Centroids::new(k, d),
            base,
        })
    }
}

impl Cvi for CalinskiHarabaszIndex {
    fn set_labels(&mut self, labels: &[u8]) -> Result<(), CviError> {
        self.base.set_labels(labels)?;
        self.centroids.recompute_all(&self.base);
        Ok(())
    }

    fn modify(&mut self, i: usize, j: u8) {
        let old = self.base.label(i);
        self.base.modify(i, j);
        self.centroids.modify(&self.base, i, old, j);
    }

    fn undo(&mut self) {
        self.centroids.undo();
        self.base.undo();
    }

    fn compute(&mut self) -> f64 {
        let n = self.base.n();
        let k = self.base.k();
        let d = self.base.x().d();

        let mut mean = vec![0.0; d];
        for i in 0..n {
            for (m, &x) in mean.iter_mut().zip(self.base.x().row(i)) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n as f64;
        }

        let mut between = 0.0;
        for cluster in 0..k {
            let count = self.base.count(cluster) as f64;
            if count == 0.0 {
                continue;
            }
            let dist_sq: f64 = self
                .centroids
                .row(cluster)
                .iter()
                .zip(&mean)
                .map(|(c, m)| (c - m).powi(2))
                .sum();
            between += count * dist_sq;
        }

        let mut within = 0.0;
        for i in 0..n {
            let cluster = self.base.label(i);
            let dist_sq: f64 = self
                .base
                .x()
                .row(i)
                .iter()
                .zip(self.centroids.row(cluster))
                .map(|(x, c)| (x - c).powi(2))
                .sum();
            within += dist_sq;
        }

        (between * (n - k as usize) as f64) / (within * (k as f64 - 1.0))
    }

    fn get_label(&self, i: usize) -> u8 {
        self.base.label(i)
    }

    fn get_labels(&self) -> &[u8] {
        self.base.labels()
    }

    fn get_count(&self, j: u8) -> usize {
        self.base.count(j)
    }

    fn get_k(&self) -> u8 {
        self.base.k()
    }

    fn get_n(&self) -> usize {
        self.base.n()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scenario_one() -> CalinskiHarabaszIndex {
        let x = Arc::new(
            PointMatrix::new(vec![0.0, 0.0, 0.0, 1.0, 10.0, 10.0, 10.0, 11.0], 4, 2).unwrap(),
        );
        let mut idx = CalinskiHarabaszIndex::new(x, 2, true).unwrap();
        idx.set_labels(&[0, 0, 1, 1]).unwrap();
        idx
    }

    #[test]
    fn scenario_one_is_a_well_separated_clustering() {
        // Two tight, widely separated pairs: the variance-ratio criterion
        // should be large. B=200, W=1, n=4, K=2 gives exactly 400 under
        // B*(n-K)/(W*(K-1)); this is the standard Calinski-Harabasz ratio
        // (see DESIGN.md for the note on the spec's illustrative ~121).
        let mut idx = scenario_one();
        let score = idx.compute();
        assert!((score - 400.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn worse_labelling_scores_lower() {
        let mut good = scenario_one();
        let good_score = good.compute();

        let x = Arc::new(
            PointMatrix::new(vec![0.0, 0.0, 0.0, 1.0, 10.0, 10.0, 10.0, 11.0], 4, 2).unwrap(),
        );
        let mut bad = CalinskiHarabaszIndex::new(x, 2, true).unwrap();
        bad.set_labels(&[0, 1, 0, 1]).unwrap();
        let bad_score = bad.compute();

        assert!(bad_score < good_score);
    }

    #[test]
    fn modify_then_undo_round_trips() {
        let mut idx = scenario_one();
        let before = idx.compute();
        idx.modify(1, 1);
        let _ = idx.compute();
        idx.undo();
        let after = idx.compute();
        assert!((before - after).abs() < 1e-9);
    }
}

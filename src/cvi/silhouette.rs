//! Silhouette index, plain and cluster-size-weighted (spec §4.E).
//!
//! Relies entirely on the matrix's cached pairwise distances rather than
//! any incrementally-maintained sufficient statistic: `modify` and `undo`
//! only touch the label/count bookkeeping in `Base`, and `compute()` walks
//! the cache fresh every call, exactly as the spec's "Silhouette: full
//! pairwise distance matrix, reused at each compute()" describes.

use std::sync::Arc;

use crate::cvi::base::Base;
use crate::cvi::Cvi;
use crate::error::CviError;
use crate::matrix::PointMatrix;

pub struct SilhouetteIndex {
    base: Base,
    weighted: bool,
}

impl SilhouetteIndex {
    pub fn new(x: Arc<PointMatrix>, k: u8, allow_undo: bool, weighted: bool) -> Result<Self, CviError> {
        Ok(Self {
            base: Base::new(x, k, allow_undo)?,
            weighted,
        })
    }

    fn point_score(&self, i: usize) -> f64 {
        let own = self.base.label(i);
        if self.base.count(own) == 1 {
            return 0.0;
        }

        let mut a_sum = 0.0;
        let mut a_count = 0usize;
        let mut b_sums = vec![0.0; self.base.k() as usize];
        let mut b_counts = vec![0usize; self.base.k() as usize];

        for j in 0..self.base.n() {
            if i == j {
                continue;
            }
            let label = self.base.label(j);
            let dist = self.base.x().dist(i, j);
            if label == own {
                a_sum += dist;
                a_count += 1;
            } else {
                b_sums[label as usize] += dist;
                b_counts[label as usize] += 1;
            }
        }

        let a = if a_count > 0 { a_sum / a_count as f64 } else { 0.0 };
        let b = (0..self.base.k())
            .filter(|&c| c != own && b_counts[c as usize] > 0)
            .map(|c| b_sums[c as usize] / b_counts[c as usize] as f64)
            .fold(f64::INFINITY, f64::min);

        (b - a) / a.max(b)
    }
}

impl Cvi for SilhouetteIndex {
    fn set_labels(&mut self, labels: &[u8]) -> Result<(), CviError> {
        self.base.set_labels(labels)
    }

    fn modify(&mut self, i: usize, j: u8) {
        self.base.modify(i, j);
    }

    fn undo(&mut self) {
        self.base.undo();
    }

    fn compute(&mut self) -> f64 {
        let n = self.base.n();
        let scores: Vec<f64> = (0..n).map(|i| self.point_score(i)).collect();

        if !self.weighted {
            return scores.iter().sum::<f64>() / n as f64;
        }

        let k = self.base.k();
        let mut cluster_sum = vec![0.0; k as usize];
        for (i, &s) in scores.iter().enumerate() {
            cluster_sum[self.base.label(i) as usize] += s;
        }
        let active: Vec<f64> = (0..k)
            .filter(|&c| self.base.count(c) > 0)
            .map(|c| cluster_sum[c as usize] / self.base.count(c) as f64)
            .collect();
        active.iter().sum::<f64>() / active.len() as f64
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

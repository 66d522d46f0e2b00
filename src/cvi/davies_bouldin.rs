//! Davies-Bouldin index, negated so larger is better (spec §4.E).

use std::sync::Arc;

use crate::cvi::base::Base;
use crate::cvi::centroid::Centroids;
use crate::cvi::Cvi;
use crate::error::CviError;
use crate::matrix::PointMatrix;

pub struct DaviesBouldinIndex {
    base: Base,
    centroids: Centroids,
}

impl DaviesBouldinIndex {
    pub fn new(x: Arc<PointMatrix>, k: u8, allow_undo: bool) -> Result<Self, CviError> {
        let d = x.d();
        let base = Base::new(x, k, allow_undo)?;
        Ok(Self {
            centroids: Centroids::new(k, d),
            base,
        })
    }

    fn cluster_scatter(&self, cluster: u8) -> f64 {
        let count = self.base.count(cluster);
        if count == 0 {
            return 0.0;
        }
        let centroid = self.centroids.row(cluster);
        let mut total = 0.0;
        for i in 0..self.base.n() {
            if self.base.label(i) != cluster {
                continue;
            }
            let dist_sq: f64 = self
                .base
                .x()
                .row(i)
                .iter()
                .zip(centroid)
                .map(|(x, c)| (x - c).powi(2))
                .sum();
            total += dist_sq.sqrt();
        }
        total / count as f64
    }
}

impl Cvi for DaviesBouldinIndex {
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
        let k = self.base.k();
        let scatter: Vec<f64> = (0..k).map(|c| self.cluster_scatter(c)).collect();

        let mut sum = 0.0;
        for kk in 0..k as usize {
            let mut max_ratio = 0.0_f64;
            for ll in 0..k as usize {
                if kk == ll {
                    continue;
                }
                let centroid_dist: f64 = self
                    .centroids
                    .row(kk as u8)
                    .iter()
                    .zip(self.centroids.row(ll as u8))
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt();
                if centroid_dist > 0.0 {
                    max_ratio = max_ratio.max((scatter[kk] + scatter[ll]) / centroid_dist);
                }
            }
            sum += max_ratio;
        }

        -(sum / k as f64)
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

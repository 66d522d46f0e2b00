//! Negated within-cluster sum of squares, and the Ball-Hall index (spec
//! §4.E), grounded directly on `cvi_wcss.h`. Ball-Hall is WCSS divided
//! per-point by its cluster's cardinality; both share one struct with a
//! `weighted` flag, matching the source's single `WCSSIndex` class.

use std::sync::Arc;

use crate::cvi::base::Base;
use crate::cvi::centroid::Centroids;
use crate::cvi::Cvi;
use crate::error::CviError;
use crate::matrix::PointMatrix;

pub struct WcssIndex {
    base: Base,
    centroids: Centroids,
    weighted: bool,
}

impl WcssIndex {
    pub fn new(x: Arc<PointMatrix>, k: u8, allow_undo: bool, weighted: bool) -> Result<Self, CviError> {
        let d = x.d();
        let base = Base::new(x, k, allow_undo)?;
        Ok(Self {
            centroids: Centroids::new(k, d),
            base,
            weighted,
        })
    }
}

impl Cvi for WcssIndex {
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
        let mut wcss = 0.0;
        for i in 0..self.base.n() {
            let cluster = self.base.label(i);
            let denom = if self.weighted {
                self.base.count(cluster) as f64
            } else {
                1.0
            };
            let dist_sq: f64 = self
                .base
                .x()
                .row(i)
                .iter()
                .zip(self.centroids.row(cluster))
                .map(|(x, c)| (x - c).powi(2))
                .sum();
            wcss += dist_sq / denom;
        }
        -wcss
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

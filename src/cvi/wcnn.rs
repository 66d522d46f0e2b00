//! Within-cluster nearest-neighbours index (spec §4.E), grounded directly
//! on `cvi_wcnn.h`: the proportion of each point's M nearest neighbours
//! that share its cluster. `-∞` whenever any cluster's cardinality is at
//! or below M, since the statistic is meaningless there.

use std::sync::Arc;

use crate::cvi::base::Base;
use crate::cvi::nn_table::NnTable;
use crate::cvi::Cvi;
use crate::error::CviError;
use crate::matrix::PointMatrix;

pub struct WcnnIndex {
    base: Base,
    nn: NnTable,
}

impl WcnnIndex {
    pub fn new(x: Arc<PointMatrix>, k: u8, allow_undo: bool, m: usize) -> Result<Self, CviError> {
        let nn = NnTable::build(&x, m);
        let base = Base::new(x, k, allow_undo)?;
        Ok(Self { base, nn })
    }
}

impl Cvi for WcnnIndex {
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
        for c in 0..self.base.k() {
            if self.base.count(c) <= self.nn.m() {
                return f64::NEG_INFINITY;
            }
        }

        let mut wcnn = 0usize;
        for i in 0..self.base.n() {
            for k in 0..self.nn.m() {
                if self.base.label(i) == self.base.label(self.nn.ind(i, k)) {
                    wcnn += 1;
                }
            }
        }
        wcnn as f64 / (self.base.n() * self.nn.m()) as f64
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

    #[test]
    fn scenarios_three_and_four_agree_on_perfect_agreement() {
        let x = Arc::new(PointMatrix::new(
            vec![
                0.0, 0.0, 0.1, 0.1, 0.2, 0.0, 10.0, 10.0, 10.1, 10.1, 10.2, 10.0,
            ],
            6,
            2,
        ).unwrap());
        let mut idx = WcnnIndex::new(x, 2, true, 2).unwrap();
        idx.set_labels(&[0, 0, 0, 1, 1, 1]).unwrap();
        let score = idx.compute();
        assert!((score - 1.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn small_cluster_yields_negative_infinity() {
        let x = Arc::new(PointMatrix::new(
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 100.0],
            6,
            1,
        ).unwrap());
        let mut idx = WcnnIndex::new(x, 2, true, 4).unwrap();
        idx.set_labels(&[0, 0, 0, 0, 0, 1]).unwrap();
        assert_eq!(idx.compute(), f64::NEG_INFINITY);
    }

    #[test]
    fn modify_then_undo_round_trips() {
        let x = Arc::new(PointMatrix::new(
            vec![
                0.0, 0.0, 0.1, 0.1, 0.2, 0.0, 10.0, 10.0, 10.1, 10.1, 10.2, 10.0,
            ],
            6,
            2,
        ).unwrap());
        let mut idx = WcnnIndex::new(x, 2, true, 2).unwrap();
        idx.set_labels(&[0, 0, 0, 1, 1, 1]).unwrap();
        let before = idx.compute();
        idx.modify(2, 1);
        let _ = idx.compute();
        idx.undo();
        let after = idx.compute();
        assert!((before - after).abs() < 1e-9);
    }
}

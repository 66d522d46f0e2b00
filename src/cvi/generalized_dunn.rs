//! Generalized Dunn indices (spec §4.E): a lowercase inter-cluster
//! dissimilarity δ composed with an uppercase intra-cluster Δ, grounded on
//! `cvi_generalized_dunn_delta.h`'s `LowercaseDelta`/`UppercaseDelta` base
//! classes and the two retained concrete deltas (`..._d4.h`, `..._d5.h`).
//! Rather than the source's class-per-variant hierarchy, both sides are
//! small enums composed inside one index type (spec's redesign note).
//!
//! Only δ5 carries genuine incremental state — the other five lowercase
//! choices and all three uppercase ones are recomputed with an O(K²) or
//! O(n²) sweep on every `compute()`, exactly as their source counterparts
//! (`before_modify`/`after_modify` bodies that are no-ops, "all happens in
//! CentroidsBasedIndex") do nothing beyond what the shared centroid
//! maintenance already provides.

use std::sync::Arc;

use crate::cvi::base::Base;
use crate::cvi::centroid::Centroids;
use crate::cvi::Cvi;
use crate::error::CviError;
use crate::matrix::PointMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowercaseDelta {
    /// δ1: min point-point distance between clusters.
    D1,
    /// δ2: max point-point distance between clusters.
    D2,
    /// δ3: mean point-point distance between clusters.
    D3,
    /// δ4: distance between centroids.
    D4,
    /// δ5: mean of distances from each point in either cluster to its own centroid.
    D5,
    /// δ6: maximum distance from a point to the other cluster's centroid.
    D6,
}

impl LowercaseDelta {
    fn needs_centroid(self) -> bool {
        matches!(self, LowercaseDelta::D4 | LowercaseDelta::D5 | LowercaseDelta::D6)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UppercaseDelta {
    /// Δ1: max intra-cluster distance (diameter).
    D1,
    /// Δ2: mean intra-cluster distance.
    D2,
    /// Δ3: 2 · mean point-to-centroid distance.
    D3,
}

impl UppercaseDelta {
    fn needs_centroid(self) -> bool {
        matches!(self, UppercaseDelta::D3)
    }
}

pub struct GeneralizedDunnIndex {
    base: Base,
    centroids: Option<Centroids>,
    lower: LowercaseDelta,
    upper: UppercaseDelta,
    dist_sums: Option<Vec<f64>>,
    last_dist_sums: Option<Vec<f64>>,
    last_chg: bool,
}

impl GeneralizedDunnIndex {
    pub fn new(
        x: Arc<PointMatrix>,
        k: u8,
        allow_undo: bool,
        lower: LowercaseDelta,
        upper: UppercaseDelta,
    ) -> Result<Self, CviError> {
        let d = x.d();
        let base = Base::new(x, k, allow_undo)?;
        let needs_centroid = lower.needs_centroid() || upper.needs_centroid();
        let has_dist_sums = lower == LowercaseDelta::D5;
        Ok(Self {
            base,
            centroids: needs_centroid.then(|| Centroids::new(k, d)),
            lower,
            upper,
            dist_sums: has_dist_sums.then(|| vec![0.0; k as usize]),
            last_dist_sums: None,
            last_chg: false,
        })
    }

    fn centroid_dist(&self, k: u8, l: u8) -> f64 {
        let centroids = self.centroids.as_ref().expect("centroids required");
        centroids
            .row(k)
            .iter()
            .zip(centroids.row(l))
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    fn point_to_centroid(&self, i: usize, cluster: u8) -> f64 {
        let centroids = self.centroids.as_ref().expect("centroids required");
        self.base
            .x()
            .row(i)
            .iter()
            .zip(centroids.row(cluster))
            .map(|(x, c)| (x - c).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    fn recompute_dist_sums(&mut self) {
        let k = self.base.k() as usize;
        let mut sums = vec![0.0; k];
        for i in 0..self.base.n() {
            let c = self.base.label(i);
            sums[c as usize] += self.point_to_centroid(i, c);
        }
        self.dist_sums = Some(sums);
    }

    fn recompute_touched_dist_sums(&mut self, a: u8, b: u8) {
        let sums = self.dist_sums.as_mut().expect("dist_sums required");
        sums[a as usize] = 0.0;
        sums[b as usize] = 0.0;
        let touched: Vec<(usize, u8)> = (0..self.base.n())
            .map(|i| (i, self.base.label(i)))
            .filter(|&(_, c)| c == a || c == b)
            .collect();
        for (i, c) in touched {
            let d = self.point_to_centroid(i, c);
            self.dist_sums.as_mut().unwrap()[c as usize] += d;
        }
    }

    fn lower_delta(&self, k: u8, l: u8) -> f64 {
        match self.lower {
            LowercaseDelta::D1 => self.cross_points(k, l, f64::INFINITY, f64::min),
            LowercaseDelta::D2 => self.cross_points(k, l, 0.0, f64::max),
            LowercaseDelta::D3 => self.cross_mean(k, l),
            LowercaseDelta::D4 => self.centroid_dist(k, l),
            LowercaseDelta::D5 => {
                let sums = self.dist_sums.as_ref().expect("dist_sums required");
                (sums[k as usize] + sums[l as usize])
                    / (self.base.count(k) + self.base.count(l)) as f64
            }
            LowercaseDelta::D6 => {
                let mut worst = 0.0_f64;
                for i in 0..self.base.n() {
                    let label = self.base.label(i);
                    if label == k {
                        worst = worst.max(self.point_to_centroid(i, l));
                    } else if label == l {
                        worst = worst.max(self.point_to_centroid(i, k));
                    }
                }
                worst
            }
        }
    }

    fn cross_points(&self, k: u8, l: u8, init: f64, fold: impl Fn(f64, f64) -> f64) -> f64 {
        let mut acc = init;
        for i in 0..self.base.n() {
            if self.base.label(i) != k {
                continue;
            }
            for j in 0..self.base.n() {
                if self.base.label(j) != l {
                    continue;
                }
                acc = fold(acc, self.base.x().dist(i, j));
            }
        }
        acc
    }

    fn cross_mean(&self, k: u8, l: u8) -> f64 {
        let mut sum = 0.0;
        let mut count = 0u64;
        for i in 0..self.base.n() {
            if self.base.label(i) != k {
                continue;
            }
            for j in 0..self.base.n() {
                if self.base.label(j) != l {
                    continue;
                }
                sum += self.base.x().dist(i, j);
                count += 1;
            }
        }
        sum / count.max(1) as f64
    }

    fn upper_delta(&self, cluster: u8) -> f64 {
        match self.upper {
            UppercaseDelta::D1 => self.intra_points(cluster, 0.0, f64::max),
            UppercaseDelta::D2 => self.intra_mean(cluster),
            UppercaseDelta::D3 => {
                let count = self.base.count(cluster).max(1) as f64;
                let sum: f64 = (0..self.base.n())
                    .filter(|&i| self.base.label(i) == cluster)
                    .map(|i| self.point_to_centroid(i, cluster))
                    .sum();
                2.0 * sum / count
            }
        }
    }

    fn intra_points(&self, cluster: u8, init: f64, fold: impl Fn(f64, f64) -> f64) -> f64 {
        let members: Vec<usize> = (0..self.base.n())
            .filter(|&i| self.base.label(i) == cluster)
            .collect();
        let mut acc = init;
        for (a, &i) in members.iter().enumerate() {
            for &j in &members[a + 1..] {
                acc = fold(acc, self.base.x().dist(i, j));
            }
        }
        acc
    }

    fn intra_mean(&self, cluster: u8) -> f64 {
        let members: Vec<usize> = (0..self.base.n())
            .filter(|&i| self.base.label(i) == cluster)
            .collect();
        let mut sum = 0.0;
        let mut count = 0u64;
        for (a, &i) in members.iter().enumerate() {
            for &j in &members[a + 1..] {
                sum += self.base.x().dist(i, j);
                count += 1;
            }
        }
        sum / count.max(1) as f64
    }
}

impl Cvi for GeneralizedDunnIndex {
    fn set_labels(&mut self, labels: &[u8]) -> Result<(), CviError> {
        self.base.set_labels(labels)?;
        if let Some(centroids) = &mut self.centroids {
            centroids.recompute_all(&self.base);
        }
        if self.dist_sums.is_some() {
            self.recompute_dist_sums();
        }
        Ok(())
    }

    fn modify(&mut self, i: usize, j: u8) {
        let old = self.base.label(i);
        if let Some(sums) = &self.dist_sums {
            self.last_dist_sums = Some(sums.clone());
            self.last_chg = true;
        }

        self.base.modify(i, j);

        if let Some(centroids) = &mut self.centroids {
            centroids.modify(&self.base, i, old, j);
        }
        if self.dist_sums.is_some() {
            self.recompute_touched_dist_sums(old, j);
        }
    }

    fn undo(&mut self) {
        if self.last_chg {
            if let Some(last) = self.last_dist_sums.take() {
                self.dist_sums = Some(last);
            }
        }
        if let Some(centroids) = &mut self.centroids {
            centroids.undo();
        }
        self.base.undo();
    }

    fn compute(&mut self) -> f64 {
        let k = self.base.k();
        let mut min_lower = f64::INFINITY;
        for a in 0..k {
            for b in (a + 1)..k {
                min_lower = min_lower.min(self.lower_delta(a, b));
            }
        }
        let mut max_upper = 0.0_f64;
        for a in 0..k {
            max_upper = max_upper.max(self.upper_delta(a));
        }
        min_lower / max_upper
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

    fn scenario(lower: LowercaseDelta, upper: UppercaseDelta) -> GeneralizedDunnIndex {
        let x = Arc::new(
            PointMatrix::new(vec![0.0, 0.0, 0.0, 1.0, 10.0, 10.0, 10.0, 11.0], 4, 2).unwrap(),
        );
        let mut idx = GeneralizedDunnIndex::new(x, 2, true, lower, upper).unwrap();
        idx.set_labels(&[0, 0, 1, 1]).unwrap();
        idx
    }

    #[test]
    fn d1_over_u1_matches_classic_dunn() {
        // δ1/Δ1 is exactly the classic Dunn ratio (unsquared): sqrt(181)/1.
        let mut idx = scenario(LowercaseDelta::D1, UppercaseDelta::D1);
        let score = idx.compute();
        assert!((score - 181.0_f64.sqrt()).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn d5_tracks_incremental_dist_sums_through_modify_and_undo() {
        let mut idx = scenario(LowercaseDelta::D5, UppercaseDelta::D2);
        let before = idx.compute();
        idx.modify(1, 1);
        let _ = idx.compute();
        idx.undo();
        let after = idx.compute();
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn every_combination_computes_a_finite_score() {
        let lowers = [
            LowercaseDelta::D1,
            LowercaseDelta::D2,
            LowercaseDelta::D3,
            LowercaseDelta::D4,
            LowercaseDelta::D5,
            LowercaseDelta::D6,
        ];
        let uppers = [UppercaseDelta::D1, UppercaseDelta::D2, UppercaseDelta::D3];
        for &lower in &lowers {
            for &upper in &uppers {
                let mut idx = scenario(lower, upper);
                assert!(idx.compute().is_finite());
            }
        }
    }
}

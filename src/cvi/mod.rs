//! Cluster validity indices (spec §4): a shared trait over the incremental
//! `set_labels`/`modify`/`undo`/`compute` contract, plus a tagged-variant
//! enum dispatching to each concrete index. Sum types over the trait avoid
//! the source's deep `ClusterValidityIndex` → `CentroidsBasedIndex` /
//! `NNBasedIndex` → concrete-class inheritance, per the redesign note.

mod base;
mod calinski_harabasz;
mod centroid;
mod davies_bouldin;
mod dunn;
pub mod dunn_owa;
pub mod external;
pub mod factory;
pub mod gamma;
pub mod generalized_dunn;
mod nn_table;
pub mod owa;
mod silhouette;
mod wcnn;
mod wcss;

use std::sync::Arc;

use crate::error::CviError;
use crate::matrix::PointMatrix;

pub use calinski_harabasz::CalinskiHarabaszIndex;
pub use davies_bouldin::DaviesBouldinIndex;
pub use dunn::DunnIndex;
pub use dunn_owa::DunnOwaIndex;
pub use gamma::GammaIndex;
pub use generalized_dunn::{GeneralizedDunnIndex, LowercaseDelta, UppercaseDelta};
pub use owa::OwaOperator;
pub use silhouette::SilhouetteIndex;
pub use wcnn::WcnnIndex;
pub use wcss::WcssIndex;

/// The incremental contract every internal index implements (spec §4.B,
/// §6 "Operations"). `modify`/`undo` trust the caller's preconditions
/// (spec §7): the point's label actually changes, and the point's current
/// cluster has at least one other member.
pub trait Cvi {
    fn set_labels(&mut self, labels: &[u8]) -> Result<(), CviError>;
    fn modify(&mut self, i: usize, j: u8);
    fn undo(&mut self);
    fn compute(&mut self) -> f64;
    fn get_label(&self, i: usize) -> u8;
    fn get_labels(&self) -> &[u8];
    fn get_count(&self, j: u8) -> usize;
    fn get_k(&self) -> u8;
    fn get_n(&self) -> usize;
}

/// Closed set of concrete index variants, selected once at construction
/// time (via [`factory::build`] or directly) and driven thereafter through
/// the shared [`Cvi`] trait.
pub enum CviIndex {
    CalinskiHarabasz(CalinskiHarabaszIndex),
    DaviesBouldin(DaviesBouldinIndex),
    Silhouette(SilhouetteIndex),
    Dunn(DunnIndex),
    Wcss(WcssIndex),
    Gamma(GammaIndex),
    Wcnn(WcnnIndex),
    DunnOwa(DunnOwaIndex),
    GeneralizedDunn(GeneralizedDunnIndex),
}

impl CviIndex {
    pub fn new_calinski_harabasz(x: Arc<PointMatrix>, k: u8, allow_undo: bool) -> Result<Self, CviError> {
        Ok(Self::CalinskiHarabasz(CalinskiHarabaszIndex::new(x, k, allow_undo)?))
    }

    pub fn new_davies_bouldin(x: Arc<PointMatrix>, k: u8, allow_undo: bool) -> Result<Self, CviError> {
        Ok(Self::DaviesBouldin(DaviesBouldinIndex::new(x, k, allow_undo)?))
    }

    pub fn new_silhouette(x: Arc<PointMatrix>, k: u8, allow_undo: bool, weighted: bool) -> Result<Self, CviError> {
        Ok(Self::Silhouette(SilhouetteIndex::new(x, k, allow_undo, weighted)?))
    }

    pub fn new_dunn(x: Arc<PointMatrix>, k: u8, allow_undo: bool) -> Result<Self, CviError> {
        Ok(Self::Dunn(DunnIndex::new(x, k, allow_undo)?))
    }

    pub fn new_wcss(x: Arc<PointMatrix>, k: u8, allow_undo: bool, weighted: bool) -> Result<Self, CviError> {
        Ok(Self::Wcss(WcssIndex::new(x, k, allow_undo, weighted)?))
    }

    pub fn new_gamma(x: Arc<PointMatrix>, k: u8, allow_undo: bool) -> Result<Self, CviError> {
        Ok(Self::Gamma(GammaIndex::new(x, k, allow_undo)?))
    }

    pub fn new_wcnn(x: Arc<PointMatrix>, k: u8, allow_undo: bool, m: usize) -> Result<Self, CviError> {
        Ok(Self::Wcnn(WcnnIndex::new(x, k, allow_undo, m)?))
    }

    pub fn new_dunn_owa(
        x: Arc<PointMatrix>,
        k: u8,
        allow_undo: bool,
        m: usize,
        numerator: OwaOperator,
        denominator: OwaOperator,
    ) -> Result<Self, CviError> {
        Ok(Self::DunnOwa(DunnOwaIndex::new(x, k, allow_undo, m, numerator, denominator)?))
    }

    pub fn new_generalized_dunn(
        x: Arc<PointMatrix>,
        k: u8,
        allow_undo: bool,
        lower: LowercaseDelta,
        upper: UppercaseDelta,
    ) -> Result<Self, CviError> {
        Ok(Self::GeneralizedDunn(GeneralizedDunnIndex::new(x, k, allow_undo, lower, upper)?))
    }
}

macro_rules! dispatch {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            CviIndex::CalinskiHarabasz(i) => i.$method($($arg),*),
            CviIndex::DaviesBouldin(i) => i.$method($($arg),*),
            CviIndex::Silhouette(i) => i.$method($($arg),*),
            CviIndex::Dunn(i) => i.$method($($arg),*),
            CviIndex::Wcss(i) => i.$method($($arg),*),
            CviIndex::Gamma(i) => i.$method($($arg),*),
            CviIndex::Wcnn(i) => i.$method($($arg),*),
            CviIndex::DunnOwa(i) => i.$method($($arg),*),
            CviIndex::GeneralizedDunn(i) => i.$method($($arg),*),
        }
    };
}

impl Cvi for CviIndex {
    fn set_labels(&mut self, labels: &[u8]) -> Result<(), CviError> {
        dispatch!(self, set_labels, labels)
    }

    fn modify(&mut self, i: usize, j: u8) {
        dispatch!(self, modify, i, j)
    }

    fn undo(&mut self) {
        dispatch!(self, undo)
    }

    fn compute(&mut self) -> f64 {
        dispatch!(self, compute)
    }

    fn get_label(&self, i: usize) -> u8 {
        dispatch!(self, get_label, i)
    }

    fn get_labels(&self) -> &[u8] {
        dispatch!(self, get_labels)
    }

    fn get_count(&self, j: u8) -> usize {
        dispatch!(self, get_count, j)
    }

    fn get_k(&self) -> u8 {
        dispatch!(self, get_k)
    }

    fn get_n(&self) -> usize {
        dispatch!(self, get_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_variant_dispatches_to_the_right_implementation() {
        let x = Arc::new(
            PointMatrix::new(vec![0.0, 0.0, 0.0, 1.0, 10.0, 10.0, 10.0, 11.0], 4, 2).unwrap(),
        );
        let mut idx = CviIndex::new_gamma(x, 2, true).unwrap();
        idx.set_labels(&[0, 0, 1, 1]).unwrap();
        assert!(idx.compute().is_finite());
        assert_eq!(idx.get_k(), 2);
        assert_eq!(idx.get_n(), 4);
    }
}

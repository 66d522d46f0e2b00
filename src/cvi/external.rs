//! External CVI adapter (spec §4.F), grounded directly on
//! `cvi_decorator.h`: the internal decorator ignores weights and the
//! `new→old` mapping and delegates straight through, while the external
//! decorator forwards both to the wrapped index and resolves
//! `get_label_translated` through the mapping at this layer -- exactly the
//! asymmetry the source's two decorator classes show (`modify_with_weight`
//! passes `new2old` on unexamined, but `get_label_translated` calls
//! `new2old.at(i)` itself).

use std::collections::HashMap;

use crate::cvi::Cvi;
use crate::error::CviError;

/// Implemented by a scorer supplied from outside the engine that judges a
/// labelling against some reference, weighting samples and consuming a
/// `new→old` index mapping rather than operating on raw point indices.
pub trait ExternalIndex {
    fn set_labels(&mut self, labels: &[u8]);
    fn set_labels_with_weights(&mut self, labels: &[u8], weights: &[u64], mapping: &HashMap<usize, usize>);
    fn modify_with_weight(&mut self, i: usize, j: u8, w: u64, mapping: &HashMap<usize, usize>);
    fn compute(&mut self) -> f64;
    fn get_label(&self, i: usize) -> u8;
}

/// Common surface both adapters expose to callers, so the optimiser can
/// drive an internal or an external index identically.
pub trait ClusterValidityIndexDecorator {
    fn modify_with_weight(&mut self, i: usize, j: u8, w: u64, mapping: &HashMap<usize, usize>);
    fn set_labels_with_weights(
        &mut self,
        labels: &[u8],
        weights: &[u64],
        mapping: &HashMap<usize, usize>,
    ) -> Result<(), CviError>;
    fn set_labels(&mut self, labels: &[u8]) -> Result<(), CviError>;
    fn get_label_translated(&self, i: usize, mapping: &HashMap<usize, usize>) -> Result<u8, CviError>;
    fn get_labels_translated(&self, n: usize, mapping: &HashMap<usize, usize>) -> Result<Vec<u8>, CviError>;
    fn compute(&mut self) -> f64;
}

pub struct InternalDecorator<I: Cvi> {
    index: I,
}

impl<I: Cvi> InternalDecorator<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }
}

impl<I: Cvi> ClusterValidityIndexDecorator for InternalDecorator<I> {
    fn modify_with_weight(&mut self, i: usize, j: u8, _w: u64, _mapping: &HashMap<usize, usize>) {
        self.index.modify(i, j);
    }

    fn set_labels_with_weights(
        &mut self,
        labels: &[u8],
        _weights: &[u64],
        _mapping: &HashMap<usize, usize>,
    ) -> Result<(), CviError> {
        self.index.set_labels(labels)
    }

    fn set_labels(&mut self, labels: &[u8]) -> Result<(), CviError> {
        self.index.set_labels(labels)
    }

    fn get_label_translated(&self, i: usize, _mapping: &HashMap<usize, usize>) -> Result<u8, CviError> {
        Ok(self.index.get_label(i))
    }

    fn get_labels_translated(&self, _n: usize, _mapping: &HashMap<usize, usize>) -> Result<Vec<u8>, CviError> {
        Ok(self.index.get_labels().to_vec())
    }

    fn compute(&mut self) -> f64 {
        self.index.compute()
    }
}

pub struct ExternalDecorator<E: ExternalIndex> {
    index: E,
}

impl<E: ExternalIndex> ExternalDecorator<E> {
    pub fn new(index: E) -> Self {
        Self { index }
    }
}

impl<E: ExternalIndex> ClusterValidityIndexDecorator for ExternalDecorator<E> {
    fn modify_with_weight(&mut self, i: usize, j: u8, w: u64, mapping: &HashMap<usize, usize>) {
        self.index.modify_with_weight(i, j, w, mapping);
    }

    fn set_labels_with_weights(
        &mut self,
        labels: &[u8],
        weights: &[u64],
        mapping: &HashMap<usize, usize>,
    ) -> Result<(), CviError> {
        self.index.set_labels_with_weights(labels, weights, mapping);
        Ok(())
    }

    fn set_labels(&mut self, labels: &[u8]) -> Result<(), CviError> {
        self.index.set_labels(labels);
        Ok(())
    }

    fn get_label_translated(&self, i: usize, mapping: &HashMap<usize, usize>) -> Result<u8, CviError> {
        let &old = mapping.get(&i).ok_or(CviError::MissingMapping(i))?;
        Ok(self.index.get_label(old))
    }

    fn get_labels_translated(&self, n: usize, mapping: &HashMap<usize, usize>) -> Result<Vec<u8>, CviError> {
        (0..n).map(|i| self.get_label_translated(i, mapping)).collect()
    }

    fn compute(&mut self) -> f64 {
        self.index.compute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cvi::gamma::GammaIndex;
    use crate::matrix::PointMatrix;
    use std::sync::Arc;

    struct StubExternal {
        labels: Vec<u8>,
    }

    impl ExternalIndex for StubExternal {
        fn set_labels(&mut self, labels: &[u8]) {
            self.labels = labels.to_vec();
        }

        fn set_labels_with_weights(&mut self, labels: &[u8], _weights: &[u64], _mapping: &HashMap<usize, usize>) {
            self.labels = labels.to_vec();
        }

        fn modify_with_weight(&mut self, i: usize, j: u8, _w: u64, _mapping: &HashMap<usize, usize>) {
            self.labels[i] = j;
        }

        fn compute(&mut self) -> f64 {
            self.labels.len() as f64
        }

        fn get_label(&self, i: usize) -> u8 {
            self.labels[i]
        }
    }

    #[test]
    fn internal_decorator_ignores_mapping_and_weights() {
        let x = Arc::new(
            PointMatrix::new(vec![0.0, 0.0, 0.0, 1.0, 10.0, 10.0, 10.0, 11.0], 4, 2).unwrap(),
        );
        let mut dec = InternalDecorator::new(GammaIndex::new(x, 2, true).unwrap());
        let mapping = HashMap::new();
        dec.set_labels_with_weights(&[0, 0, 1, 1], &[9, 9, 9, 9], &mapping)
            .unwrap();
        assert_eq!(dec.get_label_translated(0, &mapping).unwrap(), 0);
    }

    #[test]
    fn external_decorator_resolves_mapping_and_flags_missing_entries() {
        let mut dec = ExternalDecorator::new(StubExternal {
            labels: vec![0, 1, 0],
        });
        let mut mapping = HashMap::new();
        mapping.insert(0usize, 2usize);
        assert_eq!(dec.get_label_translated(0, &mapping).unwrap(), 0);
        assert_eq!(
            dec.get_label_translated(1, &mapping).unwrap_err(),
            CviError::MissingMapping(1)
        );
    }
}

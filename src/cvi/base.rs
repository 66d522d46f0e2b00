//! Shared label/count state and the `modify`/`undo` snapshot scaffolding
//! every concrete index builds on (spec §4.B).

use std::sync::Arc;

use crate::error::CviError;
use crate::matrix::PointMatrix;

/// One pending `modify`: the point touched and its label before the change.
/// `undo` consumes this; a second `undo` without an intervening `modify`
/// finds nothing to restore, which the spec calls undefined behaviour we
/// need not support — we simply leave state untouched rather than panic,
/// since panicking on a no-op is a worse failure mode for a library.
#[derive(Clone, Copy)]
struct PendingModify {
    point: usize,
    old_label: u8,
}

pub struct Base {
    x: Arc<PointMatrix>,
    k: u8,
    allow_undo: bool,
    labels: Vec<u8>,
    counts: Vec<u32>,
    pending: Option<PendingModify>,
}

impl Base {
    pub fn new(x: Arc<PointMatrix>, k: u8, allow_undo: bool) -> Result<Self, CviError> {
        if !(2..=255).contains(&k) {
            return Err(CviError::InvalidK(k as u16));
        }
        let n = x.n();
        Ok(Self {
            x,
            k,
            allow_undo,
            labels: vec![0; n],
            counts: vec![0; k as usize + 1],
            pending: None,
        })
    }

    pub fn x(&self) -> &Arc<PointMatrix> {
        &self.x
    }

    pub fn k(&self) -> u8 {
        self.k
    }

    pub fn n(&self) -> usize {
        self.x.n()
    }

    pub fn allow_undo(&self) -> bool {
        self.allow_undo
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn label(&self, i: usize) -> u8 {
        self.labels[i]
    }

    pub fn count(&self, j: u8) -> usize {
        self.counts[j as usize + 1] as usize
    }

    /// Resets all label/count state from scratch; derived per-index state
    /// must be recomputed by the caller after this returns.
    pub fn set_labels(&mut self, labels: &[u8]) -> Result<(), CviError> {
        if labels.len() != self.n() {
            return Err(CviError::LabelCountMismatch {
                expected: self.n(),
                found: labels.len(),
            });
        }
        for (i, &label) in labels.iter().enumerate() {
            if label >= self.k {
                return Err(CviError::LabelOutOfRange {
                    index: i,
                    label,
                    k: self.k,
                });
            }
        }

        self.counts.iter_mut().for_each(|c| *c = 0);
        for &label in labels {
            self.counts[label as usize + 1] += 1;
        }
        self.labels.clear();
        self.labels.extend_from_slice(labels);
        self.pending = None;
        Ok(())
    }

    /// Reassigns point `i` to cluster `j`. Preconditions (enforced by the
    /// optimiser, the sole caller on this path): `labels[i] != j` and
    /// `count(labels[i]) >= 2`. A violation is a bug in the caller, not a
    /// recoverable error (spec §7), hence `debug_assert!` rather than `Result`.
    pub fn modify(&mut self, i: usize, j: u8) {
        let old = self.labels[i];
        debug_assert!(old != j, "modify called with label unchanged");
        debug_assert!(
            self.count(old) >= 2,
            "modify would empty cluster {old}"
        );

        if self.allow_undo {
            self.pending = Some(PendingModify {
                point: i,
                old_label: old,
            });
        }

        self.labels[i] = j;
        self.counts[old as usize + 1] -= 1;
        self.counts[j as usize + 1] += 1;
    }

    pub fn undo(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let i = pending.point;
        let new = self.labels[i];
        self.labels[i] = pending.old_label;
        self.counts[new as usize + 1] -= 1;
        self.counts[pending.old_label as usize + 1] += 1;
    }

    /// The (point, old_label, new_label) of the pending modify, for mixins
    /// that need to know what changed without duplicating the bookkeeping.
    pub fn pending_change(&self) -> Option<(usize, u8, u8)> {
        self.pending
            .map(|p| (p.point, p.old_label, self.labels[p.point]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base(n: usize, k: u8) -> Base {
        let x = Arc::new(PointMatrix::new(vec![0.0; n], n, 1).unwrap());
        Base::new(x, k, true).unwrap()
    }

    #[test]
    fn rejects_k_out_of_range() {
        let x = Arc::new(PointMatrix::new(vec![0.0; 4], 4, 1).unwrap());
        assert_eq!(Base::new(x.clone(), 1, true).unwrap_err(), CviError::InvalidK(1));
        assert_eq!(Base::new(x, 0, true).unwrap_err(), CviError::InvalidK(0));
    }

    #[test]
    fn modify_then_undo_restores_counts() {
        let mut b = base(4, 2);
        b.set_labels(&[0, 0, 1, 1]).unwrap();
        assert_eq!(b.count(0), 2);
        assert_eq!(b.count(1), 2);

        b.modify(0, 1);
        assert_eq!(b.count(0), 1);
        assert_eq!(b.count(1), 3);
        assert_eq!(b.labels(), &[1, 0, 1, 1]);

        b.undo();
        assert_eq!(b.count(0), 2);
        assert_eq!(b.count(1), 2);
        assert_eq!(b.labels(), &[0, 0, 1, 1]);
    }

    #[test]
    fn rejects_label_out_of_range() {
        let mut b = base(2, 2);
        let err = b.set_labels(&[0, 2]).unwrap_err();
        assert_eq!(
            err,
            CviError::LabelOutOfRange {
                index: 1,
                label: 2,
                k: 2
            }
        );
    }
}

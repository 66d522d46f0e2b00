//! Ordered weighted averaging catalogue for DuNN-OWA (spec §4.E, §6).
//!
//! The originating implementation resolves these by name through a
//! `DuNNOWA_get_OWA` lookup whose exact catalogue isn't part of the retained
//! sources; the set below is the one named in the spec's own grammar and is
//! fixed here as the resolved answer to that open question (see DESIGN.md).

use crate::error::CviError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OwaOperator {
    Min,
    Max,
    Mean,
    /// Ignores the input distances, always contributing 1.0. Useful as a
    /// baseline/degenerate aggregator in the catalogue.
    Const,
    /// Mean of the `k` smallest values.
    SMin(usize),
    /// Mean of the `k` largest values.
    SMax(usize),
    /// (Q1 + 2*median + Q3) / 4 of the sorted values.
    Trimean,
}

impl OwaOperator {
    /// `values` need not be pre-sorted; callers pass the raw within- or
    /// between-cluster near-neighbour distances for one point.
    pub fn aggregate(&self, values: &mut [f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.sort_by(|a, b| a.total_cmp(b));
        match self {
            OwaOperator::Min => values[0],
            OwaOperator::Max => values[values.len() - 1],
            OwaOperator::Mean => values.iter().sum::<f64>() / values.len() as f64,
            OwaOperator::Const => 1.0,
            OwaOperator::SMin(k) => mean_of_prefix(values, *k),
            OwaOperator::SMax(k) => mean_of_prefix_from_end(values, *k),
            OwaOperator::Trimean => trimean(values),
        }
    }
}

fn mean_of_prefix(sorted: &[f64], k: usize) -> f64 {
    let k = k.clamp(1, sorted.len());
    sorted[..k].iter().sum::<f64>() / k as f64
}

fn mean_of_prefix_from_end(sorted: &[f64], k: usize) -> f64 {
    let k = k.clamp(1, sorted.len());
    sorted[sorted.len() - k..].iter().sum::<f64>() / k as f64
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

fn trimean(sorted: &[f64]) -> f64 {
    let q1 = quantile(sorted, 0.25);
    let q2 = quantile(sorted, 0.5);
    let q3 = quantile(sorted, 0.75);
    (q1 + 2.0 * q2 + q3) / 4.0
}

pub fn parse_owa(name: &str) -> Result<OwaOperator, CviError> {
    if let Some(k) = name.strip_prefix("SMin:") {
        return k
            .parse::<usize>()
            .ok()
            .filter(|&k| k > 0)
            .map(OwaOperator::SMin)
            .ok_or_else(|| CviError::UnknownOwaOperator(name.to_string()));
    }
    if let Some(k) = name.strip_prefix("SMax:") {
        return k
            .parse::<usize>()
            .ok()
            .filter(|&k| k > 0)
            .map(OwaOperator::SMax)
            .ok_or_else(|| CviError::UnknownOwaOperator(name.to_string()));
    }
    match name {
        "Min" => Ok(OwaOperator::Min),
        "Max" => Ok(OwaOperator::Max),
        "Mean" => Ok(OwaOperator::Mean),
        "Const" => Ok(OwaOperator::Const),
        "Trimean" => Ok(OwaOperator::Trimean),
        _ => Err(CviError::UnknownOwaOperator(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn min_max_mean() {
        let mut v = vec![3.0, 1.0, 2.0];
        assert_eq!(OwaOperator::Min.aggregate(&mut v.clone()), 1.0);
        assert_eq!(OwaOperator::Max.aggregate(&mut v.clone()), 3.0);
        assert_eq!(OwaOperator::Mean.aggregate(&mut v), 2.0);
    }

    #[test]
    fn smin_smax() {
        let mut v = vec![5.0, 1.0, 3.0, 2.0, 4.0];
        assert_eq!(OwaOperator::SMin(2).aggregate(&mut v.clone()), 1.5);
        assert_eq!(OwaOperator::SMax(2).aggregate(&mut v), 4.5);
    }

    #[test]
    fn parses_parameterised_names() {
        assert_eq!(parse_owa("SMin:3").unwrap(), OwaOperator::SMin(3));
        assert_eq!(parse_owa("SMax:7").unwrap(), OwaOperator::SMax(7));
        assert!(parse_owa("SMin:0").is_err());
        assert!(parse_owa("bogus").is_err());
    }
}

//! String-driven variant selection (spec §6's index factory grammar),
//! parallel to how the source's R/Python bindings turn a tag string into
//! a concrete `ClusterValidityIndex` subclass.

use std::sync::Arc;

use crate::cvi::generalized_dunn::{LowercaseDelta, UppercaseDelta};
use crate::cvi::owa::parse_owa;
use crate::cvi::CviIndex;
use crate::error::CviError;
use crate::matrix::PointMatrix;

/// Builds the concrete index named by `variant`, per the grammar:
/// `CalinskiHarabasz`, `DaviesBouldin`, `Silhouette`, `SilhouetteW`, `Dunn`,
/// `WCSS`, `BallHall`, `Gamma`, `DuNN_M_NUM_DEN`, `WCNN_M`, `GDunn_dX_DY`.
pub fn build(
    variant: &str,
    x: Arc<PointMatrix>,
    k: u8,
    allow_undo: bool,
) -> Result<CviIndex, CviError> {
    match variant {
        "CalinskiHarabasz" => CviIndex::new_calinski_harabasz(x, k, allow_undo),
        "DaviesBouldin" => CviIndex::new_davies_bouldin(x, k, allow_undo),
        "Silhouette" => CviIndex::new_silhouette(x, k, allow_undo, false),
        "SilhouetteW" => CviIndex::new_silhouette(x, k, allow_undo, true),
        "Dunn" => CviIndex::new_dunn(x, k, allow_undo),
        "WCSS" => CviIndex::new_wcss(x, k, allow_undo, false),
        "BallHall" => CviIndex::new_wcss(x, k, allow_undo, true),
        "Gamma" => CviIndex::new_gamma(x, k, allow_undo),
        _ if variant.starts_with("DuNN_") => build_dunn_owa(variant, x, k, allow_undo),
        _ if variant.starts_with("WCNN_") => build_wcnn(variant, x, k, allow_undo),
        _ if variant.starts_with("GDunn_") => build_generalized_dunn(variant, x, k, allow_undo),
        other => Err(CviError::UnknownVariant(other.to_string())),
    }
}

fn build_wcnn(variant: &str, x: Arc<PointMatrix>, k: u8, allow_undo: bool) -> Result<CviIndex, CviError> {
    let m_str = variant
        .strip_prefix("WCNN_")
        .ok_or_else(|| CviError::UnknownVariant(variant.to_string()))?;
    let m: i64 = m_str
        .parse()
        .map_err(|_| CviError::UnknownVariant(variant.to_string()))?;
    if m <= 0 {
        return Err(CviError::InvalidM(m));
    }
    CviIndex::new_wcnn(x, k, allow_undo, m as usize)
}

fn build_dunn_owa(variant: &str, x: Arc<PointMatrix>, k: u8, allow_undo: bool) -> Result<CviIndex, CviError> {
    let rest = variant
        .strip_prefix("DuNN_")
        .ok_or_else(|| CviError::UnknownVariant(variant.to_string()))?;
    let mut parts = rest.splitn(3, '_');
    let m_str = parts.next().ok_or_else(|| CviError::UnknownVariant(variant.to_string()))?;
    let num_str = parts.next().ok_or_else(|| CviError::UnknownVariant(variant.to_string()))?;
    let den_str = parts.next().ok_or_else(|| CviError::UnknownVariant(variant.to_string()))?;

    let m: i64 = m_str
        .parse()
        .map_err(|_| CviError::UnknownVariant(variant.to_string()))?;
    if m <= 0 {
        return Err(CviError::InvalidM(m));
    }
    let numerator = parse_owa(num_str)?;
    let denominator = parse_owa(den_str)?;
    CviIndex::new_dunn_owa(x, k, allow_undo, m as usize, numerator, denominator)
}

fn build_generalized_dunn(
    variant: &str,
    x: Arc<PointMatrix>,
    k: u8,
    allow_undo: bool,
) -> Result<CviIndex, CviError> {
    let rest = variant
        .strip_prefix("GDunn_")
        .ok_or_else(|| CviError::UnknownVariant(variant.to_string()))?;
    let mut parts = rest.splitn(2, '_');
    let lower_str = parts.next().ok_or_else(|| CviError::UnknownVariant(variant.to_string()))?;
    let upper_str = parts.next().ok_or_else(|| CviError::UnknownVariant(variant.to_string()))?;

    let lower_idx: u8 = lower_str
        .strip_prefix('d')
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| CviError::UnknownVariant(variant.to_string()))?;
    let upper_idx: u8 = upper_str
        .strip_prefix('D')
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| CviError::UnknownVariant(variant.to_string()))?;

    let lower = match lower_idx {
        1 => LowercaseDelta::D1,
        2 => LowercaseDelta::D2,
        3 => LowercaseDelta::D3,
        4 => LowercaseDelta::D4,
        5 => LowercaseDelta::D5,
        6 => LowercaseDelta::D6,
        _ => return Err(CviError::InvalidLowercaseDelta(lower_idx)),
    };
    let upper = match upper_idx {
        1 => UppercaseDelta::D1,
        2 => UppercaseDelta::D2,
        3 => UppercaseDelta::D3,
        _ => return Err(CviError::InvalidUppercaseDelta(upper_idx)),
    };

    CviIndex::new_generalized_dunn(x, k, allow_undo, lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cvi::Cvi;
    use rstest::rstest;

    fn fixture() -> Arc<PointMatrix> {
        Arc::new(PointMatrix::new(vec![0.0, 0.0, 0.0, 1.0, 10.0, 10.0, 10.0, 11.0], 4, 2).unwrap())
    }

    #[rstest]
    #[case("CalinskiHarabasz")]
    #[case("DaviesBouldin")]
    #[case("Silhouette")]
    #[case("SilhouetteW")]
    #[case("Dunn")]
    #[case("WCSS")]
    #[case("BallHall")]
    #[case("Gamma")]
    fn builds_plain_variants(#[case] name: &str) {
        let mut idx = build(name, fixture(), 2, true).unwrap();
        idx.set_labels(&[0, 0, 1, 1]).unwrap();
        assert!(idx.compute().is_finite());
    }

    #[test]
    fn parses_parameterised_variants() {
        let mut wcnn = build("WCNN_1", fixture(), 2, true).unwrap();
        wcnn.set_labels(&[0, 0, 1, 1]).unwrap();
        assert!(wcnn.compute().is_finite());

        let mut dunn_owa = build("DuNN_1_Min_Max", fixture(), 2, true).unwrap();
        dunn_owa.set_labels(&[0, 0, 1, 1]).unwrap();
        assert!(dunn_owa.compute().is_finite());

        let mut gdunn = build("GDunn_d1_D1", fixture(), 2, true).unwrap();
        gdunn.set_labels(&[0, 0, 1, 1]).unwrap();
        assert!(gdunn.compute().is_finite());
    }

    #[test]
    fn rejects_unknown_and_malformed_variants() {
        assert!(matches!(
            build("NotAVariant", fixture(), 2, true).unwrap_err(),
            CviError::UnknownVariant(_)
        ));
        assert_eq!(
            build("WCNN_0", fixture(), 2, true).unwrap_err(),
            CviError::InvalidM(0)
        );
        assert_eq!(
            build("GDunn_d9_D1", fixture(), 2, true).unwrap_err(),
            CviError::InvalidLowercaseDelta(9)
        );
    }
}

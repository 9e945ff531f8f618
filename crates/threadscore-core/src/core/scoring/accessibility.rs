use crate::core::models::sequence::Sequence;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Relative solvent accessibility keyed by alignment column.
pub type RsaMap = BTreeMap<usize, f64>;

/// Which side of the threshold a residue must fall on to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessibilityFilter {
    /// RSA strictly above the threshold.
    #[default]
    Exposed,
    /// RSA strictly below the threshold.
    Buried,
}

impl AccessibilityFilter {
    pub fn keeps(self, rsa: f64, threshold: f64) -> bool {
        match self {
            AccessibilityFilter::Exposed => rsa > threshold,
            AccessibilityFilter::Buried => rsa < threshold,
        }
    }
}

/// Assigns per-residue tool output, given in residue order, to the alignment columns of the
/// non-gap residues of `sequence`. Extra values on either side are dropped.
pub fn rsa_by_alignment_position(sequence: &Sequence, values: &[f64]) -> RsaMap {
    sequence.residue_positions().zip(values.iter().copied()).collect()
}

fn selected(map: &RsaMap, threshold: f64, filter: AccessibilityFilter) -> BTreeSet<usize> {
    map.iter()
        .filter(|&(_, &rsa)| filter.keeps(rsa, threshold))
        .map(|(&position, _)| position)
        .collect()
}

/// Share of aligned query positions selected by `filter` in both the predicted model and the
/// template. Returns 0 when there are no aligned positions.
pub fn accessibility_score(
    predicted: &RsaMap,
    template: &RsaMap,
    aligned_positions: usize,
    threshold: f64,
    filter: AccessibilityFilter,
) -> f64 {
    if aligned_positions == 0 {
        return 0.0;
    }
    let predicted = selected(predicted, threshold, filter);
    let template = selected(template, threshold, filter);
    let common = predicted.intersection(&template).count();
    debug_assert!(
        common <= aligned_positions,
        "{} shared positions out of {} aligned",
        common,
        aligned_positions
    );
    common as f64 / aligned_positions as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(usize, f64)]) -> RsaMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn identical_maps_score_one() {
        let rsa = map(&[(0, 0.5), (1, 0.6), (2, 0.9)]);
        let score = accessibility_score(&rsa, &rsa, 3, 0.25, AccessibilityFilter::Exposed);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn disjoint_selections_score_zero() {
        let predicted = map(&[(0, 0.9), (1, 0.1)]);
        let template = map(&[(0, 0.1), (1, 0.9)]);
        let score = accessibility_score(&predicted, &template, 2, 0.25, AccessibilityFilter::Exposed);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn exposed_filter_keeps_values_strictly_above_threshold() {
        let predicted = map(&[(0, 0.25), (1, 0.3), (2, 0.8), (3, 0.9)]);
        let template = map(&[(0, 0.25), (1, 0.3), (2, 0.1), (3, 0.9)]);
        let score = accessibility_score(&predicted, &template, 4, 0.25, AccessibilityFilter::Exposed);
        assert_eq!(score, 0.5);
    }

    #[test]
    fn buried_filter_selects_the_other_side() {
        let predicted = map(&[(0, 0.1), (1, 0.2), (2, 0.8)]);
        let template = map(&[(0, 0.05), (1, 0.9), (2, 0.8)]);
        let score = accessibility_score(&predicted, &template, 4, 0.25, AccessibilityFilter::Buried);
        assert_eq!(score, 0.25);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "shared positions")]
    fn denominator_smaller_than_the_overlap_is_not_hidden() {
        let rsa = map(&[(0, 0.5), (1, 0.6), (2, 0.9)]);
        accessibility_score(&rsa, &rsa, 2, 0.25, AccessibilityFilter::Exposed);
    }

    #[test]
    fn no_aligned_positions_scores_zero() {
        let rsa = map(&[(0, 0.9)]);
        assert_eq!(
            accessibility_score(&rsa, &rsa, 0, 0.25, AccessibilityFilter::Exposed),
            0.0
        );
    }

    #[test]
    fn rsa_values_follow_non_gap_columns() {
        let seq = Sequence::from_gapped("-AC-D", 1, 3);
        let rsa = rsa_by_alignment_position(&seq, &[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(rsa, map(&[(1, 0.1), (2, 0.2), (4, 0.3)]));
    }
}

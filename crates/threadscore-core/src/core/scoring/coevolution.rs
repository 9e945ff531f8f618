use super::distance::DistanceMatrix;

/// Standard contact cutoff in Angstroms.
pub const DEFAULT_CONTACT_CUTOFF: f64 = 8.0;

/// A predicted residue contact, with 0-based positions in the ungapped query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coupling {
    /// 1-based rank among the predictions, best first.
    pub rank: usize,
    pub i: usize,
    pub j: usize,
}

/// Number of predicted contacts the template geometry confirms.
pub fn true_positive_contacts(
    matrix: &DistanceMatrix,
    couplings: &[Coupling],
    cutoff: f64,
) -> usize {
    couplings
        .iter()
        .filter(|c| {
            matrix
                .lookup(c.i, c.j)
                .distance()
                .is_some_and(|d| d < cutoff)
        })
        .count()
}

/// `log10(1 + true_positives * (last - first))` over the aligned query span.
pub fn coevolution_score(
    matrix: &DistanceMatrix,
    couplings: &[Coupling],
    first: usize,
    last: usize,
    cutoff: f64,
) -> f64 {
    let hits = true_positive_contacts(matrix, couplings, cutoff);
    (1.0 + (hits * last.saturating_sub(first)) as f64).log10()
}

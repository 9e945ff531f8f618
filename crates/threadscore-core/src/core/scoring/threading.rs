use super::distance::{DistanceMatrix, DistanceRange};
use super::error::ScoringError;
use crate::core::models::residue::AtomSelector;
use crate::core::models::sequence::Sequence;
use crate::core::potentials::dope::DopeTable;

/// Minimum separation along the alignment for a pair to be scored; direct neighbours are
/// bonded and carry no information.
pub const MIN_PAIR_SEPARATION: usize = 2;

/// Threading energy of `query` placed on the `template` backbone, negated so that higher is
/// better.
///
/// Pairs `(i, j)` with `i + 2 <= j <= L - 2` are scored; the last alignment column never
/// takes part, so alignments of three or fewer columns score 0.
///
/// Distances are measured between template alpha carbons; energies are looked up by the
/// query residue names.
pub fn threading_score(
    query: &Sequence,
    template: &Sequence,
    range: DistanceRange,
    table: &DopeTable,
) -> Result<f64, ScoringError> {
    let matrix = DistanceMatrix::build(query, template, Some(range), AtomSelector::Alpha)?;
    threading_score_from_matrix(query, &matrix, table)
}

/// Same as [`threading_score`] on a matrix already built over the alignment columns.
pub fn threading_score_from_matrix(
    query: &Sequence,
    matrix: &DistanceMatrix,
    table: &DopeTable,
) -> Result<f64, ScoringError> {
    let last_column = query.len().saturating_sub(1);
    let mut total = 0.0;
    for (i, j, distance) in matrix.distances() {
        if j < i + MIN_PAIR_SEPARATION || j >= last_column {
            continue;
        }
        let (Some(row), Some(col)) = (query.residue(i), query.residue(j)) else {
            continue;
        };
        let energy = table
            .energy_at(row.name(), col.name(), distance)
            .ok_or(ScoringError::MissingEnergy {
                first: row.name(),
                second: col.name(),
            })?;
        total += energy;
    }
    Ok(-total)
}

use super::error::ScoringError;
use crate::core::models::cursor::lockstep;
use crate::core::models::sequence::Sequence;

/// Predictions at or above this confidence (0-9 scale) are trusted even when they disagree
/// with the template.
pub const DEFAULT_CONFIDENCE_THRESHOLD: u8 = 7;

/// Fraction of the query's residues whose secondary structure prediction is not a
/// low-confidence miss against the template's observed structure.
///
/// Labelled positions of both sequences are paired in order, each side skipping its own
/// unlabelled positions. The denominator is the number of non-gap query residues.
pub fn secondary_structure_score(
    query: &Sequence,
    template: &Sequence,
    confidence_threshold: u8,
) -> Result<f64, ScoringError> {
    let residues = query.gapless_len();
    if residues == 0 {
        return Err(ScoringError::EmptyQuery);
    }

    let misses = lockstep(query.labelled_cursor(), template.labelled_cursor())
        .filter(|((_, predicted), (_, observed))| {
            predicted.confidence() < confidence_threshold
                && predicted.secondary_structure() != observed.secondary_structure()
        })
        .count();

    Ok(residues.saturating_sub(misses) as f64 / residues as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::{Residue, SecondaryStructure};

    fn labelled(sequence: &str, labels: &str, confidences: &str) -> Sequence {
        let residues = sequence
            .chars()
            .zip(labels.chars())
            .zip(confidences.chars())
            .map(|((name, label), conf)| {
                let residue = Residue::new(name);
                match SecondaryStructure::from_code(label) {
                    Some(ss) => residue
                        .with_secondary_structure(ss, conf.to_digit(10).unwrap_or(0) as u8),
                    None => residue,
                }
            })
            .collect();
        Sequence::new(residues, 1, sequence.len())
    }

    #[test]
    fn identical_labels_score_one() {
        let query = labelled("ACDEF", "HHEEC", "12345");
        let template = labelled("ACDEF", "HHEEC", "99999");
        let score = secondary_structure_score(&query, &template, 7).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn only_low_confidence_mismatches_count() {
        let query = labelled("ACDE", "HHHH", "2829");
        let template = labelled("ACDE", "EEEE", "0000");
        let score = secondary_structure_score(&query, &template, 7).unwrap();
        assert_eq!(score, 0.5);
    }

    #[test]
    fn cursors_skip_gaps_independently() {
        // Query labels H,E,C at columns 0,2,3; template labels H,E,C at columns 1,2,4.
        let query = labelled("A-CD-", "H-EC-", "00000");
        let template = labelled("-BC-E", "-HE-C", "00000");
        let score = secondary_structure_score(&query, &template, 7).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn score_stays_within_bounds() {
        let query = labelled("ACDEFG", "HEHEHE", "000000");
        let template = labelled("ACDEFG", "EHEHEH", "000000");
        let score = secondary_structure_score(&query, &template, 7).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn fully_gapped_query_is_an_error() {
        let query = Sequence::from_gapped("-----", 0, 0);
        let template = labelled("ACDEF", "HHHHH", "99999");
        assert_eq!(
            secondary_structure_score(&query, &template, 7),
            Err(ScoringError::EmptyQuery)
        );
    }
}

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Query and template lengths differ ({query} vs {template})")]
    LengthMismatch { query: usize, template: usize },

    #[error("Template residue at alignment position {position} has no usable coordinates")]
    MissingCoordinates { position: usize },

    #[error("No energy for residue pair '{first}{second}' in the distance energy table")]
    MissingEnergy { first: char, second: char },

    #[error(
        "Aligned query span {first}-{last} does not fit a query of {query_length} residues"
    )]
    SpanOutOfBounds {
        first: usize,
        last: usize,
        query_length: usize,
    },

    #[error("Query has no residues outside gaps")]
    EmptyQuery,
}

pub(crate) fn ensure_same_length(query: usize, template: usize) -> Result<(), ScoringError> {
    if query == template {
        Ok(())
    } else {
        Err(ScoringError::LengthMismatch { query, template })
    }
}

//! # Scoring Module
//!
//! Numerical scorers for a single query/template alignment. Every scorer borrows its inputs
//! and is free of side effects, so alignments can be scored concurrently with shared tables.
//!
//! ## Key Components
//!
//! - [`distance`] - Gap-aware inter-residue distance matrix over template coordinates
//! - [`threading`] - Negated pair-potential energy of the query on the template geometry
//! - [`secondary_structure`] - Agreement of predicted and observed secondary structure
//! - [`accessibility`] - Overlap of solvent-exposed residues in model and template
//! - [`coevolution`] - Log-scaled count of predicted contacts confirmed by the template
//! - [`blosum`] - BLOSUM62 substitution score of the aligned columns
//!
//! Degenerate inputs (all-gap alignments, empty contact lists) score a neutral 0. Data
//! contract violations surface as [`ScoringError`].

pub mod accessibility;
pub mod blosum;
pub mod coevolution;
pub mod distance;
mod error;
pub mod secondary_structure;
pub mod threading;

pub use error::ScoringError;

//! # Core Module
//!
//! Stateless building blocks of template scoring: alignment data models, the statistical
//! pair potential, the individual scorers, and file formats.
//!
//! ## Architecture
//!
//! - **Alignment Representation** ([`models`]) - Residues, gapped sequences, alignments and
//!   gap-skipping cursors
//! - **Statistical Potentials** ([`potentials`]) - Distance-dependent pair energies
//! - **Scorers** ([`scoring`]) - Threading, secondary structure, accessibility,
//!   co-evolution and substitution scores of one alignment
//! - **File I/O** ([`io`]) - Alignment sets, coordinate files, tool reports, score tables
//! - **Reference Data** ([`utils`]) - Residue code tables
//!
//! Nothing in this module touches process state or spawns tools; that is the job of the
//! [`crate::engine`] layer.

pub mod io;
pub mod models;
pub mod potentials;
pub mod scoring;
pub mod utils;

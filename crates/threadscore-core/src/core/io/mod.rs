//! # I/O Module
//!
//! Readers and writers for the files exchanged with upstream tools and downstream ranking.
//!
//! ## Inputs
//!
//! - [`alignment_set`] - TOML description of a query and its candidate alignments
//! - [`pdb`] - Backbone coordinates from PDB-format template and model files
//! - [`dssp`] - Per-residue accessibility from classic DSSP reports
//! - [`couplings`] - Co-evolution coupling matrices and top-pair selection
//!
//! ## Outputs
//!
//! - [`pir`] - PIR alignment files for the comparative modeling tool
//! - [`pdb`] - Query sequence threaded onto the template backbone
//! - [`scores`] - The per-query score table
//!
//! Line-oriented tool outputs share the [`traits::RecordFile`] interface.

pub mod alignment_set;
pub mod couplings;
pub mod dssp;
pub mod pdb;
pub mod pir;
pub mod scores;
pub mod traits;

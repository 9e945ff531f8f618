//! # Core Models Module
//!
//! Data structures describing an alignment between a query sequence and a structural
//! template.
//!
//! ## Key Components
//!
//! - [`residue`] - A single alignment position: one-letter name, secondary structure label
//!   with confidence, and backbone coordinates
//! - [`sequence`] - A gapped sequence with the span it covers in the ungapped original
//! - [`alignment`] - A query/template pair plus template identity and benchmark label
//! - [`cursor`] - Gap-skipping cursors used to walk two gapped sequences in lock-step
//!
//! All models are immutable once built: scorers only ever borrow them.

pub mod alignment;
pub mod cursor;
pub mod residue;
pub mod sequence;

//! # threadscore
//!
//! Scores how well a query protein sequence threads onto candidate template structures, so
//! that the templates can be ranked for comparative modeling.
//!
//! ## Architecture
//!
//! The library keeps the three-layer split of a scientific pipeline:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Residue`, `Sequence`, `Alignment`),
//!   the distance-dependent statistical potential, the individual scorers, and file formats.
//!
//! - **[`engine`]: The Evaluation Layer.** Configuration, external tool adapters, and the
//!   aggregator that produces the full score vector for one alignment.
//!
//! - **[`workflows`]: The Public API.** Batch scoring of a whole alignment set: loading
//!   resources, parallel evaluation, normalization, ranking, and the persisted score table.

pub mod core;
pub mod engine;
pub mod workflows;

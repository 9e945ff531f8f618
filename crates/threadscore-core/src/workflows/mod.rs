//! # Workflows Module
//!
//! Top-level entry points. A workflow loads its resources, drives the engine over a batch of
//! alignments, reports progress, and persists the results.
//!
//! - **Scoring Workflow** ([`score`]) - Scores every alignment of a set, normalizes and ranks
//!   the results, and writes the score table.

pub mod score;

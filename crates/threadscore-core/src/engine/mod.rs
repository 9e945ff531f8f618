//! # Engine Module
//!
//! The per-alignment evaluation layer. It turns one [`Alignment`](crate::core::models::alignment::Alignment)
//! plus its template coordinates into a full score vector, delegating model building and
//! structure analysis to external programs.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Scoring parameters and the on-disk workspace layout
//! - **Evaluation** ([`evaluate`]) - The aggregator that runs every scorer for one alignment
//! - **External Tools** ([`external`]) - Subprocess adapters behind the modeling and analysis traits
//! - **Diagnostics** ([`diagnostics`]) - Thread-safe sink for per-alignment failures
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level error type carrying alignment identity
//!
//! A failing alignment never aborts its batch: its error is recorded in [`diagnostics::Diagnostics`]
//! and the caller moves on to the next one.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod evaluate;
pub mod external;
pub mod progress;

//! Configuration of the command-line front end: the TOML file format, built-in defaults,
//! and the merge of file, `--set` overrides, and command-line flags into the core
//! [`ScoringConfig`](threadscore::engine::config::ScoringConfig).

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

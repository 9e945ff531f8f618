//! Knowledge-based pair potentials used to score threaded geometries.

pub mod dope;

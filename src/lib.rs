//! Random Walk — biased 2D lattice walks and their distance statistics.
//!
//! Simulates walkers whose moves are drawn from weighted direction profiles,
//! summarizes how far they end up from the origin over repeated trials, and
//! plots batches of end points through a pluggable image exporter.

pub mod core;
pub mod schema;

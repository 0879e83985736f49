//! Three-phase power aggregation and imbalance detection.
//!
//! Per-phase averaged readings go in, system-level totals (active, apparent,
//! reactive), the overall power factor and the relative spread of each
//! quantity across phases come out. Pure computation, no I/O.

pub mod analyzer;
pub mod snapshot;

pub use analyzer::ThreePhaseAnalyzer;
pub use snapshot::ThreePhaseSnapshot;

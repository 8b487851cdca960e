//! Elapsed-time arithmetic behind every stat card and video.
//!
//! Both calculators take validated instants and never fail: the absolute difference is taken
//! first, so results are always non-negative.

/// Day counts, tropical years and clock-hand cycles.
pub mod cosmic;
/// Calendar-aware elapsed breakdown.
pub mod elapsed;

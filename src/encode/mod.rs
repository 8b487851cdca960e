//! Video encoders.
//!
//! Encoders consume frames from the animated frame engine in strictly increasing order.

/// `ffmpeg`-based encoder with codec negotiation.
pub mod ffmpeg;
/// Encoder trait and the in-memory encoder.
pub mod sink;

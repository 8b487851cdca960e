//! The export boundary: one exporter owns the pipelines and is the only code that hands
//! artifacts to the host.

/// Finished artifact bytes and naming.
pub mod artifact;
/// Deterministic, sanitized artifact names.
pub mod filename;
/// Delivery to the host application.
pub mod host;
/// Export state machine.
pub mod orchestrator;

/// Convenience result type used across the export engine.
pub type ExportResult<T> = Result<T, ExportError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is local and recoverable: the orchestrator returns to idle and the same export
/// may be retried. Declined share sheets and missing clipboards are not errors at all (see
/// [`crate::export::host::DeliveryOutcome::Skipped`]).
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// Invalid caller-provided data (timestamps, config values, settings).
    #[error("validation error: {0}")]
    Validation(String),

    /// Another export owns the render surface.
    #[error("export busy: {0}")]
    Busy(String),

    /// Rasterization or serialization of a static artifact failed.
    #[error("capture failed: {0}")]
    Capture(String),

    /// No supported video container/codec is available on this host.
    #[error("encoder unsupported: {0}")]
    EncoderUnsupported(String),

    /// The video encoder failed while running.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExportError {
    /// Build an [`ExportError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`ExportError::Busy`] value.
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }

    /// Build an [`ExportError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build an [`ExportError::EncoderUnsupported`] value.
    pub fn encoder_unsupported(msg: impl Into<String>) -> Self {
        Self::EncoderUnsupported(msg.into())
    }

    /// Build an [`ExportError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`ExportError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Short, user-facing notice for this failure.
    ///
    /// Hosts show this instead of the detailed message; all failures read as a retryable
    /// "export failed".
    pub fn user_notice(&self) -> &'static str {
        match self {
            Self::Busy(_) => "Another export is still running.",
            Self::EncoderUnsupported(_) => "Video export is not supported on this device.",
            _ => "Export failed. Please try again.",
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

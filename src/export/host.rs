use std::path::PathBuf;

use anyhow::Context;

use crate::export::artifact::RenderedArtifact;
use crate::foundation::error::ExportResult;

/// How the user asked to receive an artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeliveryMode {
    /// Save as a file.
    Download,
    /// Hand to a native share sheet.
    Share,
    /// Copy to the system clipboard.
    Clipboard,
}

/// What happened to a delivered artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The host accepted the artifact.
    Delivered {
        /// Where it was written, when it became a file.
        location: Option<PathBuf>,
    },
    /// Unsupported or dismissed; not an error.
    Skipped {
        /// Human-readable reason.
        reason: String,
    },
}

impl DeliveryOutcome {
    fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }
}

/// The host application's side-effect boundary.
///
/// The exporter is the only caller; nothing else in the crate downloads, shares or copies.
pub trait ArtifactHost {
    /// Hand `artifact` over. Returns `Skipped` rather than an error when `mode` is unavailable.
    fn deliver(
        &mut self,
        artifact: &RenderedArtifact,
        mode: DeliveryMode,
    ) -> ExportResult<DeliveryOutcome>;
}

/// Writes downloads into a directory. Has no share sheet or clipboard.
#[derive(Clone, Debug)]
pub struct DirectoryHost {
    dir: PathBuf,
}

impl DirectoryHost {
    /// Deliver into `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl ArtifactHost for DirectoryHost {
    fn deliver(
        &mut self,
        artifact: &RenderedArtifact,
        mode: DeliveryMode,
    ) -> ExportResult<DeliveryOutcome> {
        if mode != DeliveryMode::Download {
            tracing::info!(?mode, file = %artifact.filename, "delivery skipped");
            return Ok(DeliveryOutcome::skipped(format!("{mode:?} is not available")));
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir {}", self.dir.display()))?;
        let path = self.dir.join(&artifact.filename);
        std::fs::write(&path, &artifact.bytes)
            .with_context(|| format!("write artifact {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "artifact written");
        Ok(DeliveryOutcome::Delivered {
            location: Some(path),
        })
    }
}

/// Keeps every delivered artifact in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryHost {
    /// Whether a share sheet is available.
    pub can_share: bool,
    /// Whether the clipboard accepts images.
    pub can_copy: bool,
    delivered: Vec<(DeliveryMode, RenderedArtifact)>,
}

impl MemoryHost {
    /// Host with share and clipboard support.
    pub fn new() -> Self {
        Self {
            can_share: true,
            can_copy: true,
            delivered: Vec::new(),
        }
    }

    /// Host that only supports downloads.
    pub fn download_only() -> Self {
        Self::default()
    }

    /// Everything accepted so far, in delivery order.
    pub fn delivered(&self) -> &[(DeliveryMode, RenderedArtifact)] {
        &self.delivered
    }
}

impl ArtifactHost for MemoryHost {
    fn deliver(
        &mut self,
        artifact: &RenderedArtifact,
        mode: DeliveryMode,
    ) -> ExportResult<DeliveryOutcome> {
        let refusal = match mode {
            DeliveryMode::Download => None,
            DeliveryMode::Share if !self.can_share => Some("share is not available"),
            DeliveryMode::Share => None,
            DeliveryMode::Clipboard if !self.can_copy => Some("clipboard is not available"),
            DeliveryMode::Clipboard if !artifact.is_clipboard_image() => {
                Some("clipboard only accepts png images")
            }
            DeliveryMode::Clipboard => None,
        };
        if let Some(reason) = refusal {
            tracing::info!(?mode, reason, "delivery skipped");
            return Ok(DeliveryOutcome::skipped(reason));
        }
        self.delivered.push((mode, artifact.clone()));
        Ok(DeliveryOutcome::Delivered { location: None })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/host.rs"]
mod tests;

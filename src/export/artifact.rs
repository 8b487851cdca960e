use crate::encode::sink::EncodedStream;

/// A finished export, ready for the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// File contents.
    pub bytes: Vec<u8>,
    /// MIME type.
    pub mime: &'static str,
    /// Deterministic file name including the extension.
    pub filename: String,
}

impl RenderedArtifact {
    /// Wrap an encoded video; `stem` is the filename without extension.
    pub fn from_stream(stream: EncodedStream, stem: &str) -> Self {
        Self {
            filename: format!("{stem}.{}", stream.extension),
            mime: stream.mime,
            bytes: stream.bytes,
        }
    }

    /// Whether the artifact is a raster image the clipboard can hold.
    pub fn is_clipboard_image(&self) -> bool {
        self.mime == "image/png"
    }
}

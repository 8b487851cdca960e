use crate::foundation::core::{Fps, FrameIndex, FrameRGBA};
use crate::foundation::error::{ExportError, ExportResult};
use crate::settings::VideoCodec;

/// Configuration provided to a [`VideoEncoder`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EncoderConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame rate.
    pub fps: Fps,
    /// Target bitrate.
    pub bitrate_bps: u64,
    /// Color translucent pixels are flattened over (straight RGBA8).
    pub background: [u8; 4],
}

/// A finished video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedStream {
    /// Container bytes.
    pub bytes: Vec<u8>,
    /// Codec used, when the encoder produced a real video.
    pub codec: Option<VideoCodec>,
    /// File extension without the dot.
    pub extension: &'static str,
    /// MIME type.
    pub mime: &'static str,
    /// Frames written.
    pub frames: u64,
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing [`FrameIndex`] order between
/// `begin` and `finish`. `abort` discards everything pushed so far; no stream is produced.
pub trait VideoEncoder: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: EncoderConfig) -> ExportResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ExportResult<()>;
    /// Finalize and return the encoded stream.
    fn finish(&mut self) -> ExportResult<EncodedStream>;
    /// Drop partial output. Safe to call in any state.
    fn abort(&mut self);
}

impl<E: VideoEncoder + ?Sized> VideoEncoder for Box<E> {
    fn begin(&mut self, cfg: EncoderConfig) -> ExportResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ExportResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn finish(&mut self) -> ExportResult<EncodedStream> {
        (**self).finish()
    }

    fn abort(&mut self) {
        (**self).abort()
    }
}

/// In-memory encoder for tests and debugging.
///
/// Keeps every frame; `finish` returns a JSON manifest of what was received.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    cfg: Option<EncoderConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    aborted: bool,
}

#[derive(serde::Serialize)]
struct Manifest<'a> {
    width: u32,
    height: u32,
    fps: Fps,
    frames: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

impl InMemoryEncoder {
    /// Create a new in-memory encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, while running.
    pub fn config(&self) -> Option<EncoderConfig> {
        self.cfg
    }

    /// Frames received since the last `begin`.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether the last run was aborted.
    pub fn was_aborted(&self) -> bool {
        self.aborted
    }
}

impl VideoEncoder for InMemoryEncoder {
    fn begin(&mut self, cfg: EncoderConfig) -> ExportResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ExportError::validation("encoder width/height must be non-zero"));
        }
        self.cfg = Some(cfg);
        self.frames.clear();
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ExportResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| ExportError::encode("in-memory encoder not started"))?;
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(ExportError::encode(format!(
                "out-of-order frame {} after {}",
                idx.0, last.0
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ExportError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<EncodedStream> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| ExportError::encode("in-memory encoder not started"))?;
        let manifest = Manifest {
            width: cfg.width,
            height: cfg.height,
            fps: cfg.fps,
            frames: self.frames.iter().map(|(i, _)| i.0).collect(),
            note: self.frames.is_empty().then_some("no frames"),
        };
        Ok(EncodedStream {
            bytes: serde_json::to_vec(&manifest)?,
            codec: None,
            extension: "json",
            mime: "application/json",
            frames: self.frames.len() as u64,
        })
    }

    fn abort(&mut self) {
        self.cfg = None;
        self.frames.clear();
        self.aborted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EncoderConfig {
        EncoderConfig {
            width: 2,
            height: 2,
            fps: Fps::new(30, 1).unwrap(),
            bitrate_bps: 1_000,
            background: [0, 0, 0, 255],
        }
    }

    fn frame() -> FrameRGBA {
        FrameRGBA {
            width: 2,
            height: 2,
            data: vec![0; 16],
            premultiplied: true,
        }
    }

    #[test]
    fn rejects_out_of_order_frames() {
        let mut enc = InMemoryEncoder::new();
        enc.begin(cfg()).unwrap();
        enc.push_frame(FrameIndex(0), &frame()).unwrap();
        enc.push_frame(FrameIndex(2), &frame()).unwrap();
        assert!(enc.push_frame(FrameIndex(2), &frame()).is_err());
        assert!(enc.push_frame(FrameIndex(1), &frame()).is_err());
    }

    #[test]
    fn finish_reports_received_frames() {
        let mut enc = InMemoryEncoder::new();
        enc.begin(cfg()).unwrap();
        enc.push_frame(FrameIndex(0), &frame()).unwrap();
        enc.push_frame(FrameIndex(1), &frame()).unwrap();
        let out = enc.finish().unwrap();
        assert_eq!(out.frames, 2);
        let v: serde_json::Value = serde_json::from_slice(&out.bytes).unwrap();
        assert_eq!(v["frames"], serde_json::json!([0, 1]));
        assert!(enc.finish().is_err());
    }

    #[test]
    fn abort_discards_frames() {
        let mut enc = InMemoryEncoder::new();
        enc.begin(cfg()).unwrap();
        enc.push_frame(FrameIndex(0), &frame()).unwrap();
        enc.abort();
        assert!(enc.frames().is_empty());
        assert!(enc.was_aborted());
        assert!(enc.finish().is_err());
    }
}

use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::encode::sink::{EncodedStream, EncoderConfig, VideoEncoder};
use crate::foundation::core::{Fps, FrameIndex, FrameRGBA};
use crate::foundation::error::{ExportError, ExportResult};
use crate::foundation::math::mul_div255_u16;
use crate::settings::{EngineSettings, VideoCodec};

static RUN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Options for [`FfmpegEncoder`].
#[derive(Clone, Debug, PartialEq)]
pub struct FfmpegOpts {
    /// ffmpeg executable.
    pub bin: String,
    /// Codec preference; the first one this ffmpeg build offers wins.
    pub codecs: Vec<VideoCodec>,
    /// Directory for the in-progress container file.
    pub scratch_dir: PathBuf,
}

impl FfmpegOpts {
    /// Options from engine settings, writing scratch files to the system temp dir.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            bin: settings.ffmpeg_bin.clone(),
            codecs: settings.codecs.clone(),
            scratch_dir: std::env::temp_dir(),
        }
    }
}

/// Deletes the scratch container unless it was handed off.
struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    fn new(dir: &Path, ext: &str) -> Self {
        let n = RUN_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self {
            path: dir.join(format!("milestone-export-{}-{n}.{ext}", std::process::id())),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.path.exists()
            && let Err(e) = std::fs::remove_file(&self.path)
        {
            tracing::warn!(path = %self.path.display(), error = %e, "scratch video not removed");
        }
    }
}

struct Running {
    cfg: EncoderConfig,
    codec: VideoCodec,
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: ScratchFile,
    buf: Vec<u8>,
    last_idx: Option<FrameIndex>,
    frames: u64,
}

/// Encoder that spawns the system `ffmpeg` and streams raw frames to its stdin.
///
/// The codec is negotiated at `begin`: the preference list is checked against
/// `ffmpeg -encoders` and the first available one is used.
pub struct FfmpegEncoder {
    opts: FfmpegOpts,
    run: Option<Running>,
}

impl FfmpegEncoder {
    /// Create an idle encoder.
    pub fn new(opts: FfmpegOpts) -> Self {
        Self { opts, run: None }
    }

    /// Codec the current run negotiated.
    pub fn codec(&self) -> Option<VideoCodec> {
        self.run.as_ref().map(|r| r.codec)
    }
}

/// Encoders this ffmpeg build lists.
pub fn probe_encoders(bin: &str) -> ExportResult<String> {
    let out = Command::new(bin)
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| {
            ExportError::encoder_unsupported(format!(
                "failed to run '{bin}' (is it installed and on PATH?): {e}"
            ))
        })?;
    if !out.status.success() {
        return Err(ExportError::encoder_unsupported(format!(
            "'{bin} -encoders' exited with status {}",
            out.status
        )));
    }
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// First codec in `preference` that appears in an `ffmpeg -encoders` listing.
pub fn negotiate_codec(listing: &str, preference: &[VideoCodec]) -> Option<VideoCodec> {
    preference.iter().copied().find(|c| {
        listing
            .lines()
            .any(|l| l.split_whitespace().nth(1) == Some(c.encoder()))
    })
}

fn codec_args(codec: VideoCodec, bitrate_bps: u64) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-an".into(),
        "-c:v".into(),
        codec.encoder().into(),
        "-b:v".into(),
        bitrate_bps.to_string(),
        "-pix_fmt".into(),
        "yuv420p".into(),
    ];
    match codec {
        VideoCodec::Vp9 => args.extend(["-row-mt".into(), "1".into()]),
        VideoCodec::Vp8 => {}
        VideoCodec::H264 => args.extend(["-movflags".into(), "+faststart".into()]),
    }
    args
}

fn input_fps(fps: Fps) -> String {
    format!("{}/{}", fps.num, fps.den)
}

impl VideoEncoder for FfmpegEncoder {
    #[tracing::instrument(level = "debug", skip(self), fields(bin = %self.opts.bin))]
    fn begin(&mut self, cfg: EncoderConfig) -> ExportResult<()> {
        self.abort();
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ExportError::validation(
                "ffmpeg encoder width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(ExportError::validation(
                "ffmpeg encoder width/height must be even (required for yuv420p output)",
            ));
        }
        if cfg.bitrate_bps == 0 {
            return Err(ExportError::validation("bitrate must be non-zero"));
        }

        let listing = probe_encoders(&self.opts.bin)?;
        let codec = negotiate_codec(&listing, &self.opts.codecs).ok_or_else(|| {
            ExportError::encoder_unsupported(format!(
                "none of {:?} is available in '{}'",
                self.opts.codecs, self.opts.bin
            ))
        })?;
        if self.opts.codecs.first() != Some(&codec) {
            tracing::warn!(codec = codec.encoder(), "preferred codec unavailable, falling back");
        }

        std::fs::create_dir_all(&self.opts.scratch_dir).map_err(|e| {
            ExportError::encode(format!(
                "failed to create scratch directory '{}': {e}",
                self.opts.scratch_dir.display()
            ))
        })?;
        let scratch = ScratchFile::new(&self.opts.scratch_dir, codec.extension());

        let mut cmd = Command::new(&self.opts.bin);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &input_fps(cfg.fps),
            "-i",
            "pipe:0",
        ])
        .args(codec_args(codec, cfg.bitrate_bps))
        .arg(&scratch.path);

        let mut child = cmd.spawn().map_err(|e| {
            ExportError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExportError::encode("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExportError::encode("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::info!(codec = codec.encoder(), w = cfg.width, h = cfg.height, "ffmpeg started");
        self.run = Some(Running {
            buf: vec![0u8; cfg.width as usize * cfg.height as usize * 4],
            cfg,
            codec,
            child,
            stdin: Some(stdin),
            stderr_drain: Some(stderr_drain),
            scratch,
            last_idx: None,
            frames: 0,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ExportResult<()> {
        let run = self
            .run
            .as_mut()
            .ok_or_else(|| ExportError::encode("ffmpeg encoder not started"))?;
        if let Some(last) = run.last_idx
            && idx <= last
        {
            return Err(ExportError::encode(
                "ffmpeg encoder received out-of-order frame index",
            ));
        }
        if frame.width != run.cfg.width || frame.height != run.cfg.height {
            return Err(ExportError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, run.cfg.width, run.cfg.height
            )));
        }
        flatten_to_opaque_rgba8(
            &mut run.buf,
            &frame.data,
            frame.premultiplied,
            run.cfg.background,
        )?;

        let stdin = run
            .stdin
            .as_mut()
            .ok_or_else(|| ExportError::encode("ffmpeg encoder is already finalized"))?;
        stdin
            .write_all(&run.buf)
            .map_err(|e| ExportError::encode(format!("failed to write frame to ffmpeg: {e}")))?;
        run.last_idx = Some(idx);
        run.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<EncodedStream> {
        let mut run = self
            .run
            .take()
            .ok_or_else(|| ExportError::encode("ffmpeg encoder not started"))?;
        drop(run.stdin.take());

        let status = run
            .child
            .wait()
            .map_err(|e| ExportError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = match run.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ExportError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ExportError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ExportError::encode(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }

        let bytes = std::fs::read(&run.scratch.path).map_err(|e| {
            ExportError::encode(format!(
                "failed to read encoded video '{}': {e}",
                run.scratch.path.display()
            ))
        })?;
        tracing::info!(frames = run.frames, bytes = bytes.len(), "ffmpeg finished");
        Ok(EncodedStream {
            bytes,
            codec: Some(run.codec),
            extension: run.codec.extension(),
            mime: run.codec.mime(),
            frames: run.frames,
        })
    }

    fn abort(&mut self) {
        let Some(mut run) = self.run.take() else {
            return;
        };
        drop(run.stdin.take());
        if let Err(e) = run.child.kill() {
            tracing::debug!(error = %e, "ffmpeg already exited");
        }
        let _ = run.child.wait();
        if let Some(handle) = run.stderr_drain.take() {
            let _ = handle.join();
        }
        tracing::info!(frames = run.frames, "ffmpeg run aborted");
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        self.abort();
    }
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> ExportResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ExportError::validation(
            "frame data size mismatch with width*height*4",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let (r, g, b) = if src_is_premul {
            (
                u16::from(s[0]) + mul_div255_u16(bg_r, inv),
                u16::from(s[1]) + mul_div255_u16(bg_g, inv),
                u16::from(s[2]) + mul_div255_u16(bg_b, inv),
            )
        } else {
            (
                mul_div255_u16(u16::from(s[0]), a) + mul_div255_u16(bg_r, inv),
                mul_div255_u16(u16::from(s[1]), a) + mul_div255_u16(bg_g, inv),
                mul_div255_u16(u16::from(s[2]), a) + mul_div255_u16(bg_b, inv),
            )
        };

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Return `true` when `bin` can be invoked.
pub fn is_ffmpeg_on_path(bin: &str) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

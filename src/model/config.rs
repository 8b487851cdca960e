use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ExportError, ExportResult};
use crate::theme::tokens::ThemeId;

macro_rules! str_enum {
    ($ty:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Stable identifier.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $s),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ExportError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        ExportError::validation(format!(
                            concat!("unknown ", stringify!($ty), " '{}'"),
                            s
                        ))
                    })
            }
        }
    };
}

/// Output aspect ratio; each maps to one fixed canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AspectRatio {
    /// 1080 x 1080.
    #[serde(rename = "1:1")]
    Square,
    /// 1080 x 1350.
    #[serde(rename = "4:5")]
    Portrait,
    /// 1080 x 1920.
    #[default]
    #[serde(rename = "9:16")]
    Story,
}

str_enum!(AspectRatio {
    Square => "1:1",
    Portrait => "4:5",
    Story => "9:16",
});

impl AspectRatio {
    /// Logical canvas for this ratio.
    pub fn canvas(self) -> Canvas {
        let height = match self {
            AspectRatio::Square => 1080,
            AspectRatio::Portrait => 1350,
            AspectRatio::Story => 1920,
        };
        Canvas {
            width: 1080,
            height,
        }
    }
}

/// Card template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    /// Centered card with kicker, title, date pill and stats grid.
    #[default]
    Classic,
    /// Left-aligned editorial layout.
    Modern,
    /// Oversized poster typography.
    Bold,
    /// Title and date only.
    Minimal,
    /// Cover-image backdrop with a dark scrim.
    Cinematic,
    /// Instant-photo pastiche.
    Polaroid,
    /// Passport data-page pastiche.
    Passport,
}

str_enum!(TemplateId {
    Classic => "classic",
    Modern => "modern",
    Bold => "bold",
    Minimal => "minimal",
    Cinematic => "cinematic",
    Polaroid => "polaroid",
    Passport => "passport",
});

/// Pixel-density tier for raster capture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// 1x.
    Standard,
    /// 2x.
    #[default]
    High,
    /// 4x.
    Ultra,
}

str_enum!(QualityTier {
    Standard => "standard",
    High => "high",
    Ultra => "ultra",
});

impl QualityTier {
    /// Integer pixel density.
    pub fn density(self) -> u32 {
        match self {
            QualityTier::Standard => 1,
            QualityTier::High => 2,
            QualityTier::Ultra => 4,
        }
    }
}

/// Static artifact container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaticFormat {
    /// Raster PNG at canvas x density.
    #[default]
    Png,
    /// Vector SVG.
    Svg,
    /// Single-page PDF.
    Pdf,
}

str_enum!(StaticFormat {
    Png => "png",
    Svg => "svg",
    Pdf => "pdf",
});

impl StaticFormat {
    /// File extension.
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// MIME type.
    pub fn mime(self) -> &'static str {
        match self {
            StaticFormat::Png => "image/png",
            StaticFormat::Svg => "image/svg+xml",
            StaticFormat::Pdf => "application/pdf",
        }
    }
}

/// Animated backdrop and palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStyle {
    /// Dark gradient with drifting gold dust.
    #[default]
    Cinematic,
    /// Scrolling magenta grid.
    Neon,
    /// White with a soft indigo glow.
    Minimal,
    /// Radial deep-space starfield.
    Cosmic,
    /// Synthwave sun with scanlines.
    Retro,
}

str_enum!(VideoStyle {
    Cinematic => "cinematic",
    Neon => "neon",
    Minimal => "minimal",
    Cosmic => "cosmic",
    Retro => "retro",
});

/// Static or animated output.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum OutputKind {
    /// A single image or document.
    Static {
        /// Container.
        format: StaticFormat,
    },
    /// A video.
    Animated {
        /// Length in seconds.
        duration_secs: u32,
        /// Visual style.
        style: VideoStyle,
    },
}

impl Default for OutputKind {
    fn default() -> Self {
        OutputKind::Static {
            format: StaticFormat::Png,
        }
    }
}

/// Everything that selects one artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Card template.
    pub template: TemplateId,
    /// Color theme.
    pub theme: ThemeId,
    /// Static or animated output.
    pub output: OutputKind,
    /// Raster density tier.
    pub quality: QualityTier,
    /// Render derived stat blocks.
    pub show_stats: bool,
    /// Render clock-hand cycles and orbit decoration.
    pub cosmic_overlay: bool,
}

impl ExportConfig {
    /// Durations offered to users.
    pub const DURATIONS_SECS: [u32; 3] = [5, 10, 15];

    /// Logical canvas, fixed by the aspect ratio.
    pub fn canvas(&self) -> Canvas {
        self.aspect_ratio.canvas()
    }

    /// Pixel size of a raster capture: canvas x density.
    pub fn pixel_size(&self) -> Canvas {
        self.canvas().scaled(self.quality.density())
    }

    /// Reject values no pipeline can honor.
    pub fn validate(&self) -> ExportResult<()> {
        if let OutputKind::Animated { duration_secs, .. } = self.output
            && duration_secs == 0
        {
            return Err(ExportError::validation(
                "animated export duration must be > 0 seconds",
            ));
        }
        Ok(())
    }
}

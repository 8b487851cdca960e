use std::fmt;
use std::str::FromStr;

use crate::foundation::error::ExportError;

/// One opaque sRGB color expressed as 8-bit components.
///
/// Every renderer formats colors from these components, so the vector, raster and document
/// backends always agree on the exact value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Build from components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Space separated component triplet, `"r g b"`.
    pub fn css_triplet(self) -> String {
        format!("{} {} {}", self.r, self.g, self.b)
    }

    /// Lowercase `#rrggbb`.
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Packed `0xRRGGBB`.
    pub fn packed(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Straight-alpha RGBA8 with the given alpha.
    pub fn rgba8(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('#');
        let nib = |c: u8| -> Option<u8> { (c as char).to_digit(16).map(|v| v as u8) };
        let b = s.as_bytes();
        match b.len() {
            3 => Some(Self::new(
                nib(b[0])? * 17,
                nib(b[1])? * 17,
                nib(b[2])? * 17,
            )),
            6 => Some(Self::new(
                nib(b[0])? * 16 + nib(b[1])?,
                nib(b[2])? * 16 + nib(b[3])?,
                nib(b[4])? * 16 + nib(b[5])?,
            )),
            _ => None,
        }
    }

    /// Component-wise mix toward `other` by `t` in `[0, 1]`.
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let m = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb::new(m(self.r, other.r), m(self.g, other.g), m(self.b, other.b))
    }
}

/// Resolved color tokens for one theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColorTokens {
    /// Page background.
    pub base: Rgb,
    /// Raised surface (cards, stat blocks).
    pub card: Rgb,
    /// Primary text.
    pub text: Rgb,
    /// Secondary text.
    pub muted: Rgb,
    /// Accent.
    pub primary: Rgb,
    /// Hairlines and outlines.
    pub border: Rgb,
    /// Input well fill; used for pills and placeholder tints.
    pub input: Rgb,
}

/// Closed set of theme identifiers.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    /// Light slate.
    #[default]
    Light,
    /// Dark slate.
    Dark,
    /// Pure black.
    Amoled,
    /// Acid green on black.
    Acidic,
    /// Cyan/magenta/yellow neon.
    Cyberpunk,
    /// Handheld green monochrome.
    Retro,
    /// Deep navy with cyan.
    Futuristic,
    /// Parchment.
    Historical,
    /// Greens.
    Nature,
    /// Cyans.
    Ocean,
    /// Rose.
    Sunset,
}

impl ThemeId {
    /// Every theme, in picker order.
    pub const ALL: [ThemeId; 11] = [
        ThemeId::Light,
        ThemeId::Dark,
        ThemeId::Amoled,
        ThemeId::Acidic,
        ThemeId::Cyberpunk,
        ThemeId::Retro,
        ThemeId::Futuristic,
        ThemeId::Historical,
        ThemeId::Nature,
        ThemeId::Ocean,
        ThemeId::Sunset,
    ];

    /// Stable lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeId::Light => "light",
            ThemeId::Dark => "dark",
            ThemeId::Amoled => "amoled",
            ThemeId::Acidic => "acidic",
            ThemeId::Cyberpunk => "cyberpunk",
            ThemeId::Retro => "retro",
            ThemeId::Futuristic => "futuristic",
            ThemeId::Historical => "historical",
            ThemeId::Nature => "nature",
            ThemeId::Ocean => "ocean",
            ThemeId::Sunset => "sunset",
        }
    }

    /// Whether text is light-on-dark for this theme.
    pub fn is_dark(self) -> bool {
        let t = resolve(self);
        luminance(t.base) < 0.5
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeId::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExportError::validation(format!("unknown theme '{s}'")))
    }
}

const fn tokens(
    base: [u8; 3],
    card: [u8; 3],
    text: [u8; 3],
    muted: [u8; 3],
    primary: [u8; 3],
    border: [u8; 3],
    input: [u8; 3],
) -> ColorTokens {
    const fn c(v: [u8; 3]) -> Rgb {
        Rgb::new(v[0], v[1], v[2])
    }
    ColorTokens {
        base: c(base),
        card: c(card),
        text: c(text),
        muted: c(muted),
        primary: c(primary),
        border: c(border),
        input: c(input),
    }
}

const LIGHT: ColorTokens = tokens(
    [248, 250, 252],
    [255, 255, 255],
    [15, 23, 42],
    [100, 116, 139],
    [79, 70, 229],
    [226, 232, 240],
    [241, 245, 249],
);
const DARK: ColorTokens = tokens(
    [15, 23, 42],
    [30, 41, 59],
    [248, 250, 252],
    [148, 163, 184],
    [99, 102, 241],
    [51, 65, 85],
    [51, 65, 85],
);
const AMOLED: ColorTokens = tokens(
    [0, 0, 0],
    [10, 10, 10],
    [255, 255, 255],
    [163, 163, 163],
    [255, 255, 255],
    [51, 51, 51],
    [23, 23, 23],
);
const ACIDIC: ColorTokens = tokens(
    [10, 10, 10],
    [17, 17, 17],
    [204, 255, 0],
    [170, 255, 0],
    [217, 70, 239],
    [51, 51, 51],
    [34, 34, 34],
);
const CYBERPUNK: ColorTokens = tokens(
    [5, 5, 16],
    [11, 11, 30],
    [0, 243, 255],
    [255, 0, 153],
    [252, 238, 10],
    [31, 31, 58],
    [21, 21, 46],
);
const RETRO: ColorTokens = tokens(
    [139, 172, 15],
    [155, 188, 15],
    [15, 56, 15],
    [48, 98, 48],
    [15, 56, 15],
    [48, 98, 48],
    [139, 172, 15],
);
const FUTURISTIC: ColorTokens = tokens(
    [0, 18, 32],
    [0, 30, 54],
    [224, 242, 254],
    [125, 211, 252],
    [0, 225, 255],
    [0, 74, 124],
    [0, 43, 77],
);
const HISTORICAL: ColorTokens = tokens(
    [245, 230, 211],
    [232, 220, 197],
    [74, 59, 42],
    [139, 90, 43],
    [139, 69, 19],
    [212, 197, 169],
    [212, 197, 169],
);
const NATURE: ColorTokens = tokens(
    [240, 253, 244],
    [255, 255, 255],
    [20, 83, 45],
    [74, 222, 128],
    [22, 163, 74],
    [187, 247, 208],
    [220, 252, 231],
);
const OCEAN: ColorTokens = tokens(
    [236, 254, 255],
    [255, 255, 255],
    [22, 78, 99],
    [6, 182, 212],
    [8, 145, 178],
    [207, 250, 254],
    [224, 242, 254],
);
const SUNSET: ColorTokens = tokens(
    [255, 241, 242],
    [255, 255, 255],
    [136, 19, 55],
    [251, 113, 133],
    [219, 39, 119],
    [254, 205, 211],
    [255, 228, 230],
);

/// Resolve a theme id to its color tokens.
pub fn resolve(id: ThemeId) -> ColorTokens {
    match id {
        ThemeId::Light => LIGHT,
        ThemeId::Dark => DARK,
        ThemeId::Amoled => AMOLED,
        ThemeId::Acidic => ACIDIC,
        ThemeId::Cyberpunk => CYBERPUNK,
        ThemeId::Retro => RETRO,
        ThemeId::Futuristic => FUTURISTIC,
        ThemeId::Historical => HISTORICAL,
        ThemeId::Nature => NATURE,
        ThemeId::Ocean => OCEAN,
        ThemeId::Sunset => SUNSET,
    }
}

/// Relative luminance approximation in `[0, 1]`.
pub(crate) fn luminance(c: Rgb) -> f64 {
    (0.2126 * f64::from(c.r) + 0.7152 * f64::from(c.g) + 0.0722 * f64::from(c.b)) / 255.0
}

#[cfg(test)]
#[path = "../../tests/unit/theme/tokens.rs"]
mod tests;

use std::collections::{BTreeMap, HashMap};

use crate::assets::decode::{PreparedImage, decode_image, encode_png};
use crate::assets::fonts::FontFace;
use crate::foundation::error::{ExportError, ExportResult};
use crate::model::payload::Profile;
use crate::scene::model::{ImageRef, SceneDescription};

/// Every image a scene references, decoded before any rendering starts.
#[derive(Clone, Debug, Default)]
pub struct AssetStore {
    images: BTreeMap<ImageRef, PreparedImage>,
    png: BTreeMap<ImageRef, Vec<u8>>,
}

impl AssetStore {
    /// Store with no images.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode the profile images `scene` needs.
    ///
    /// A referenced image with no bytes, or bytes that fail to decode, fails the whole capture.
    #[tracing::instrument(level = "debug", skip_all, fields(refs = scene.image_refs().len()))]
    pub fn prepare(profile: &Profile, scene: &SceneDescription) -> ExportResult<Self> {
        let mut store = Self::default();
        for r in scene.image_refs() {
            let bytes = match r {
                ImageRef::Avatar => profile.avatar.as_deref(),
                ImageRef::Cover => profile.cover.as_deref(),
            }
            .filter(|b| !b.is_empty())
            .ok_or_else(|| ExportError::capture(format!("{r:?} image is referenced but missing")))?;

            let img = decode_image(bytes)?;
            let png = encode_png(img.width, img.height, img.to_straight_rgba8())?;
            tracing::debug!(image = ?r, width = img.width, height = img.height, "image prepared");
            store.images.insert(r, img);
            store.png.insert(r, png);
        }
        Ok(store)
    }

    /// Decoded pixels.
    pub fn image(&self, r: ImageRef) -> Option<&PreparedImage> {
        self.images.get(&r)
    }

    /// Normalized PNG bytes, for embedding.
    pub fn png(&self, r: ImageRef) -> Option<&[u8]> {
        self.png.get(&r).map(Vec::as_slice)
    }
}

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Stateful helper for building Parley layouts from discovered font faces.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<usvg::fontdb::ID, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, face: &FontFace) -> ExportResult<String> {
        if let Some(name) = self.families.get(&face.id) {
            return Ok(name.clone());
        }
        let registered = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes.as_ref().clone()), None);
        let family_id = registered
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ExportError::capture("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ExportError::capture("registered font family has no name"))?
            .to_string();
        self.families.insert(face.id, name.clone());
        Ok(name)
    }

    /// Shape one line of text without wrapping; templates wrap before rendering.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
        letter_spacing: f32,
        brush: TextBrushRgba8,
    ) -> ExportResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ExportError::validation("text size must be finite and > 0"));
        }
        let family = self.family_for(face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(letter_spacing));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());
        Ok(layout)
    }
}

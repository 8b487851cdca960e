use std::io::Cursor;
use std::sync::Arc;

use crate::foundation::error::{ExportError, ExportResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Straight-alpha copy, for encoders that expect it.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.rgba8_premul.as_ref().clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

/// Decode any format the `image` crate recognizes.
///
/// A failure here happens before anything is rasterized, so it surfaces as a capture error.
pub fn decode_image(bytes: &[u8]) -> ExportResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ExportError::capture(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::capture("decoded image has zero area"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Encode straight-alpha RGBA8 as PNG.
pub fn encode_png(width: u32, height: u32, rgba8: Vec<u8>) -> ExportResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba8)
        .ok_or_else(|| ExportError::encode("png buffer does not match dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ExportError::encode(format!("png encode: {e}")))?;
    Ok(buf)
}

/// Static capture entry point.
pub mod capture;
/// PDF backend.
#[cfg(feature = "pdf")]
pub mod pdf;
/// Fitted preview and capture target over one scene.
pub mod preview;
/// Raster backend.
pub mod raster;
/// SVG serializer shared by every backend.
pub mod svg;

/// Image decoding and PNG encoding.
pub mod decode;
/// System and user font discovery.
pub mod fonts;
/// Prepared images and text layout.
pub mod store;

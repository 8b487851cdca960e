/// Per-style backdrops and particle overlays.
pub mod background;
/// Time sources for the frame loop.
pub mod clock;
/// Easing curves.
pub mod ease;
/// Frame loop driving an encoder.
pub mod engine;
/// Pure per-frame composition.
pub mod frame;
/// Rasterizer for composed frames.
pub mod painter;
/// Staged reveal schedule.
pub mod timeline;

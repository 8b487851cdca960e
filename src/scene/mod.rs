/// Template records and the builder that turns a payload into a scene.
pub mod build;
/// Renderer-agnostic scene description.
pub mod model;
/// Per-template layout parameters.
pub mod templates;
/// Line breaking estimates and display formatting.
pub mod text;

/// Frame/canvas primitives shared by every stage.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Numeric helpers and the seeded PRNG.
pub mod math;

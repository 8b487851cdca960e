/// Theme table and color token formatting.
pub mod tokens;

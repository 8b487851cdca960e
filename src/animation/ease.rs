const BACK_C1: f64 = 1.70158;
const BACK_C3: f64 = BACK_C1 + 1.0;

/// `1 - 2^(-10x)`, exactly 1 at the end.
pub fn ease_out_expo(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    if x == 1.0 {
        1.0
    } else {
        1.0 - 2f64.powf(-10.0 * x)
    }
}

/// Overshooting entry: peaks near 1.1 before settling at 1.
pub fn ease_out_back(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    let u = x - 1.0;
    1.0 + BACK_C3 * u.powi(3) + BACK_C1 * u.powi(2)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;

use super::*;

#[test]
fn endpoints_are_stable() {
    assert_eq!(ease_out_expo(0.0), 0.0);
    assert_eq!(ease_out_expo(1.0), 1.0);
    assert!(ease_out_back(0.0).abs() < 1e-12);
    assert_eq!(ease_out_back(1.0), 1.0);
}

#[test]
fn out_expo_rises_monotonically() {
    let samples: Vec<f64> = (0..=20).map(|i| ease_out_expo(f64::from(i) / 20.0)).collect();
    assert!(samples.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn out_expo_is_exact_at_one() {
    assert_eq!(ease_out_expo(1.0), 1.0);
    assert!((ease_out_expo(0.5) - (1.0 - 2f64.powi(-5))).abs() < 1e-12);
}

#[test]
fn out_back_overshoots() {
    let peak = (1..100)
        .map(|i| ease_out_back(f64::from(i) / 100.0))
        .fold(0.0, f64::max);
    assert!(peak > 1.05 && peak < 1.15, "{peak}");
}

#[test]
fn inputs_are_clamped() {
    assert_eq!(ease_out_back(2.0), 1.0);
    assert_eq!(ease_out_expo(-1.0), 0.0);
}

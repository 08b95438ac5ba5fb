/// Decimal rounding shared by every reported figure.
///
/// `f64::round` rounds half away from zero, which keeps score and alpha
/// values stable across platforms. All rounded outputs (raw score at 4
/// decimals, alpha and return at 2) must go through this helper so the
/// reported fields never disagree on tie-breaking.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

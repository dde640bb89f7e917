use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Rounds `value` to `digits` significant digits.
pub fn to_precision(value: f32, digits: i32) -> f32 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }

    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits - 1 - magnitude);
    ((value as f64 * factor).round() / factor) as f32
}

/// Formats `value` with `digits` significant digits, keeping trailing
/// zeros ("90.0" becomes "90.00" at four digits, not "90").
pub fn format_precision(value: f32, digits: i32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = if value == 0.0 {
        0
    } else {
        value.abs().log10().floor() as i32
    };
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    format!("{:.*}", decimals, to_precision(value, digits))
}

/// Deterministic placeholder confidence in (0, 100] derived from a node id.
pub fn stable_confidence(id: &str) -> f32 {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let fraction = (hash & 0xffff_ffff) as f64 / u32::MAX as f64;
    ((fraction * 100.0).ceil() as f32).clamp(1.0, 100.0)
}

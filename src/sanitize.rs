//! Float hygiene for everything that leaves the engine.
//!
//! Report floats are rounded to two decimals. Anything not finite becomes
//! `None` and serializes as JSON `null`.

pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= 1e15 {
        return value;
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Round to two decimals, dropping non-finite values.
pub fn metric(value: f64) -> Option<f64> {
    value.is_finite().then(|| round2(value))
}

/// `count / total * 100` rounded; `empty` is returned when `total` is zero.
pub fn percentage(count: usize, total: usize, empty: f64) -> f64 {
    if total == 0 {
        return empty;
    }
    round2(count as f64 / total as f64 * 100.0)
}

//! Relative deviation between a published and an unpublished price
//!
//! deviation = 100 - min(a, b) / max(a, b) * 100

/// Percentage deviation between two observed values.
///
/// Symmetric and non-negative. Returns 0.0 when the values are equal or when
/// the ratio cannot be formed (zero or non-finite inputs).
pub fn deviation(a: f64, b: f64) -> f64 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };

    if !low.is_finite() || !high.is_finite() || high <= 0.0 {
        return 0.0;
    }

    let pct = 100.0 - low / high * 100.0;
    pct.max(0.0)
}

/// Deviation over a `[published, unpublished]` price pair.
///
/// Anything shorter than a pair has nothing to compare and yields 0.0.
pub fn deviation_of(values: &[f64]) -> f64 {
    match values {
        [a, b, ..] => deviation(*a, *b),
        _ => 0.0,
    }
}

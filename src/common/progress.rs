/// Percentage of `loaded` over `total`, rounded half up and clamped to 100.
///
/// A zero `total` yields 0 since there is nothing to measure against.
pub fn percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }

    let loaded = loaded.min(total) as u128;
    let total = total as u128;

    ((loaded * 200 + total) / (total * 2)) as u8
}

/// Rounds a server supplied percentage into `0..=100`.
pub(crate) fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= 100.0 {
        100
    } else {
        value.round() as u8
    }
}

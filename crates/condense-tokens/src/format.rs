//! Human-readable token figures for reports.

/// Format a token count as a compact string.
///
/// Counts of a thousand or more are rounded to one decimal in `K` or `M`,
/// dropping a trailing `.0`. A count that rounds up to a full thousand of
/// one unit moves to the next: `999_999` is `"1M"`, not `"1000K"`.
pub fn format_tokens(n: u64) -> String {
    if n < 1_000 {
        return n.to_string();
    }
    let mut tenths = rounded_tenths(n, 1_000);
    let mut suffix = 'K';
    if tenths >= 10_000 {
        tenths = rounded_tenths(n, 1_000_000);
        suffix = 'M';
    }
    if tenths % 10 == 0 {
        format!("{}{suffix}", tenths / 10)
    } else {
        format!("{}.{}{suffix}", tenths / 10, tenths % 10)
    }
}

/// `n / unit` in tenths, rounded half up.
fn rounded_tenths(n: u64, unit: u64) -> u128 {
    let unit = u128::from(unit);
    (u128::from(n) * 10 + unit / 2) / unit
}

/// Percentage of tokens removed, `0.0` when `original` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compression_ratio(original: u64, optimized: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - optimized as f64 / original as f64) * 100.0
}

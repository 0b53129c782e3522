//! Progress arithmetic shared by the pipeline and the display layer

const MEGABYTE: f64 = 1024.0 * 1024.0;

/// Integer percentage `floor(done * 100 / total)`, clamped to 100
///
/// An unknown or empty total reports 0.
#[must_use]
pub fn percentage(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = u128::from(done) * 100 / u128::from(total);
    u8::try_from(pct.min(100)).unwrap_or(100)
}

/// Human-readable byte count, e.g. `12.50 MB`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / MEGABYTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_total() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(500, 0), 0);
    }

    #[test]
    fn test_floor() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 66);
        assert_eq!(percentage(3, 3), 100);
    }

    #[test]
    fn test_overshoot_clamped() {
        assert_eq!(percentage(150, 100), 100);
        assert_eq!(percentage(u64::MAX, 1), 100);
    }

    #[test]
    fn test_megabytes() {
        assert_eq!(format_megabytes(0), "0.00 MB");
        assert_eq!(format_megabytes(1024 * 1024 * 5 / 2), "2.50 MB");
    }
}

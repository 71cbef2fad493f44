/// Format a millisecond age as a compact single-unit duration.
///
/// Truncates toward zero within each unit and treats negative input (clock
/// skew between the helper and this process) as its absolute value.
pub fn to_duration(ms: i64) -> String {
    let secs = ms.unsigned_abs() / 1000;
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds() {
        assert_eq!(to_duration(12800), "12s");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(to_duration(1290000), "21m");
    }

    #[test]
    fn test_hours() {
        assert_eq!(to_duration(31680000), "8h");
    }

    #[test]
    fn test_days() {
        assert_eq!(to_duration(267840000), "3d");
    }

    #[test]
    fn test_negative_is_absolute() {
        assert_eq!(to_duration(-1290000), "21m");
    }

    #[test]
    fn test_zero() {
        assert_eq!(to_duration(0), "0s");
    }

    #[test]
    fn test_unit_boundaries() {
        assert_eq!(to_duration(59_999), "59s");
        assert_eq!(to_duration(60_000), "1m");
        assert_eq!(to_duration(3_600_000), "1h");
        assert_eq!(to_duration(86_400_000), "1d");
    }
}

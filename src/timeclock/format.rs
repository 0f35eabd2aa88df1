use thiserror::Error;

const MINUTES_IN_HOUR: u64 = 60;
const MINUTES_IN_DAY: u64 = 24 * MINUTES_IN_HOUR;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("minute count must be non-negative, got {0}")]
    InvalidArgument(i64),

    #[error("malformed elapsed time string: {0:?}")]
    Malformed(String),
}

/// Formats a count of minutes as `DD:HH:MM`. Every part is padded to 2 digits, days are allowed to
/// grow wider for large inputs.
pub fn format_minutes(minutes: i64) -> Result<String, FormatError> {
    u64::try_from(minutes)
        .map(format_elapsed)
        .map_err(|_| FormatError::InvalidArgument(minutes))
}

/// Same as [format_minutes] for a counter that can't be negative in the first place.
pub fn format_elapsed(minutes: u64) -> String {
    let days = minutes / MINUTES_IN_DAY;
    let remainder = minutes % MINUTES_IN_DAY;
    let hours = remainder / MINUTES_IN_HOUR;
    let minutes = remainder % MINUTES_IN_HOUR;

    format!("{days:02}:{hours:02}:{minutes:02}")
}

/// Inverse of [format_minutes]. Only strings that [format_minutes] could have produced are
/// accepted.
pub fn parse_minutes(value: &str) -> Result<u64, FormatError> {
    let malformed = || FormatError::Malformed(value.to_string());

    let mut parts = value.split(':');
    let (Some(days), Some(hours), Some(minutes), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    let days = parse_part(days, None).ok_or_else(malformed)?;
    let hours = parse_part(hours, Some(24)).ok_or_else(malformed)?;
    let minutes = parse_part(minutes, Some(60)).ok_or_else(malformed)?;

    days.checked_mul(MINUTES_IN_DAY)
        .and_then(|v| v.checked_add(hours * MINUTES_IN_HOUR + minutes))
        .ok_or_else(malformed)
}

fn parse_part(part: &str, below: Option<u64>) -> Option<u64> {
    if part.len() < 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Hours and minutes are always exactly 2 digits, days only get wider without padding.
    match below {
        Some(_) if part.len() != 2 => return None,
        None if part.len() > 2 && part.starts_with('0') => return None,
        _ => {}
    }
    let value = part.parse::<u64>().ok()?;
    match below {
        Some(limit) if value >= limit => None,
        _ => Some(value),
    }
}

#[cfg(test)]
mod format_tests {
    use super::{format_elapsed, format_minutes, parse_minutes, FormatError};

    fn matches_display_shape(value: &str) -> bool {
        let parts = value.split(':').collect::<Vec<_>>();
        parts.len() == 3
            && parts[0].len() >= 2
            && parts[1].len() == 2
            && parts[2].len() == 2
            && parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit()))
    }

    #[test]
    fn test_format_known_values() {
        assert_eq!(format_minutes(0).unwrap(), "00:00:00");
        assert_eq!(format_minutes(90).unwrap(), "00:01:30");
        assert_eq!(format_minutes(1440).unwrap(), "01:00:00");
        assert_eq!(format_minutes(1500).unwrap(), "01:01:00");
        assert_eq!(format_minutes(1439).unwrap(), "00:23:59");
    }

    #[test]
    fn test_format_negative_is_rejected() {
        assert_eq!(format_minutes(-1), Err(FormatError::InvalidArgument(-1)));
        assert!(format_minutes(i64::MIN).is_err());
    }

    #[test]
    fn test_format_days_grow_past_two_digits() {
        assert_eq!(format_minutes(100 * 1440 + 61).unwrap(), "100:01:01");
        assert_eq!(format_minutes(1_000_000 * 1440).unwrap(), "1000000:00:00");
        assert_eq!(format_elapsed(u64::MAX), "12810238940076077:12:15");
    }

    #[test]
    fn test_format_parse_back() {
        let samples = (0..3000)
            .chain([1440 * 99, 1440 * 99 + 1439, 1440 * 12345 + 17, i64::MAX]);
        for minutes in samples {
            let formatted = format_minutes(minutes).unwrap();
            assert!(matches_display_shape(&formatted), "{minutes} -> {formatted}");
            assert_eq!(parse_minutes(&formatted).unwrap(), minutes as u64, "{formatted}");
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for value in [
            "", "00:00", "00:00:00:00", "0:00:00", "00:0:00", "00:00:000", "00:24:00",
            "00:00:60", "000:00:00", "aa:00:00", "-1:00:00", "00:+1:00",
        ] {
            assert!(
                matches!(parse_minutes(value), Err(FormatError::Malformed(_))),
                "{value:?} should not parse"
            );
        }
    }
}

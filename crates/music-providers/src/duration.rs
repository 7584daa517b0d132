//! Normalization of upstream durations into `m:ss`.

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;

/// Formats a duration given in milliseconds.
pub fn format_millis(millis: u64) -> String {
    format_seconds(millis / 1000)
}

/// Formats an ISO-8601 interval such as `PT4M13S`. The leading `PT` is
/// optional, a missing component counts as zero and hours or days are folded
/// into the minutes. Returns `None` if the value has no usable component or
/// carries months, which have no fixed length.
pub fn format_iso8601(value: &str) -> Option<String> {
    let value = value.trim();
    let (value, mut in_time) = match value.strip_prefix('P') {
        Some(value) => (value, false),
        // Bare `4M13S` has no date part.
        None => (value, true),
    };

    let mut seconds = 0u64;
    let mut digits = String::new();
    let mut components = 0;

    for c in value.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let unit = match c {
            'T' if digits.is_empty() => {
                in_time = true;
                continue;
            }
            'W' => SECONDS_PER_WEEK,
            'D' => SECONDS_PER_DAY,
            'H' => SECONDS_PER_HOUR,
            'M' if in_time => SECONDS_PER_MINUTE,
            'S' => 1,
            _ => return None,
        };

        let amount = digits.parse::<u64>().ok()?;
        seconds = seconds.checked_add(amount.checked_mul(unit)?)?;
        digits.clear();
        components += 1;
    }

    if !digits.is_empty() || components == 0 {
        return None;
    }

    Some(format_seconds(seconds))
}

fn format_seconds(seconds: u64) -> String {
    format!(
        "{}:{:02}",
        seconds / SECONDS_PER_MINUTE,
        seconds % SECONDS_PER_MINUTE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis() {
        assert_eq!("4:13", format_millis(253000));
        assert_eq!("4:13", format_millis(253999));
        assert_eq!("0:00", format_millis(0));
        assert_eq!("0:07", format_millis(7500));
        assert_eq!("75:00", format_millis(4_500_000));
    }

    #[test]
    fn test_format_iso8601() {
        assert_eq!(Some("4:13".to_string()), format_iso8601("PT4M13S"));
        assert_eq!(Some("4:13".to_string()), format_iso8601("4M13S"));
        assert_eq!(Some("0:45".to_string()), format_iso8601("45S"));
        assert_eq!(Some("0:45".to_string()), format_iso8601("PT45S"));
        assert_eq!(Some("3:00".to_string()), format_iso8601("PT3M"));
        assert_eq!(Some("0:00".to_string()), format_iso8601("PT0S"));
    }

    #[test]
    fn test_hours_and_days_fold_into_minutes() {
        assert_eq!(Some("62:05".to_string()), format_iso8601("PT1H2M5S"));
        assert_eq!(Some("1440:00".to_string()), format_iso8601("P1D"));
        assert_eq!(Some("1441:01".to_string()), format_iso8601("P1DT1M1S"));
    }

    #[test]
    fn test_months_are_rejected() {
        assert_eq!(None, format_iso8601("P1M"));
        assert_eq!(None, format_iso8601("P1MT4M13S"));
        assert_eq!(Some("1:00".to_string()), format_iso8601("PT1M"));
        assert_eq!(Some("1:00".to_string()), format_iso8601("1M"));
    }

    #[test]
    fn test_malformed_intervals() {
        for value in ["", "PT", "P", "4:13", "PTXM", "PT4M13", "PT4.5S"] {
            assert_eq!(None, format_iso8601(value), "{}", value);
        }
    }
}

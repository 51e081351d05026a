/// Formats whole seconds as `MM:SS`, or `H:MM:SS` once an hour is reached.
pub fn format_display(remaining_secs: u32) -> String {
    let h = remaining_secs / 3600;
    let m = (remaining_secs % 3600) / 60;
    let s = remaining_secs % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_short_clock(s: &str) -> bool {
        let parts: Vec<&str> = s.split(':').collect();
        parts.len() == 2
            && !parts[0].is_empty()
            && parts[0].chars().all(|c| c.is_ascii_digit())
            && parts[1].len() == 2
            && parts[1].chars().all(|c| c.is_ascii_digit())
    }

    fn is_long_clock(s: &str) -> bool {
        match s.split_once(':') {
            Some((h, rest)) => {
                !h.is_empty() && h.chars().all(|c| c.is_ascii_digit()) && is_short_clock(rest) && rest.len() == 5
            }
            None => false,
        }
    }

    #[test]
    fn formats_zero_seconds() {
        assert_eq!(format_display(0), "00:00");
    }

    #[test]
    fn formats_seconds_only() {
        assert_eq!(format_display(5), "00:05");
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_display(125), "02:05");
        assert_eq!(format_display(60), "01:00");
    }

    #[test]
    fn includes_unpadded_hours_when_long() {
        assert_eq!(format_display(3661), "1:01:01");
        assert_eq!(format_display(7200), "2:00:00");
        assert_eq!(format_display(36_000), "10:00:00");
    }

    #[test]
    fn hour_segment_appears_exactly_at_3600() {
        for secs in (0..3600).step_by(7).chain([3599]) {
            assert!(is_short_clock(&format_display(secs)), "{secs}");
        }
        for secs in [3600, 3601, 5399, 86_399, 359_999, u32::MAX] {
            assert!(is_long_clock(&format_display(secs)), "{secs}");
        }
    }
}

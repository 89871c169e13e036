//! Timecode parsing and formatting.
//!
//! Scene boundaries are edited as time-of-day-style strings and converted
//! to seconds for all numeric work. Parsing is lenient: an unrecognized
//! shape or a non-numeric component contributes zero rather than failing,
//! so a half-edited timestamp never breaks preview or export.

/// Parse a permissive time string into seconds.
///
/// Accepts `HH:MM:SS`, `MM:SS`, or `SS`. The final component may carry a
/// fractional part, which is preserved. Any other shape yields `0.0`.
pub fn parse_to_seconds(text: &str) -> f64 {
    let parts: Vec<&str> = text.split(':').collect();
    match parts.as_slice() {
        [h, m, s] => component(h) * 3600.0 + component(m) * 60.0 + component(s),
        [m, s] => component(m) * 60.0 + component(s),
        [s] => component(s),
        _ => 0.0,
    }
}

fn component(part: &str) -> f64 {
    part.trim().parse::<f64>().unwrap_or(0.0)
}

/// Format seconds as a display timestamp: `HH:MM:SS`, truncating to whole
/// seconds. Used for defaults and display only; subtitle export goes
/// through [`to_subtitle_timestamp`].
pub fn format_seconds(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Canonicalize a permissive time string into an SRT timestamp:
/// `HH:MM:SS,mmm`.
///
/// Missing hour/minute components are left-padded with `00`, every
/// component is zero-padded to two digits, and milliseconds are appended
/// (or normalized to exactly three digits when a fractional part is
/// present).
pub fn to_subtitle_timestamp(text: &str) -> String {
    let mut parts: Vec<&str> = text.split(':').collect();
    while parts.len() < 3 {
        parts.insert(0, "00");
    }
    parts.truncate(3);

    let hours = pad_two(parts[0]);
    let minutes = pad_two(parts[1]);
    let (seconds, millis) = match parts[2].split_once('.') {
        Some((whole, frac)) => (pad_two(whole), pad_millis(frac)),
        None => (pad_two(parts[2]), "000".to_string()),
    };

    format!("{hours}:{minutes}:{seconds},{millis}")
}

fn pad_two(part: &str) -> String {
    format!("{part:0>2}")
}

fn pad_millis(frac: &str) -> String {
    let mut millis: String = frac.chars().take(3).collect();
    while millis.len() < 3 {
        millis.push('0');
    }
    millis
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_all_three_shapes() {
        assert_eq!(parse_to_seconds("01:02:03"), 3723.0);
        assert_eq!(parse_to_seconds("02:03"), 123.0);
        assert_eq!(parse_to_seconds("45"), 45.0);
    }

    #[test]
    fn preserves_fractional_seconds() {
        assert!((parse_to_seconds("00:01:02.5") - 62.5).abs() < 1e-9);
        assert!((parse_to_seconds("2.25") - 2.25).abs() < 1e-9);
    }

    #[test]
    fn malformed_input_falls_back_to_zero() {
        assert_eq!(parse_to_seconds(""), 0.0);
        assert_eq!(parse_to_seconds("1:2:3:4"), 0.0);
        assert_eq!(parse_to_seconds("abc"), 0.0);
        // A single bad component does not poison the rest.
        assert_eq!(parse_to_seconds("01:xx:30"), 3630.0);
    }

    #[test]
    fn formats_display_timestamps() {
        assert_eq!(format_seconds(0.0), "00:00:00");
        assert_eq!(format_seconds(90.0), "00:01:30");
        assert_eq!(format_seconds(3661.9), "01:01:01");
    }

    #[test]
    fn subtitle_timestamp_pads_missing_components() {
        assert_eq!(to_subtitle_timestamp("1:2"), "00:01:02,000");
        assert_eq!(to_subtitle_timestamp("5"), "00:00:05,000");
        assert_eq!(to_subtitle_timestamp("00:01:02"), "00:01:02,000");
    }

    #[test]
    fn subtitle_timestamp_normalizes_millis() {
        assert_eq!(to_subtitle_timestamp("00:01:02.500"), "00:01:02,500");
        assert_eq!(to_subtitle_timestamp("00:01:02.5"), "00:01:02,500");
        assert_eq!(to_subtitle_timestamp("00:01:02.12345"), "00:01:02,123");
    }

    proptest! {
        #[test]
        fn format_then_parse_roundtrips_whole_seconds(s in 0u64..=359_999) {
            let formatted = format_seconds(s as f64);
            prop_assert_eq!(parse_to_seconds(&formatted), s as f64);
        }

        #[test]
        fn parse_truncates_to_floor_of_fraction(s in 0u64..=359_999, frac in 0u32..1000) {
            let with_frac = s as f64 + frac as f64 / 1000.0;
            let formatted = format_seconds(with_frac);
            prop_assert_eq!(parse_to_seconds(&formatted), (with_frac.floor()));
        }
    }
}

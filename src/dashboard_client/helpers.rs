use chrono::DateTime;

const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Human-readable elapsed time, starting at the largest non-zero unit.
///
/// `0` renders as `"0s"`.
pub fn format_elapsed(seconds: u64) -> String {
    let days = seconds / SECONDS_PER_DAY;
    let hours = (seconds - days * SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (seconds - days * SECONDS_PER_DAY - hours * SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = seconds - days * SECONDS_PER_DAY - hours * SECONDS_PER_HOUR - minutes * SECONDS_PER_MINUTE;

    if days > 0 {
        format!("{days} days, {hours}h, {minutes}min, {secs}s")
    } else if hours > 0 {
        format!("{hours}h, {minutes}min, {secs}s")
    } else if minutes > 0 {
        format!("{minutes}min, {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Renders a unix timestamp (seconds) as an RFC 1123 UTC string.
pub fn format_utc(unix_seconds: f64) -> String {
    let whole = unix_seconds.floor();
    let nanos = ((unix_seconds - whole) * 1e9) as u32;
    match DateTime::from_timestamp(whole as i64, nanos) {
        Some(datetime) => datetime.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        None => unix_seconds.to_string(),
    }
}

/// Shortens a URL or path to its last segment: `.../<segment>`.
pub fn readable_url(url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or(url);
    format!(".../{last}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(text: &str) -> u64 {
        text.split(", ")
            .map(|part| {
                let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
                let value: u64 = digits.parse().unwrap();
                let unit = part[digits.len()..].trim();
                match unit {
                    "days" => value * SECONDS_PER_DAY,
                    "h" => value * SECONDS_PER_HOUR,
                    "min" => value * SECONDS_PER_MINUTE,
                    "s" => value,
                    other => panic!("unexpected unit {other:?}"),
                }
            })
            .sum()
    }

    #[test]
    fn elapsed_starts_at_largest_unit() {
        assert_eq!(format_elapsed(5), "5s");
        assert_eq!(format_elapsed(60), "1min, 0s");
        assert_eq!(format_elapsed(3_725), "1h, 2min, 5s");
        assert_eq!(format_elapsed(90_061), "1 days, 1h, 1min, 1s");
        assert_eq!(format_elapsed(86_400), "1 days, 0h, 0min, 0s");
    }

    #[test]
    fn elapsed_zero() {
        assert_eq!(format_elapsed(0), "0s");
    }

    #[test]
    fn elapsed_components_add_back_up() {
        for seconds in [1, 59, 61, 3_599, 3_600, 86_399, 86_401, 1_000_000, 31_536_000] {
            assert_eq!(reconstruct(&format_elapsed(seconds)), seconds, "{seconds}");
        }
    }

    #[test]
    fn utc_display_truncates_fractions() {
        assert_eq!(format_utc(0.0), "Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(format_utc(1_600_000_000.9), "Sun, 13 Sep 2020 12:26:40 GMT");
    }

    #[test]
    fn readable_url_keeps_last_segment() {
        assert_eq!(readable_url("/data/results/run_01.db"), ".../run_01.db");
        assert_eq!(readable_url("plain.db"), ".../plain.db");
    }
}

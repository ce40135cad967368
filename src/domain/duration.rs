//! Normalizes the duration shapes the upstream APIs hand back
//! (milliseconds from iTunes, seconds from Invidious, ISO-8601 strings from
//! the YouTube Data API) into one display format.

use regex::Regex;
use std::sync::LazyLock;

/// Sentinel for a duration we could not determine.
pub const UNKNOWN: &str = "N/A";

static ISO8601: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("invalid ISO-8601 duration pattern")
});

/// Formats a millisecond count as `M:SS`. Missing or zero input degrades to
/// the `"N/A"` sentinel, never an error.
pub fn format_millis(millis: Option<u64>) -> String {
    match millis {
        Some(ms) if ms > 0 => render(0, ms / 1000 / 60, ms / 1000 % 60),
        _ => UNKNOWN.to_string(),
    }
}

/// Formats a second count as `M:SS`. Missing or zero input degrades to the
/// `"N/A"` sentinel.
pub fn format_seconds(seconds: Option<u64>) -> String {
    match seconds {
        Some(secs) if secs > 0 => render(0, secs / 60, secs % 60),
        _ => UNKNOWN.to_string(),
    }
}

/// Parses an ISO-8601 duration (`PT4M13S` -> `4:13`, `PT1H2M3S` -> `1:02:03`).
/// Absent groups default to 0; anything that does not match degrades to the
/// `"N/A"` sentinel.
pub fn parse_iso8601(duration: &str) -> String {
    let Some(caps) = ISO8601.captures(duration) else {
        return UNKNOWN.to_string();
    };

    let group = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    render(group(1), group(2), group(3))
}

fn render(hours: u64, minutes: u64, seconds: u64) -> String {
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

//! Heuristic artist extraction from combined title strings
//! ("Artist - Song", "Artist: Song", "Song by Artist (Remix)").
//! Video sources report a single title field, so this is the best signal
//! available for seeding artist-based searches.

use regex::Regex;
use std::sync::LazyLock;

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^([^-]+)\s*-",    // "Artist - Song"
        r"^([^:]+)\s*:",    // "Artist: Song"
        r"(?i)by\s+([^(]+)", // "Song by Artist"
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid artist pattern"))
    .collect()
});

/// Tries each pattern in priority order and returns the first capture,
/// trimmed. Returns an empty string when nothing matches; callers must
/// treat that as "unknown artist".
pub fn extract_artist(title: &str) -> String {
    for pattern in PATTERNS.iter() {
        if let Some(caps) = pattern.captures(title) {
            if let Some(m) = caps.get(1) {
                return m.as_str().trim().to_string();
            }
        }
    }

    String::new()
}

/// Derives a search query from a title: the extracted artist when one is
/// found, otherwise the first hyphen-delimited segment of the title.
pub fn search_seed(title: &str) -> String {
    let artist = extract_artist(title);
    if !artist.is_empty() {
        return artist;
    }

    title
        .split('-')
        .next()
        .unwrap_or(title)
        .trim()
        .to_string()
}

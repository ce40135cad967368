use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical record for one playable/streamable item, regardless of which
/// upstream API produced it. Adapters construct these once; resolvers only
/// concatenate and truncate lists, never mutate individual records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Source-namespaced id, e.g. `itunes-123456` or `youtube-dQw4w9WgXcQ`.
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Display duration (`M:SS` or `H:MM:SS`), or `"N/A"` when unknown.
    pub duration: String,
    pub thumbnail: String,
    pub source: TrackSource,
    /// Direct audio URL for preview-capable sources (iTunes), otherwise a
    /// navigable watch/embed page URL. Video sources never carry a raw
    /// media stream here.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<u32>,
}

/// Provenance tag. Determines which playback path is legal downstream:
/// only itunes-sourced tracks may carry a directly playable audio URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackSource {
    Itunes,
    Youtube,
    Soundcloud,
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrackSource::Itunes => "itunes",
            TrackSource::Youtube => "youtube",
            TrackSource::Soundcloud => "soundcloud",
        };
        f.write_str(s)
    }
}

impl FromStr for TrackSource {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "itunes" => Ok(TrackSource::Itunes),
            "youtube" => Ok(TrackSource::Youtube),
            "soundcloud" => Ok(TrackSource::Soundcloud),
            other => Err(UnknownSource(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown source tag: {0}")]
pub struct UnknownSource(pub String);

impl Track {
    /// Strips the source namespace from the id, returning the upstream
    /// identifier (e.g. the bare YouTube video id).
    pub fn raw_id(id: &str) -> &str {
        id.strip_prefix("itunes-")
            .or_else(|| id.strip_prefix("youtube-"))
            .or_else(|| id.strip_prefix("soundcloud-"))
            .unwrap_or(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track() -> Track {
        Track {
            id: "itunes-42".to_string(),
            title: "One More Time".to_string(),
            artist: "Daft Punk".to_string(),
            duration: "5:20".to_string(),
            thumbnail: "https://example.com/art300x300.jpg".to_string(),
            source: TrackSource::Itunes,
            url: "https://audio.example.com/preview.m4a".to_string(),
            album: Some("Discovery".to_string()),
            genre: None,
            release_year: Some(2001),
        }
    }

    #[test]
    fn test_track_serializes_camel_case_and_skips_absent_optionals() {
        let json = serde_json::to_value(sample_track()).unwrap();

        assert_eq!(json["id"], "itunes-42");
        assert_eq!(json["source"], "itunes");
        assert_eq!(json["releaseYear"], 2001);
        assert!(json.get("genre").is_none());
    }

    #[test]
    fn test_source_round_trip() {
        for tag in ["itunes", "youtube", "soundcloud"] {
            let source: TrackSource = tag.parse().unwrap();
            assert_eq!(source.to_string(), tag);
        }

        assert!("spotify".parse::<TrackSource>().is_err());
    }

    #[test]
    fn test_raw_id_strips_namespace() {
        assert_eq!(Track::raw_id("youtube-dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(Track::raw_id("itunes-123"), "123");
        assert_eq!(Track::raw_id("dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }
}

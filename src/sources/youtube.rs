//! YouTube Data API v3 adapter. Credentialed; search results come back
//! without durations, so a second batched `videos?part=contentDetails`
//! call resolves them and the lists are merged by video id.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::duration;
use crate::domain::track::{Track, TrackSource};
use crate::sources::{MusicSource, SourceError};

const NAME: &str = "YouTube";
const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";
const MUSIC_CATEGORY: &str = "10";
const RESULT_LIMIT: u32 = 10;

pub struct YoutubeSource {
    agent: ureq::Agent,
    api_key: String,
}

impl YoutubeSource {
    pub fn new(agent: ureq::Agent, api_key: String) -> Self {
        Self { agent, api_key }
    }

    fn search_request(&self, params: &[(&str, &str)]) -> Result<Vec<Track>, SourceError> {
        let mut request = self
            .agent
            .get(SEARCH_URL)
            .query("part", "snippet")
            .query("type", "video")
            .query("videoCategoryId", MUSIC_CATEGORY)
            .query("maxResults", &RESULT_LIMIT.to_string())
            .query("key", &self.api_key);
        for (name, value) in params {
            request = request.query(name, value);
        }

        let payload: SearchPayload = request
            .call()
            .map_err(|e| SourceError::unavailable(NAME, e))?
            .into_json()
            .map_err(|e| SourceError::payload(NAME, e))?;

        let ids: Vec<String> = payload
            .items
            .iter()
            .filter_map(|item| item.id.video_id.clone())
            .collect();

        Ok(map_results(payload, &self.fetch_durations(&ids)))
    }

    /// Batch-resolves durations for the given video ids. A failure here
    /// degrades every duration to the sentinel instead of failing the
    /// search that already succeeded.
    fn fetch_durations(&self, ids: &[String]) -> HashMap<String, String> {
        if ids.is_empty() {
            return HashMap::new();
        }

        let result: Result<DetailsPayload, SourceError> = self
            .agent
            .get(VIDEOS_URL)
            .query("part", "contentDetails")
            .query("id", &ids.join(","))
            .query("key", &self.api_key)
            .call()
            .map_err(|e| SourceError::unavailable(NAME, e))
            .and_then(|resp| resp.into_json().map_err(|e| SourceError::payload(NAME, e)));

        match result {
            Ok(payload) => duration_map(payload),
            Err(e) => {
                log::warn!("YouTube duration lookup failed: {e}");
                HashMap::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: VideoRef,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
    #[serde(rename = "channelTitle")]
    channel_title: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct DetailsPayload {
    #[serde(default)]
    items: Vec<DetailsItem>,
}

#[derive(Debug, Deserialize)]
struct DetailsItem {
    id: String,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

fn duration_map(payload: DetailsPayload) -> HashMap<String, String> {
    payload
        .items
        .into_iter()
        .map(|item| (item.id, duration::parse_iso8601(&item.content_details.duration)))
        .collect()
}

/// Merges search items with the duration map by video id; an id without a
/// duration entry maps to the sentinel. Items missing a video id, title or
/// channel are dropped.
fn map_results(payload: SearchPayload, durations: &HashMap<String, String>) -> Vec<Track> {
    payload
        .items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            let title = item.snippet.title?;
            let artist = item.snippet.channel_title?;

            let thumbnail = item
                .snippet
                .thumbnails
                .medium
                .or(item.snippet.thumbnails.default)
                .map(|t| t.url)
                .unwrap_or_default();

            Some(Track {
                id: format!("youtube-{video_id}"),
                title,
                artist,
                duration: durations
                    .get(&video_id)
                    .cloned()
                    .unwrap_or_else(|| duration::UNKNOWN.to_string()),
                thumbnail,
                source: TrackSource::Youtube,
                url: format!("https://www.youtube.com/watch?v={video_id}"),
                album: None,
                genre: None,
                release_year: None,
            })
        })
        .collect()
}

impl MusicSource for YoutubeSource {
    fn name(&self) -> &str {
        NAME
    }

    fn search(&self, query: &str) -> Result<Vec<Track>, SourceError> {
        // Biases results toward actual music uploads.
        let query = format!("{query} official audio");
        let tracks = self.search_request(&[("q", query.as_str())])?;
        log::debug!("YouTube: {} usable results", tracks.len());
        Ok(tracks)
    }

    fn related_to(&self, id: &str) -> Result<Vec<Track>, SourceError> {
        self.search_request(&[("relatedToVideoId", id)])
    }
}

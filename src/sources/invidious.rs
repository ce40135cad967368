//! Invidious adapter. One value per mirror instance; the instance list is
//! plain configuration because community mirrors rotate and die. Exposes
//! both free-text search and related-video lookup without any credential.

use serde::Deserialize;

use crate::domain::duration;
use crate::domain::track::{Track, TrackSource};
use crate::sources::{MusicSource, SourceError};

const RESULT_LIMIT: usize = 10;

pub struct InvidiousSource {
    agent: ureq::Agent,
    base_url: String,
}

impl InvidiousSource {
    pub fn new(agent: ureq::Agent, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { agent, base_url }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvidiousVideo {
    video_id: Option<String>,
    title: Option<String>,
    author: Option<String>,
    length_seconds: Option<u64>,
    #[serde(default)]
    video_thumbnails: Vec<InvidiousThumbnail>,
}

#[derive(Debug, Deserialize)]
struct InvidiousThumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoPage {
    #[serde(default)]
    recommended_videos: Vec<InvidiousVideo>,
}

/// Maps upstream videos into Tracks, truncating to the result limit.
/// Videos missing an id, title or author are dropped.
fn map_videos(videos: Vec<InvidiousVideo>) -> Vec<Track> {
    videos
        .into_iter()
        .filter_map(|video| {
            let video_id = video.video_id?;
            let title = video.title?;
            let artist = video.author?;

            // Mirrors serve several thumbnail sizes; index 2 is the medium
            // one. Fall back to the stable img.youtube.com URL.
            let thumbnail = video
                .video_thumbnails
                .get(2)
                .map(|t| t.url.clone())
                .unwrap_or_else(|| {
                    format!("https://img.youtube.com/vi/{video_id}/mqdefault.jpg")
                });

            Some(Track {
                id: format!("youtube-{video_id}"),
                title,
                artist,
                duration: duration::format_seconds(video.length_seconds),
                thumbnail,
                source: TrackSource::Youtube,
                url: format!("https://www.youtube.com/watch?v={video_id}"),
                album: None,
                genre: None,
                release_year: None,
            })
        })
        .take(RESULT_LIMIT)
        .collect()
}

impl MusicSource for InvidiousSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn search(&self, query: &str) -> Result<Vec<Track>, SourceError> {
        let url = format!("{}/api/v1/search", self.base_url);

        let videos: Vec<InvidiousVideo> = self
            .agent
            .get(&url)
            .query("q", query)
            .query("type", "video")
            .query("sort_by", "relevance")
            .set("Accept", "application/json")
            .call()
            .map_err(|e| SourceError::unavailable(&self.base_url, e))?
            .into_json()
            .map_err(|e| SourceError::payload(&self.base_url, e))?;

        Ok(map_videos(videos))
    }

    fn related_to(&self, id: &str) -> Result<Vec<Track>, SourceError> {
        let url = format!("{}/api/v1/videos/{id}", self.base_url);

        let page: VideoPage = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| SourceError::unavailable(&self.base_url, e))?
            .into_json()
            .map_err(|e| SourceError::payload(&self.base_url, e))?;

        Ok(map_videos(page.recommended_videos))
    }
}

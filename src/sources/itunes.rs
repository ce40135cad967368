//! iTunes Search API adapter. Unauthenticated; the only source in the set
//! that yields a directly playable audio URL (the 30-second preview).

use serde::Deserialize;

use crate::domain::duration;
use crate::domain::track::{Track, TrackSource};
use crate::sources::{MusicSource, SourceError};

const NAME: &str = "iTunes";
const SEARCH_URL: &str = "https://itunes.apple.com/search";
const RESULT_LIMIT: u32 = 20;

pub struct ItunesSource {
    agent: ureq::Agent,
}

impl ItunesSource {
    pub fn new(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    results: Vec<ItunesItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItunesItem {
    track_id: Option<u64>,
    track_name: Option<String>,
    artist_name: Option<String>,
    collection_name: Option<String>,
    track_time_millis: Option<u64>,
    artwork_url100: Option<String>,
    preview_url: Option<String>,
    release_date: Option<String>,
    primary_genre_name: Option<String>,
}

/// Maps upstream items into Tracks. Items lacking a preview URL, a title or
/// an artist are dropped silently: a Track without a playable URL or a
/// required field must never reach the resolver.
fn map_results(payload: SearchPayload) -> Vec<Track> {
    payload
        .results
        .into_iter()
        .filter_map(|item| {
            let preview_url = item.preview_url?;
            let track_id = item.track_id?;
            let title = item.track_name?;
            let artist = item.artist_name?;

            Some(Track {
                id: format!("itunes-{track_id}"),
                title,
                artist,
                duration: duration::format_millis(item.track_time_millis),
                thumbnail: item
                    .artwork_url100
                    .map(|url| url.replace("100x100", "300x300"))
                    .unwrap_or_default(),
                source: TrackSource::Itunes,
                url: preview_url,
                album: item.collection_name,
                genre: item.primary_genre_name,
                release_year: release_year(item.release_date.as_deref()),
            })
        })
        .collect()
}

/// `releaseDate` comes back as an ISO timestamp; only the year is kept.
fn release_year(release_date: Option<&str>) -> Option<u32> {
    release_date?.split('-').next()?.parse().ok()
}

impl MusicSource for ItunesSource {
    fn name(&self) -> &str {
        NAME
    }

    fn search(&self, query: &str) -> Result<Vec<Track>, SourceError> {
        let response = self
            .agent
            .get(SEARCH_URL)
            .query("term", query)
            .query("media", "music")
            .query("entity", "song")
            .query("limit", &RESULT_LIMIT.to_string())
            .set("Accept", "application/json")
            .call()
            .map_err(|e| SourceError::unavailable(NAME, e))?;

        let payload: SearchPayload = response
            .into_json()
            .map_err(|e| SourceError::payload(NAME, e))?;

        let tracks = map_results(payload);
        log::debug!("iTunes: {} usable results", tracks.len());
        Ok(tracks)
    }
}

//! Orchestrates the source adapters: an ordered fallback cascade over the
//! video sources (credentialed YouTube first, then each Invidious mirror)
//! plus the always-free iTunes branch, concatenated in fixed type priority.

use serde::Serialize;
use thiserror::Error;

use crate::config::SourcesConfig;
use crate::domain::artist;
use crate::domain::track::Track;
use crate::sources::{self, InvidiousSource, ItunesSource, MusicSource, SourceError, YoutubeSource};

use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Every configured adapter/instance failed or returned no results.
    /// Boundary endpoints surface this as an empty list plus an advisory,
    /// never as a hard failure.
    #[error("all configured sources failed or returned no results")]
    AllSourcesExhausted,
}

/// Ordered fallback across one source type: the optional credentialed
/// primary adapter is tried once, then each mirror instance in turn. The
/// first attempt with at least one result wins; failures and empty results
/// fall through. Steps run strictly sequentially.
pub struct SourceCascade {
    primary: Option<Box<dyn MusicSource>>,
    mirrors: Vec<Box<dyn MusicSource>>,
}

impl SourceCascade {
    pub fn new(primary: Option<Box<dyn MusicSource>>, mirrors: Vec<Box<dyn MusicSource>>) -> Self {
        Self { primary, mirrors }
    }

    pub fn credentialed(&self) -> bool {
        self.primary.is_some()
    }

    pub fn search(&self, query: &str) -> Result<Vec<Track>, ResolveError> {
        self.run(|source| source.search(query))
    }

    pub fn related_to(&self, id: &str) -> Result<Vec<Track>, ResolveError> {
        self.run(|source| source.related_to(id))
    }

    fn run(
        &self,
        attempt: impl Fn(&dyn MusicSource) -> Result<Vec<Track>, SourceError>,
    ) -> Result<Vec<Track>, ResolveError> {
        let sources = self.primary.iter().chain(self.mirrors.iter());

        for source in sources {
            match attempt(source.as_ref()) {
                Ok(tracks) if !tracks.is_empty() => {
                    log::debug!("{}: {} results", source.name(), tracks.len());
                    return Ok(tracks);
                }
                Ok(_) => log::debug!("{}: no results, trying next source", source.name()),
                Err(e) => log::warn!("{e}, trying next source"),
            }
        }

        Err(ResolveError::AllSourcesExhausted)
    }
}

/// Per-source result counts, reported in credentialed mode.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct SourceCounts {
    pub itunes: usize,
    pub youtube: usize,
}

/// What a search resolves to. Never an error: total exhaustion becomes an
/// empty list plus a human-readable advisory.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub tracks: Vec<Track>,
    pub counts: Option<SourceCounts>,
    pub advisory: Option<String>,
}

pub struct SearchResolver {
    itunes: Box<dyn MusicSource>,
    cascade: SourceCascade,
}

impl SearchResolver {
    pub fn new(itunes: Box<dyn MusicSource>, cascade: SourceCascade) -> Self {
        Self { itunes, cascade }
    }

    pub fn from_config(config: &SourcesConfig) -> Self {
        let agent = sources::http_agent(Duration::from_secs(config.timeout_secs));
        Self::new(
            Box::new(ItunesSource::new(agent.clone())),
            video_cascade(config, &agent),
        )
    }

    /// Resolves a free-text query against every source type. An empty or
    /// whitespace-only query short-circuits without any network call.
    pub fn search(&self, query: &str) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::default();
        }

        let itunes_tracks = match self.itunes.search(query) {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("{e}");
                Vec::new()
            }
        };

        let video_tracks = match self.cascade.search(query) {
            Ok(tracks) => tracks,
            Err(ResolveError::AllSourcesExhausted) => Vec::new(),
        };

        let counts = self.cascade.credentialed().then(|| SourceCounts {
            itunes: itunes_tracks.len(),
            youtube: video_tracks.len(),
        });

        // Fixed type priority: the preview-capable source first, then the
        // video results. No interleaving or re-ranking.
        let mut seen = HashSet::new();
        let tracks: Vec<Track> = itunes_tracks
            .into_iter()
            .chain(video_tracks)
            .filter(|track| seen.insert(track.id.clone()))
            .collect();

        let advisory = tracks
            .is_empty()
            .then(|| "No results from any source. Try a different search term.".to_string());

        SearchOutcome {
            tracks,
            counts,
            advisory,
        }
    }
}

pub struct RecommendationResolver {
    cascade: SourceCascade,
}

impl RecommendationResolver {
    pub fn new(cascade: SourceCascade) -> Self {
        Self { cascade }
    }

    pub fn from_config(config: &SourcesConfig) -> Self {
        let agent = sources::http_agent(Duration::from_secs(config.timeout_secs));
        Self::new(video_cascade(config, &agent))
    }

    /// Resolves "more like this": the id-based related lookup first, and
    /// when that yields nothing, a title-derived search seeded through the
    /// artist extractor. Returns an empty list when both paths fail.
    pub fn recommend(&self, id: Option<&str>, title: Option<&str>) -> Vec<Track> {
        if let Some(id) = id.filter(|id| !id.trim().is_empty()) {
            let raw = Track::raw_id(id);
            match self.cascade.related_to(raw) {
                Ok(tracks) => return tracks,
                Err(ResolveError::AllSourcesExhausted) => {
                    log::info!("related lookup for {raw} exhausted, trying title seed")
                }
            }
        }

        if let Some(title) = title.filter(|title| !title.trim().is_empty()) {
            let seed = artist::search_seed(title);
            match self.cascade.search(&seed) {
                Ok(tracks) => return tracks,
                Err(ResolveError::AllSourcesExhausted) => {
                    log::info!("search-based recommendations for {seed:?} exhausted")
                }
            }
        }

        Vec::new()
    }
}

/// Builds the video-source cascade from config: the YouTube Data API
/// adapter when a key is configured, then the Invidious mirror list in
/// order.
fn video_cascade(config: &SourcesConfig, agent: &ureq::Agent) -> SourceCascade {
    let primary = config
        .youtube_api_key
        .as_ref()
        .map(|key| Box::new(YoutubeSource::new(agent.clone(), key.clone())) as Box<dyn MusicSource>);

    let mirrors = config
        .invidious_instances
        .iter()
        .map(|base| Box::new(InvidiousSource::new(agent.clone(), base.clone())) as Box<dyn MusicSource>)
        .collect();

    SourceCascade::new(primary, mirrors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::track::TrackSource;
    use std::sync::{Arc, Mutex};

    /// Scripted source: pops one response per call and records invocations.
    /// Cloning shares the script, so tests can keep a handle for inspection
    /// after boxing one clone into a cascade.
    #[derive(Clone)]
    struct StubSource {
        inner: Arc<StubInner>,
    }

    struct StubInner {
        name: String,
        responses: Mutex<Vec<Result<Vec<Track>, ()>>>,
        calls: Mutex<Vec<String>>,
    }

    impl StubSource {
        fn new(name: &str, responses: Vec<Result<Vec<Track>, ()>>) -> Self {
            Self {
                inner: Arc::new(StubInner {
                    name: name.to_string(),
                    responses: Mutex::new(responses),
                    calls: Mutex::new(Vec::new()),
                }),
            }
        }

        fn answer(&self, call: String) -> Result<Vec<Track>, SourceError> {
            self.inner.calls.lock().unwrap().push(call);
            let mut responses = self.inner.responses.lock().unwrap();
            if responses.is_empty() {
                panic!("{}: unexpected extra call", self.inner.name);
            }
            responses
                .remove(0)
                .map_err(|_| SourceError::unavailable(&self.inner.name, "stubbed failure"))
        }

        fn calls(&self) -> Vec<String> {
            self.inner.calls.lock().unwrap().clone()
        }
    }

    impl MusicSource for StubSource {
        fn name(&self) -> &str {
            &self.inner.name
        }

        fn search(&self, query: &str) -> Result<Vec<Track>, SourceError> {
            self.answer(format!("search:{query}"))
        }

        fn related_to(&self, id: &str) -> Result<Vec<Track>, SourceError> {
            self.answer(format!("related:{id}"))
        }
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("title {id}"),
            artist: "artist".to_string(),
            duration: "3:00".to_string(),
            thumbnail: String::new(),
            source: TrackSource::Youtube,
            url: format!("https://www.youtube.com/watch?v={id}"),
            album: None,
            genre: None,
            release_year: None,
        }
    }

    fn boxed(source: StubSource) -> Box<dyn MusicSource> {
        Box::new(source)
    }

    // --------------------------------------------------
    // Cascade
    // --------------------------------------------------

    #[test]
    fn test_cascade_short_circuits_on_first_success() {
        let cascade = SourceCascade::new(
            None,
            vec![
                boxed(StubSource::new("m1", vec![Err(())])),
                boxed(StubSource::new("m2", vec![Err(())])),
                boxed(StubSource::new("m3", vec![Ok(vec![track("youtube-a")])])),
                boxed(StubSource::new("m4", vec![])), // must never be called
            ],
        );

        let tracks = cascade.search("q").unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "youtube-a");
    }

    #[test]
    fn test_cascade_empty_result_falls_through() {
        let cascade = SourceCascade::new(
            None,
            vec![
                boxed(StubSource::new("m1", vec![Ok(vec![])])),
                boxed(StubSource::new("m2", vec![Ok(vec![track("youtube-b")])])),
            ],
        );

        let tracks = cascade.search("q").unwrap();
        assert_eq!(tracks[0].id, "youtube-b");
    }

    #[test]
    fn test_cascade_exhaustion() {
        let cascade = SourceCascade::new(
            None,
            vec![
                boxed(StubSource::new("m1", vec![Err(())])),
                boxed(StubSource::new("m2", vec![Ok(vec![])])),
            ],
        );

        assert!(matches!(
            cascade.search("q"),
            Err(ResolveError::AllSourcesExhausted)
        ));
    }

    #[test]
    fn test_failing_primary_falls_through_to_mirrors() {
        let cascade = SourceCascade::new(
            Some(boxed(StubSource::new("primary", vec![Err(())]))),
            vec![boxed(StubSource::new(
                "m1",
                vec![Ok(vec![track("youtube-c")])],
            ))],
        );

        let tracks = cascade.search("q").unwrap();
        assert_eq!(tracks[0].id, "youtube-c");
    }

    // --------------------------------------------------
    // Search resolver
    // --------------------------------------------------

    #[test]
    fn test_blank_query_short_circuits_without_calls() {
        let itunes = StubSource::new("itunes", vec![]);
        let mirror = StubSource::new("m1", vec![]);
        let resolver = SearchResolver::new(boxed(itunes), SourceCascade::new(None, vec![boxed(mirror)]));

        for query in ["", "   ", "\t\n"] {
            let outcome = resolver.search(query);
            assert!(outcome.tracks.is_empty());
            assert!(outcome.advisory.is_none());
        }
        // StubSource panics on any unexpected call, so reaching this point
        // proves no network attempt was made.
    }

    #[test]
    fn test_search_concatenates_itunes_first() {
        let itunes = StubSource::new("itunes", vec![Ok(vec![track("itunes-1")])]);
        let mirror = StubSource::new("m1", vec![Ok(vec![track("youtube-1")])]);
        let resolver =
            SearchResolver::new(boxed(itunes), SourceCascade::new(None, vec![boxed(mirror)]));

        let outcome = resolver.search("daft punk");
        let ids: Vec<_> = outcome.tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["itunes-1", "youtube-1"]);
        assert!(outcome.counts.is_none()); // uncredentialed mode
        assert!(outcome.advisory.is_none());
    }

    #[test]
    fn test_search_counts_reported_in_credentialed_mode() {
        let itunes = StubSource::new("itunes", vec![Ok(vec![track("itunes-1"), track("itunes-2")])]);
        let primary = StubSource::new("yt", vec![Ok(vec![track("youtube-1")])]);
        let resolver = SearchResolver::new(
            boxed(itunes),
            SourceCascade::new(Some(boxed(primary)), vec![]),
        );

        let outcome = resolver.search("q");
        assert_eq!(
            outcome.counts,
            Some(SourceCounts {
                itunes: 2,
                youtube: 1
            })
        );
    }

    #[test]
    fn test_search_survives_itunes_failure() {
        let itunes = StubSource::new("itunes", vec![Err(())]);
        let mirror = StubSource::new("m1", vec![Ok(vec![track("youtube-1")])]);
        let resolver =
            SearchResolver::new(boxed(itunes), SourceCascade::new(None, vec![boxed(mirror)]));

        let outcome = resolver.search("q");
        assert_eq!(outcome.tracks.len(), 1);
        assert!(outcome.advisory.is_none());
    }

    #[test]
    fn test_search_total_exhaustion_is_empty_with_advisory() {
        let itunes = StubSource::new("itunes", vec![Err(())]);
        let mirror = StubSource::new("m1", vec![Err(())]);
        let resolver =
            SearchResolver::new(boxed(itunes), SourceCascade::new(None, vec![boxed(mirror)]));

        let outcome = resolver.search("q");
        assert!(outcome.tracks.is_empty());
        assert!(outcome.advisory.is_some());
    }

    #[test]
    fn test_search_deduplicates_by_id() {
        let itunes = StubSource::new("itunes", vec![Ok(vec![track("dup")])]);
        let mirror = StubSource::new("m1", vec![Ok(vec![track("dup"), track("youtube-2")])]);
        let resolver =
            SearchResolver::new(boxed(itunes), SourceCascade::new(None, vec![boxed(mirror)]));

        let ids: Vec<_> = resolver
            .search("q")
            .tracks
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["dup", "youtube-2"]);
    }

    // --------------------------------------------------
    // Recommendation resolver
    // --------------------------------------------------

    #[test]
    fn test_recommend_by_id_strips_namespace() {
        let mirror = StubSource::new("m1", vec![Ok(vec![track("youtube-r1")])]);
        let resolver =
            RecommendationResolver::new(SourceCascade::new(None, vec![boxed(mirror.clone())]));

        let tracks = resolver.recommend(Some("youtube-abc"), None);
        assert_eq!(tracks.len(), 1);
        assert_eq!(mirror.calls(), vec!["related:abc"]);
    }

    #[test]
    fn test_recommend_falls_back_to_title_seed() {
        // Id path exhausted (related fails), then the title-derived search
        // must be issued before reporting failure.
        let mirror = StubSource::new("m1", vec![Err(()), Ok(vec![track("youtube-r2")])]);
        let resolver =
            RecommendationResolver::new(SourceCascade::new(None, vec![boxed(mirror.clone())]));

        let tracks = resolver.recommend(Some("abc"), Some("Daft Punk - One More Time"));
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "youtube-r2");
        assert_eq!(mirror.calls(), vec!["related:abc", "search:Daft Punk"]);
    }

    #[test]
    fn test_recommend_title_seed_uses_extracted_artist() {
        let mirror = StubSource::new("m1", vec![Ok(vec![track("youtube-r3")])]);
        let resolver =
            RecommendationResolver::new(SourceCascade::new(None, vec![boxed(mirror.clone())]));

        let tracks = resolver.recommend(None, Some("Daft Punk - One More Time"));
        assert_eq!(tracks.len(), 1);
        assert_eq!(mirror.calls(), vec!["search:Daft Punk"]);
    }

    #[test]
    fn test_recommend_without_id_and_title_is_empty() {
        let mirror = StubSource::new("m1", vec![]);
        let resolver = RecommendationResolver::new(SourceCascade::new(None, vec![boxed(mirror)]));

        assert!(resolver.recommend(None, None).is_empty());
        assert!(resolver.recommend(Some("  "), Some("")).is_empty());
    }

    #[test]
    fn test_recommend_all_paths_exhausted_is_empty() {
        let mirror = StubSource::new("m1", vec![Err(()), Err(())]);
        let resolver = RecommendationResolver::new(SourceCascade::new(None, vec![boxed(mirror)]));

        let tracks = resolver.recommend(Some("abc"), Some("Some - Title"));
        assert!(tracks.is_empty());
    }
}

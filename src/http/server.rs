use log::info;
use rouille::{Request, Response};
use serde::Serialize;

use crate::{
    config::HttpConfig,
    domain::track::{Track, TrackSource},
    http::error::ApiError,
    resolver::{RecommendationResolver, SearchResolver, SourceCounts},
};

pub struct HttpServer {
    search: SearchResolver,
    recommendations: RecommendationResolver,
    pub config: HttpConfig,
}

impl HttpServer {
    pub fn new(
        search: SearchResolver,
        recommendations: RecommendationResolver,
        config: HttpConfig,
    ) -> Self {
        Self {
            search,
            recommendations,
            config,
        }
    }

    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }

    fn handle_request(&self, request: &Request) -> Response {
        info!("{} {}", request.method(), request.url());

        let response = rouille::router!(request,
            (GET) (/api/search) => {
                self.handle_search(request)
            },

            (GET) (/api/recommendations) => {
                self.handle_recommendations(request)
            },

            (GET) (/api/stream) => {
                Self::handle_stream(request)
            },

            _ => Response::empty_404()
        );

        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    /// No-results is success: an empty/missing query or total source
    /// exhaustion both answer 200 with an empty track list.
    fn handle_search(&self, request: &Request) -> Response {
        let query = request.get_param("q").unwrap_or_default();
        let outcome = self.search.search(&query);

        Response::json(&SearchResponse {
            tracks: outcome.tracks,
            sources: outcome.counts,
            error: outcome.advisory,
        })
    }

    fn handle_recommendations(&self, request: &Request) -> Response {
        let id = request.get_param("id");
        let title = request.get_param("title");

        let recommendations = self
            .recommendations
            .recommend(id.as_deref(), title.as_deref());

        Response::json(&RecommendationsResponse { recommendations })
    }

    fn handle_stream(request: &Request) -> Response {
        match resolve_stream_request(request) {
            Ok(urls) => Response::json(&urls),
            Err(e) => e.into_response(),
        }
    }
}

fn resolve_stream_request(request: &Request) -> Result<StreamResponse, ApiError> {
    let id = request
        .get_param("id")
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::MissingParameter("missing id parameter".into()))?;

    let source = request
        .get_param("source")
        .ok_or_else(|| ApiError::MissingParameter("missing source parameter".into()))?
        .parse::<TrackSource>()
        .map_err(|e| ApiError::MissingParameter(e.to_string()))?;

    resolve_stream(&id, source, request.get_param("preview_url").as_deref())
}

/// Maps (id, source, preview hint) to the playable/embeddable URL set for
/// that source. Video sources only ever get page/embed URLs; there is no
/// audio-extraction step in this design.
pub fn resolve_stream(
    id: &str,
    source: TrackSource,
    preview_url: Option<&str>,
) -> Result<StreamResponse, ApiError> {
    let raw = Track::raw_id(id);

    match source {
        TrackSource::Itunes => {
            let preview = preview_url
                .filter(|url| !url.trim().is_empty())
                .ok_or_else(|| {
                    ApiError::MissingParameter("missing preview_url for itunes source".into())
                })?;

            Ok(StreamResponse {
                stream_url: preview.to_string(),
                embed_url: None,
                direct_url: None,
            })
        }

        TrackSource::Youtube => Ok(StreamResponse {
            stream_url: format!("https://www.youtube.com/embed/{raw}?autoplay=1&enablejsapi=1"),
            embed_url: Some(format!("https://www.youtube.com/embed/{raw}")),
            direct_url: Some(format!("https://www.youtube.com/watch?v={raw}")),
        }),

        TrackSource::Soundcloud => Ok(StreamResponse {
            stream_url: format!("https://soundcloud.com/track/{raw}"),
            embed_url: None,
            direct_url: None,
        }),
    }
}

#[derive(Serialize)]
struct SearchResponse {
    tracks: Vec<Track>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<SourceCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct RecommendationsResponse {
    recommendations: Vec<Track>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamResponse {
    pub stream_url: String,
    pub embed_url: Option<String>,
    pub direct_url: Option<String>,
}

#[cfg(test)]
pub fn parse_json_response(response: rouille::Response) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::from_reader(
        response.data.into_reader_and_size().0,
    )?)
}

//! Adapters wrapping the external music metadata APIs. Each adapter issues
//! bounded-time HTTP requests and maps the API's native JSON shape into
//! canonical [`Track`] records, preserving the upstream relevance order.

use std::fmt::Display;
use std::time::Duration;

use thiserror::Error;

use crate::domain::track::Track;

pub mod invidious;
pub mod itunes;
pub mod youtube;

pub use invidious::InvidiousSource;
pub use itunes::ItunesSource;
pub use youtube::YoutubeSource;

/// One external API, producing canonical Tracks. Implementations are shared
/// across server threads, so they hold no mutable state.
pub trait MusicSource: Send + Sync {
    /// Short display name used in logs and error messages.
    fn name(&self) -> &str;

    /// Free-text search. An empty result list is not an error.
    fn search(&self, query: &str) -> Result<Vec<Track>, SourceError>;

    /// "More like this id" lookup. Sources without related-item support
    /// keep this default, which reports no results and lets the caller
    /// fall through its cascade.
    fn related_to(&self, _id: &str) -> Result<Vec<Track>, SourceError> {
        Ok(Vec::new())
    }
}

/// Failure of a single adapter/instance. Always recoverable: the resolvers
/// convert it into cascade fallthrough, never surface it raw.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{source_name} is unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },

    #[error("{source_name} returned a malformed payload: {reason}")]
    Payload { source_name: String, reason: String },
}

impl SourceError {
    pub fn unavailable(source: &str, reason: impl Display) -> Self {
        SourceError::Unavailable {
            source_name: source.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn payload(source: &str, reason: impl Display) -> Self {
        SourceError::Payload {
            source_name: source.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Agent shared by all adapters: every request carries the configured
/// timeout, so a hung mirror is indistinguishable from a dead one.
pub fn http_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(timeout).build()
}

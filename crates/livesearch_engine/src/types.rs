use std::fmt;

use livesearch_core::{Story, Subject};
use thiserror::Error;

/// Derived pair identifying one logical search request.
///
/// A new key is produced whenever the subject changes or a new debounced
/// query arrives, combining with the other half's latest value.
/// Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchKey {
    pub subject: Subject,
    pub query: String,
}

impl FetchKey {
    pub fn new(subject: Subject, query: impl Into<String>) -> Self {
        Self {
            subject,
            query: query.into(),
        }
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?query={}", self.subject.path_segment(), self.query)
    }
}

/// Reasons a fetch can fail. Failures never cross the pipeline boundary
/// as panics; they surface as [`PipelineEvent::FetchFailed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed body: {0}")]
    MalformedBody(String),
}

/// Events the pipeline delivers back to its owner via
/// [`PipelineHandle::try_recv`](crate::PipelineHandle::try_recv).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A query survived the quiet period and the empty filter.
    QueryDebounced { query: String },
    /// The fetch for `key` completed and `key` is still the latest.
    StoriesLoaded { key: FetchKey, stories: Vec<Story> },
    /// The fetch for `key` failed; the previous stories stay valid.
    FetchFailed { key: FetchKey, error: FetchError },
}

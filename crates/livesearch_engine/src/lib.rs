//! Livesearch engine: the asynchronous fetch pipeline behind a channel handle.
mod fetch;
mod pipeline;
mod types;

pub use fetch::{FetchSettings, ReqwestFetcher, StoryFetcher, DEFAULT_ENDPOINT_BASE};
pub use pipeline::{PipelineCommands, PipelineHandle};
pub use types::{FetchError, FetchKey, PipelineEvent};

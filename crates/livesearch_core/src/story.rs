use serde::Deserialize;

/// One search result, deserialized straight from the remote response.
///
/// The index reports comments and stories with different field names:
/// a comment hit carries `story_title`/`story_url` for its parent story
/// instead of `title`/`url`. [`Story::display_title`] and
/// [`Story::link`] resolve the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Story {
    /// Unique identifier assigned by the index.
    #[serde(rename = "objectID")]
    pub object_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub story_title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub story_url: Option<String>,
}

impl Story {
    /// Title to display: `title`, falling back to `story_title`.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.story_title.as_deref())
    }

    /// Link target: `url`, falling back to `story_url`.
    pub fn link(&self) -> Option<&str> {
        self.url.as_deref().or(self.story_url.as_deref())
    }
}

use std::fmt;

/// Sort subject for a search: the remote index exposes one endpoint per
/// subject, so each variant maps to a fixed path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subject {
    /// Rank results by relevance (the index's default ordering).
    #[default]
    Relevance,
    /// Rank results by submission date, newest first.
    ByDate,
}

impl Subject {
    /// Endpoint path segment for this subject.
    pub fn path_segment(self) -> &'static str {
        match self {
            Subject::Relevance => "search",
            Subject::ByDate => "search_by_date",
        }
    }

    /// All selectable subjects, in display order.
    pub fn all() -> [Subject; 2] {
        [Subject::Relevance, Subject::ByDate]
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

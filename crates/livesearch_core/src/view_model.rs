use crate::{Story, Subject};

/// The complete, immutable render input for one presentation cycle.
///
/// `query` always reflects the latest raw keystroke, never the debounced
/// value, so an input box shows exactly what the user typed. `stories`
/// holds the results of the most recently completed fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewSnapshot {
    pub subject: Subject,
    pub query: String,
    pub stories: Vec<Story>,
}

/// Combine-latest cell over the three view-model inputs.
///
/// Each setter replaces one input; [`snapshot`](Self::snapshot) yields
/// the full current combination. The cell never emits by itself: the
/// owner decides when a change warrants a re-render.
#[derive(Debug, Default)]
pub struct Composite {
    latest: ViewSnapshot,
}

impl Composite {
    pub fn new(subject: Subject, query: impl Into<String>) -> Self {
        Self {
            latest: ViewSnapshot {
                subject,
                query: query.into(),
                stories: Vec::new(),
            },
        }
    }

    pub fn set_subject(&mut self, subject: Subject) {
        self.latest.subject = subject;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.latest.query = query.into();
    }

    pub fn set_stories(&mut self, stories: Vec<Story>) {
        self.latest.stories = stories;
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.latest.clone()
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use livesearch_core::{Composite, StateSource, Subject, Subscription, ViewSnapshot};
use livesearch_engine::{PipelineEvent, PipelineHandle};
use search_logging::{search_debug, search_warn};

struct MountInner {
    composite: Composite,
    render: Box<dyn FnMut(&ViewSnapshot)>,
}

impl MountInner {
    fn render_now(&mut self) {
        let snapshot = self.composite.snapshot();
        (self.render)(&snapshot);
    }
}

/// Bridges the state sources and the fetch pipeline to a render loop.
///
/// The adapter subscribes once to both injected sources at mount: the
/// subscribe-time replay seeds the initial snapshot and the pipeline's
/// initial values. Every source push updates the composite, re-renders,
/// and forwards into the pipeline; [`pump`](Self::pump) applies pipeline
/// events the same way. Dropping the adapter drops the subscriptions.
pub struct SearchAdapter {
    query_source: StateSource<String>,
    subject_source: StateSource<Subject>,
    pipeline: PipelineHandle,
    inner: Rc<RefCell<MountInner>>,
    _subscriptions: Vec<Subscription>,
}

impl SearchAdapter {
    pub fn mount(
        query_source: StateSource<String>,
        subject_source: StateSource<Subject>,
        pipeline: PipelineHandle,
        render: impl FnMut(&ViewSnapshot) + 'static,
    ) -> Self {
        let inner = Rc::new(RefCell::new(MountInner {
            composite: Composite::new(subject_source.current(), query_source.current()),
            render: Box::new(render),
        }));
        let commands = pipeline.commands();

        let query_inner = inner.clone();
        let query_commands = commands.clone();
        let query_sub = query_source.subscribe(move |query: &String| {
            let mut mount = query_inner.borrow_mut();
            mount.composite.set_query(query.clone());
            mount.render_now();
            query_commands.push_query(query.clone());
        });

        let subject_inner = inner.clone();
        let subject_sub = subject_source.subscribe(move |subject: &Subject| {
            let mut mount = subject_inner.borrow_mut();
            mount.composite.set_subject(*subject);
            mount.render_now();
            commands.push_subject(*subject);
        });

        Self {
            query_source,
            subject_source,
            pipeline,
            inner,
            _subscriptions: vec![query_sub, subject_sub],
        }
    }

    /// User edited the query text.
    pub fn on_query_change(&self, text: impl Into<String>) {
        self.query_source.push(text.into());
    }

    /// User selected a sort subject.
    pub fn on_select_subject(&self, subject: Subject) {
        self.subject_source.push(subject);
    }

    /// User cleared the query box.
    pub fn on_clear(&self) {
        self.query_source.push(String::new());
    }

    /// Latest rendered snapshot.
    pub fn snapshot(&self) -> ViewSnapshot {
        self.inner.borrow().composite.snapshot()
    }

    /// Drains pending pipeline events, re-rendering when stories change.
    /// A failed fetch keeps the last good stories visible.
    pub fn pump(&self) {
        while let Some(event) = self.pipeline.try_recv() {
            match event {
                PipelineEvent::QueryDebounced { query } => {
                    search_debug!("query debounced: {query:?}");
                }
                PipelineEvent::StoriesLoaded { key, stories } => {
                    search_debug!("{} stories loaded for {}", stories.len(), key);
                    let mut mount = self.inner.borrow_mut();
                    mount.composite.set_stories(stories);
                    mount.render_now();
                }
                PipelineEvent::FetchFailed { key, error } => {
                    search_warn!("fetch failed for {}: {}", key, error);
                }
            }
        }
    }
}

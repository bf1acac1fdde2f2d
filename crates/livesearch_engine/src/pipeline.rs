use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use livesearch_core::{QueryDebouncer, Story, Subject};
use search_logging::{search_debug, search_info, search_warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::fetch::{FetchSettings, ReqwestFetcher, StoryFetcher};
use crate::types::{FetchError, FetchKey, PipelineEvent};

enum PipelineCommand {
    SetQuery(String),
    SetSubject(Subject),
}

struct FetchDone {
    generation: u64,
    key: FetchKey,
    result: Result<Vec<Story>, FetchError>,
}

/// Cloneable sender half of a [`PipelineHandle`], for wiring state-source
/// observers to the pipeline.
#[derive(Clone)]
pub struct PipelineCommands {
    cmd_tx: UnboundedSender<PipelineCommand>,
}

impl PipelineCommands {
    /// Feeds a raw query edit into the debounce stage.
    pub fn push_query(&self, query: impl Into<String>) {
        let _ = self.cmd_tx.send(PipelineCommand::SetQuery(query.into()));
    }

    /// Replaces the latest subject, recombining with the latest debounced
    /// query.
    pub fn push_subject(&self, subject: Subject) {
        let _ = self.cmd_tx.send(PipelineCommand::SetSubject(subject));
    }
}

/// Handle to the fetch pipeline running on its own runtime thread.
///
/// Commands go in over an unbounded channel; [`PipelineEvent`]s come back
/// over a std channel polled with [`try_recv`](Self::try_recv). Dropping
/// the handle (and every [`PipelineCommands`] clone) shuts the pipeline
/// down, abandoning any in-flight fetch.
pub struct PipelineHandle {
    commands: PipelineCommands,
    event_rx: mpsc::Receiver<PipelineEvent>,
}

impl PipelineHandle {
    /// Spawns the pipeline against the real search endpoint.
    pub fn new(settings: FetchSettings, debounce: Duration) -> Self {
        Self::with_fetcher(Arc::new(ReqwestFetcher::new(settings)), debounce)
    }

    /// Spawns the pipeline with a caller-supplied fetcher. This is the
    /// seam tests use to substitute the network.
    pub fn with_fetcher(fetcher: Arc<dyn StoryFetcher>, debounce: Duration) -> Self {
        let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            runtime.block_on(run_pipeline(fetcher, debounce, cmd_rx, event_tx));
        });

        Self {
            commands: PipelineCommands { cmd_tx },
            event_rx,
        }
    }

    /// Cloneable command sender for observer closures.
    pub fn commands(&self) -> PipelineCommands {
        self.commands.clone()
    }

    pub fn push_query(&self, query: impl Into<String>) {
        self.commands.push_query(query);
    }

    pub fn push_subject(&self, subject: Subject) {
        self.commands.push_subject(subject);
    }

    /// Non-blocking poll for the next pipeline event.
    pub fn try_recv(&self) -> Option<PipelineEvent> {
        self.event_rx.try_recv().ok()
    }
}

/// Pipeline event loop: debounces query edits, recombines the latest
/// subject with the latest debounced query into a [`FetchKey`], and
/// spawns one fetch task per key.
///
/// Every key carries a monotonically increasing generation. A completion
/// whose generation is older than the latest issued key is discarded, so
/// the delivered stories always belong to the newest key regardless of
/// network completion order.
async fn run_pipeline(
    fetcher: Arc<dyn StoryFetcher>,
    debounce: Duration,
    mut cmd_rx: UnboundedReceiver<PipelineCommand>,
    event_tx: mpsc::Sender<PipelineEvent>,
) {
    let mut debouncer = QueryDebouncer::new(debounce);
    let mut subject = Subject::default();
    let mut debounced_query: Option<String> = None;
    let mut generation: u64 = 0;
    let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel::<FetchDone>();

    loop {
        let deadline = debouncer.deadline();
        tokio::select! {
            command = cmd_rx.recv() => {
                let Some(command) = command else { break };
                match command {
                    PipelineCommand::SetQuery(query) => {
                        debouncer.submit(query, Instant::now());
                    }
                    PipelineCommand::SetSubject(new_subject) => {
                        subject = new_subject;
                        // Recombine with the latest debounced query, if
                        // one has ever been emitted.
                        if let Some(query) = debounced_query.clone() {
                            generation += 1;
                            spawn_fetch(
                                fetcher.clone(),
                                FetchKey::new(subject, query),
                                generation,
                                done_tx.clone(),
                            );
                        }
                    }
                }
            }
            _ = sleep_until(deadline), if deadline.is_some() => {
                if let Some(query) = debouncer.fire(Instant::now()) {
                    let _ = event_tx.send(PipelineEvent::QueryDebounced {
                        query: query.clone(),
                    });
                    debounced_query = Some(query.clone());
                    generation += 1;
                    spawn_fetch(
                        fetcher.clone(),
                        FetchKey::new(subject, query),
                        generation,
                        done_tx.clone(),
                    );
                }
            }
            Some(done) = done_rx.recv() => {
                if done.generation != generation {
                    search_debug!(
                        "dropping stale result for {} (generation {}, latest {})",
                        done.key,
                        done.generation,
                        generation
                    );
                    continue;
                }
                match done.result {
                    Ok(stories) => {
                        search_info!("fetch done {} ({} stories)", done.key, stories.len());
                        let _ = event_tx.send(PipelineEvent::StoriesLoaded {
                            key: done.key,
                            stories,
                        });
                    }
                    Err(error) => {
                        search_warn!("fetch failed {}: {}", done.key, error);
                        let _ = event_tx.send(PipelineEvent::FetchFailed {
                            key: done.key,
                            error,
                        });
                    }
                }
            }
        }
    }
}

fn spawn_fetch(
    fetcher: Arc<dyn StoryFetcher>,
    key: FetchKey,
    generation: u64,
    done_tx: UnboundedSender<FetchDone>,
) {
    search_debug!("fetch start {} (generation {})", key, generation);
    tokio::spawn(async move {
        let result = fetcher.fetch(&key).await;
        let _ = done_tx.send(FetchDone {
            generation,
            key,
            result,
        });
    });
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }
        None => std::future::pending::<()>().await,
    }
}

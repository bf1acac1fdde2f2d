use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use livesearch_app::SearchAdapter;
use livesearch_core::{StateSource, Subject, ViewSnapshot, DEBOUNCE_WINDOW};
use livesearch_engine::{FetchSettings, PipelineHandle};
use search_logging::{search_info, LogDestination};

fn main() {
    search_logging::initialize(LogDestination::File);

    let query_source = StateSource::new("react".to_string());
    let subject_source = StateSource::new(Subject::Relevance);
    let pipeline = PipelineHandle::new(FetchSettings::default(), DEBOUNCE_WINDOW);

    let adapter = SearchAdapter::mount(
        query_source.clone(),
        subject_source.clone(),
        pipeline,
        print_snapshot,
    );

    let subjects = Subject::all().map(|subject| format!("/{subject}"));
    println!(
        "livesearch: type to search; {} to sort, /clear, /quit",
        subjects.join(" or ")
    );

    // Stdin is read on its own thread so the main loop can keep pumping
    // pipeline events between keystrokes.
    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        match line_rx.try_recv() {
            Ok(line) => match line.trim() {
                "/quit" => break,
                "/search" => adapter.on_select_subject(Subject::Relevance),
                "/search_by_date" => adapter.on_select_subject(Subject::ByDate),
                "/clear" => adapter.on_clear(),
                text => adapter.on_query_change(text),
            },
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => break,
        }
        adapter.pump();
        thread::sleep(Duration::from_millis(20));
    }

    search_info!("shutting down");
}

fn print_snapshot(snapshot: &ViewSnapshot) {
    println!(
        "{}/{}?query={}",
        livesearch_engine::DEFAULT_ENDPOINT_BASE,
        snapshot.subject.path_segment(),
        snapshot.query
    );
    for story in &snapshot.stories {
        println!(
            "  [{}] {} -> {}",
            story.object_id,
            story.display_title().unwrap_or("(untitled)"),
            story.link().unwrap_or("-")
        );
    }
}

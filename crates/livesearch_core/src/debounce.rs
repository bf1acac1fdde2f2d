use std::time::{Duration, Instant};

/// Quiet period a query must survive before it is allowed to fetch.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(1000);

/// Debounce-then-filter stage for the raw query stream.
///
/// The debouncer is a plain state machine driven by an external clock:
/// callers pass `now` explicitly, which keeps it testable without
/// timers. [`submit`](Self::submit) replaces any pending value and
/// re-arms the quiet-period deadline; [`fire`](Self::fire) emits the
/// pending value once the deadline has passed. Each submitted value is
/// emitted at most once.
///
/// The empty-string filter runs after the debounce: an empty value still
/// displaces a pending non-empty value and restarts the timer, it just
/// never emits. The very first submitted value waits the full window
/// like any other (no leading-edge emission).
#[derive(Debug)]
pub struct QueryDebouncer {
    window: Duration,
    pending: Option<String>,
    deadline: Option<Instant>,
}

impl QueryDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            deadline: None,
        }
    }

    /// Accepts a new raw value, discarding any pending emission and
    /// restarting the quiet-period timer from `now`.
    pub fn submit(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some(value.into());
        self.deadline = Some(now + self.window);
    }

    /// Deadline of the pending emission, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Emits the pending value if its quiet period has elapsed by `now`.
    ///
    /// Returns `None` while the timer is still running, when nothing is
    /// pending, or when the pending value is empty (filtered after the
    /// debounce).
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        let value = self.pending.take()?;
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

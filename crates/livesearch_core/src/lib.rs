//! Livesearch core: synchronous data-flow primitives and view-model types.
mod debounce;
mod source;
mod story;
mod subject;
mod view_model;

pub use debounce::{QueryDebouncer, DEBOUNCE_WINDOW};
pub use source::{StateSource, Subscription};
pub use story::Story;
pub use subject::Subject;
pub use view_model::{Composite, ViewSnapshot};

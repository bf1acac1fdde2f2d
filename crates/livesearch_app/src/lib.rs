//! Livesearch app: presentation adapter and terminal front end.
pub mod adapter;

pub use adapter::SearchAdapter;

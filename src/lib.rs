//! Core library surface for the MovieVerse terminal app.
//!
//! The controllers are plain state machines with no I/O so they can be driven
//! by the TUI, by tests, or by other front-ends. Requests run on the fetch
//! worker and come back as events the UI applies on its own thread.
pub mod api;
pub mod config;
pub mod detail;
pub mod error;
pub mod intent;
pub mod models;
pub mod read_more;
pub mod search;
pub mod telemetry;
pub mod ui;
pub mod worker;

pub use api::OmdbClient;
pub use config::Config;
pub use detail::{DetailController, DetailView};
pub use error::{ApiError, ConfigError};
pub use models::{DetailRecord, ResultSummary};
pub use search::{SearchController, SearchView};
pub use worker::{FetchEvent, FetchJob, FetchWorker};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};

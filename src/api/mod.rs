//! HTTP access to the movie database, split across logical submodules.

mod client;
mod payload;

pub use client::{OmdbClient, TRENDING_TERM, TRENDING_YEAR};
pub use payload::{LookupOutcome, SearchOutcome};

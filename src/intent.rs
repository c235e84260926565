//! Outbound "watch" and "download" actions from the detail modal. They only
//! build a search URL for the system browser; they never touch controller
//! state.

use url::form_urlencoded::byte_serialize;

use crate::models::DetailRecord;

const STREAM_SEARCH_URL: &str = "https://www.youtube.com/results";
const DOWNLOAD_SEARCH_URL: &str = "https://www.google.com/search";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Stream,
    Download,
}

impl IntentKind {
    fn keyword(self) -> &'static str {
        match self {
            IntentKind::Stream => "full movie",
            IntentKind::Download => "download",
        }
    }

    fn endpoint(self) -> (&'static str, &'static str) {
        match self {
            IntentKind::Stream => (STREAM_SEARCH_URL, "search_query"),
            IntentKind::Download => (DOWNLOAD_SEARCH_URL, "q"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IntentKind::Stream => "Stream",
            IntentKind::Download => "Download",
        }
    }
}

/// A search-engine query ready to be opened externally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub kind: IntentKind,
    pub query: String,
    pub url: String,
}

pub fn stream_intent(record: &DetailRecord) -> Intent {
    build(IntentKind::Stream, record)
}

pub fn download_intent(record: &DetailRecord) -> Intent {
    build(IntentKind::Download, record)
}

fn build(kind: IntentKind, record: &DetailRecord) -> Intent {
    let query = [record.title(), record.year(), kind.keyword()]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let (base, param) = kind.endpoint();
    let encoded: String = byte_serialize(query.as_bytes()).collect();
    let url = format!("{base}?{param}={encoded}");

    Intent { kind, query, url }
}

use serde::{Deserialize, Deserializer};

use crate::models::{omdb_optional, DetailFields, ResultSummary};

/// Body of a search or trending response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope {
    #[serde(rename = "Response", deserialize_with = "response_flag")]
    response: bool,
    #[serde(rename = "Search", default)]
    search: Vec<ResultSummary>,
    #[serde(rename = "Error", default, deserialize_with = "omdb_optional")]
    error: Option<String>,
}

/// Body of a by-id lookup. The record fields sit next to the flag.
#[derive(Debug, Deserialize)]
pub(crate) struct LookupEnvelope {
    #[serde(rename = "Response", deserialize_with = "response_flag")]
    response: bool,
    #[serde(rename = "Error", default, deserialize_with = "omdb_optional")]
    error: Option<String>,
    #[serde(flatten)]
    fields: DetailFields,
}

/// A decoded search answer. `Rejected` carries the API's own message when it
/// sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Vec<ResultSummary>),
    Rejected(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(DetailFields),
    Rejected(Option<String>),
}

impl From<SearchEnvelope> for SearchOutcome {
    fn from(envelope: SearchEnvelope) -> Self {
        if envelope.response {
            SearchOutcome::Found(envelope.search)
        } else {
            SearchOutcome::Rejected(envelope.error)
        }
    }
}

impl From<LookupEnvelope> for LookupOutcome {
    fn from(envelope: LookupEnvelope) -> Self {
        if envelope.response {
            LookupOutcome::Found(envelope.fields)
        } else {
            LookupOutcome::Rejected(envelope.error)
        }
    }
}

/// The API spells its success flag as the strings `"True"` and `"False"`.
fn response_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().eq_ignore_ascii_case("true"))
}

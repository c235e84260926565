//! Domain models decoded from the movie database and passed throughout the
//! TUI. These types stay light-weight data holders so the controllers can
//! focus on state transitions and the UI on presentation.
//!
//! The upstream API marks every absent string field with the literal `"N/A"`.
//! Decoding normalizes that sentinel (and blank strings) to `None` so the rest
//! of the crate only ever deals with `Option`.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Sentinel the movie database uses for "no value".
pub const NOT_AVAILABLE: &str = "N/A";

/// Image shown in place of a missing poster.
pub const FALLBACK_POSTER_URL: &str =
    "https://cdn.pixabay.com/photo/2019/04/24/21/55/cinema-4153289_1280.jpg";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// A single row of a search or trending response. Immutable once received;
/// identity is `id` when present and the position in the list otherwise.
pub struct ResultSummary {
    /// External identifier (`imdbID`). Partial entries may omit it, in which
    /// case opening the detail view falls back to this summary.
    #[serde(rename = "imdbID", default, deserialize_with = "omdb_optional")]
    pub id: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    /// Poster URL, `None` when the API answered with the sentinel.
    #[serde(rename = "Poster", default, deserialize_with = "omdb_optional")]
    pub poster: Option<String>,
    /// `movie`, `series`, `episode`, ...
    #[serde(rename = "Type", default)]
    pub media_type: String,
}

impl ResultSummary {
    /// Poster to display, resolving a missing image to the fallback artwork.
    pub fn poster_url(&self) -> &str {
        self.poster.as_deref().unwrap_or(FALLBACK_POSTER_URL)
    }

    /// Whether a by-id lookup is possible for this row.
    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year.trim().is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} ({})", self.title, self.year)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
/// Fields of a by-id lookup as returned by the API. Everything is optional
/// because any of them may come back as the sentinel.
pub struct DetailFields {
    #[serde(rename = "imdbID", default, deserialize_with = "omdb_optional")]
    pub id: Option<String>,
    #[serde(rename = "Title", default, deserialize_with = "omdb_optional")]
    pub title: Option<String>,
    #[serde(rename = "Year", default, deserialize_with = "omdb_optional")]
    pub year: Option<String>,
    #[serde(rename = "Poster", default, deserialize_with = "omdb_optional")]
    pub poster: Option<String>,
    #[serde(rename = "Type", default, deserialize_with = "omdb_optional")]
    pub media_type: Option<String>,
    #[serde(rename = "Plot", default, deserialize_with = "omdb_optional")]
    pub plot: Option<String>,
    #[serde(rename = "Rated", default, deserialize_with = "omdb_optional")]
    pub rated: Option<String>,
    #[serde(rename = "Runtime", default, deserialize_with = "omdb_optional")]
    pub runtime: Option<String>,
    #[serde(rename = "Genre", default, deserialize_with = "omdb_optional")]
    pub genre: Option<String>,
    #[serde(rename = "Director", default, deserialize_with = "omdb_optional")]
    pub director: Option<String>,
    #[serde(rename = "Actors", default, deserialize_with = "omdb_optional")]
    pub actors: Option<String>,
    #[serde(rename = "imdbRating", default, deserialize_with = "omdb_optional")]
    pub imdb_rating: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Everything the detail modal shows. Always built on top of the summary the
/// user selected so the modal never renders an empty shell.
pub struct DetailRecord {
    pub summary: ResultSummary,
    pub plot: Option<String>,
    pub rated: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub rating_score: Option<String>,
}

impl DetailRecord {
    /// Treat a summary as the full record. Used for rows without an id and
    /// whenever the lookup fails.
    pub fn from_summary(summary: ResultSummary) -> Self {
        Self {
            summary,
            plot: None,
            rated: None,
            runtime: None,
            genre: None,
            director: None,
            cast: None,
            rating_score: None,
        }
    }

    /// Merge fetched fields over the originating summary. Fetched values win;
    /// anything the lookup left out is taken from `seed`.
    pub fn merged(fields: DetailFields, seed: &ResultSummary) -> Self {
        let summary = ResultSummary {
            id: fields.id.or_else(|| seed.id.clone()),
            title: fields.title.unwrap_or_else(|| seed.title.clone()),
            year: fields.year.unwrap_or_else(|| seed.year.clone()),
            poster: fields.poster.or_else(|| seed.poster.clone()),
            media_type: fields
                .media_type
                .unwrap_or_else(|| seed.media_type.clone()),
        };

        Self {
            summary,
            plot: fields.plot,
            rated: fields.rated,
            runtime: fields.runtime,
            genre: fields.genre,
            director: fields.director,
            cast: fields.actors,
            rating_score: fields.imdb_rating,
        }
    }

    pub fn title(&self) -> &str {
        &self.summary.title
    }

    pub fn year(&self) -> &str {
        &self.summary.year
    }
}

/// Decode an optional API string, mapping blanks and the sentinel to `None`.
pub(crate) fn omdb_optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| {
        let trimmed = value.trim();
        !trimmed.is_empty() && trimmed != NOT_AVAILABLE
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> ResultSummary {
        ResultSummary {
            id: Some("tt1".into()),
            title: "Dune".into(),
            year: "2021".into(),
            poster: None,
            media_type: "movie".into(),
        }
    }

    #[test]
    fn sentinel_poster_resolves_to_fallback() {
        let summary: ResultSummary = serde_json::from_str(
            r#"{"imdbID":"tt1","Title":"Dune","Year":"2021","Poster":"N/A","Type":"movie"}"#,
        )
        .unwrap();

        assert_eq!(summary.poster, None);
        assert_eq!(summary.poster_url(), FALLBACK_POSTER_URL);
        assert!(summary.has_id());
    }

    #[test]
    fn missing_id_decodes_as_none() {
        let summary: ResultSummary =
            serde_json::from_str(r#"{"Title":"Untitled","Year":"2023"}"#).unwrap();

        assert_eq!(summary.id, None);
        assert!(!summary.has_id());
        assert_eq!(summary.media_type, "");
    }

    #[test]
    fn merge_prefers_fetched_fields_and_falls_back_to_seed() {
        let mut seed = dune();
        seed.poster = Some("https://img.example/dune.jpg".into());
        let fields = DetailFields {
            title: Some("Dune: Part One".into()),
            plot: Some("A noble family becomes embroiled in a war.".into()),
            actors: Some("Timothée Chalamet, Rebecca Ferguson".into()),
            ..DetailFields::default()
        };

        let record = DetailRecord::merged(fields, &seed);

        assert_eq!(record.title(), "Dune: Part One");
        assert_eq!(record.year(), "2021");
        assert_eq!(record.summary.id.as_deref(), Some("tt1"));
        assert_eq!(
            record.summary.poster_url(),
            "https://img.example/dune.jpg"
        );
        assert_eq!(
            record.cast.as_deref(),
            Some("Timothée Chalamet, Rebecca Ferguson")
        );
        assert_eq!(record.director, None);
    }

    #[test]
    fn sentinel_detail_fields_fall_back_to_seed() {
        let fields: DetailFields = serde_json::from_str(
            r#"{"Title":"N/A","Year":"N/A","Director":"N/A","Plot":"Spice."}"#,
        )
        .unwrap();

        let record = DetailRecord::merged(fields, &dune());

        assert_eq!(record.title(), "Dune");
        assert_eq!(record.year(), "2021");
        assert_eq!(record.director, None);
        assert_eq!(record.plot.as_deref(), Some("Spice."));
    }

    #[test]
    fn display_includes_year_when_known() {
        assert_eq!(dune().to_string(), "Dune (2021)");
        let mut undated = dune();
        undated.year.clear();
        assert_eq!(undated.to_string(), "Dune");
    }
}

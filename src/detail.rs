//! Detail modal state: the expanded record for a single selected result.
//!
//! Like the search side this is a pure state machine. Every `open` bumps a
//! sequence number, and `resolve` only accepts the answer for the ticket that
//! is still pending, so closing the modal or picking another title makes any
//! in-flight lookup harmless.

use tracing::{debug, warn};

use crate::api::LookupOutcome;
use crate::error::ApiError;
use crate::models::{DetailRecord, ResultSummary};

/// Warning shown when the lookup fails without an API message.
pub const DETAIL_FAILED_MESSAGE: &str = "Failed to load details";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Closed,
    /// Lookup in flight for this summary.
    Loading(ResultSummary),
    Loaded(DetailRecord),
    /// Lookup failed; the record is the seed summary.
    LoadedWithWarning(DetailRecord, String),
}

/// A by-id lookup waiting to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    seq: u64,
    id: String,
}

impl DetailTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Drives the detail modal through `Closed`, `Loading` and `Loaded`. Opening
/// a title without an id skips the lookup and shows the summary as is.
#[derive(Debug)]
pub struct DetailController {
    view: DetailView,
    next_seq: u64,
    pending: Option<u64>,
}

impl Default for DetailController {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailController {
    pub fn new() -> Self {
        Self {
            view: DetailView::Closed,
            next_seq: 0,
            pending: None,
        }
    }

    pub fn view(&self) -> &DetailView {
        &self.view
    }

    /// True from `open` until `close`, loading included.
    pub fn is_open(&self) -> bool {
        !matches!(self.view, DetailView::Closed)
    }

    /// Record currently rendered by the modal, if any.
    pub fn record(&self) -> Option<&DetailRecord> {
        match &self.view {
            DetailView::Loaded(record) | DetailView::LoadedWithWarning(record, _) => Some(record),
            DetailView::Closed | DetailView::Loading(_) => None,
        }
    }

    /// Open the modal for `seed`. Rows without an id resolve immediately to
    /// the seed itself and need no request.
    pub fn open(&mut self, seed: ResultSummary) -> Option<DetailTicket> {
        self.next_seq += 1;

        let id = match seed.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                debug!(title = seed.title.as_str(), "opening detail without id");
                self.pending = None;
                self.view = DetailView::Loaded(DetailRecord::from_summary(seed));
                return None;
            }
        };

        self.pending = Some(self.next_seq);
        self.view = DetailView::Loading(seed);
        Some(DetailTicket {
            seq: self.next_seq,
            id,
        })
    }

    /// Apply the lookup answer for `ticket`. Returns `false` (and changes
    /// nothing) if the modal was closed or moved on since the ticket was
    /// issued.
    pub fn resolve(
        &mut self,
        ticket: &DetailTicket,
        result: Result<LookupOutcome, ApiError>,
    ) -> bool {
        if self.pending != Some(ticket.seq) {
            debug!(seq = ticket.seq, id = ticket.id.as_str(), "dropping stale detail response");
            return false;
        }
        let seed = match &self.view {
            DetailView::Loading(seed) => seed.clone(),
            _ => return false,
        };
        self.pending = None;

        self.view = match result {
            Ok(LookupOutcome::Found(fields)) => {
                DetailView::Loaded(DetailRecord::merged(fields, &seed))
            }
            Ok(LookupOutcome::Rejected(message)) => DetailView::LoadedWithWarning(
                DetailRecord::from_summary(seed),
                message.unwrap_or_else(|| DETAIL_FAILED_MESSAGE.to_string()),
            ),
            Err(err) => {
                warn!(id = ticket.id.as_str(), error = ?err, "detail request failed");
                DetailView::LoadedWithWarning(
                    DetailRecord::from_summary(seed),
                    DETAIL_FAILED_MESSAGE.to_string(),
                )
            }
        };
        true
    }

    pub fn close(&mut self) {
        self.pending = None;
        self.view = DetailView::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DetailFields;

    fn seed(id: Option<&str>) -> ResultSummary {
        ResultSummary {
            id: id.map(str::to_string),
            title: "Dune".into(),
            year: "2021".into(),
            poster: None,
            media_type: "movie".into(),
        }
    }

    fn found(plot: &str) -> Result<LookupOutcome, ApiError> {
        Ok(LookupOutcome::Found(DetailFields {
            plot: Some(plot.into()),
            ..DetailFields::default()
        }))
    }

    #[test]
    fn open_without_id_resolves_synchronously() {
        let mut controller = DetailController::new();

        assert_eq!(controller.open(seed(None)), None);
        assert_eq!(
            controller.view(),
            &DetailView::Loaded(DetailRecord::from_summary(seed(None)))
        );

        assert_eq!(controller.open(seed(Some("  "))), None);
        assert!(matches!(controller.view(), DetailView::Loaded(_)));
    }

    #[test]
    fn open_with_id_loads_then_merges() {
        let mut controller = DetailController::new();
        let ticket = controller.open(seed(Some("tt1"))).unwrap();

        assert_eq!(ticket.id(), "tt1");
        assert_eq!(controller.view(), &DetailView::Loading(seed(Some("tt1"))));

        assert!(controller.resolve(&ticket, found("Spice must flow.")));
        let record = controller.record().unwrap();
        assert_eq!(record.plot.as_deref(), Some("Spice must flow."));
        assert_eq!(record.title(), "Dune");
    }

    #[test]
    fn rejection_keeps_seed_with_api_message() {
        let mut controller = DetailController::new();
        let ticket = controller.open(seed(Some("tt1"))).unwrap();
        controller.resolve(
            &ticket,
            Ok(LookupOutcome::Rejected(Some("Incorrect IMDb ID.".into()))),
        );

        assert_eq!(
            controller.view(),
            &DetailView::LoadedWithWarning(
                DetailRecord::from_summary(seed(Some("tt1"))),
                "Incorrect IMDb ID.".into()
            )
        );
    }

    #[test]
    fn transport_failure_keeps_seed_with_generic_message() {
        let mut controller = DetailController::new();
        let ticket = controller.open(seed(Some("tt1"))).unwrap();
        let err = ApiError::Decode(serde_json::from_str::<u8>("{").unwrap_err());
        controller.resolve(&ticket, Err(err));

        match controller.view() {
            DetailView::LoadedWithWarning(record, message) => {
                assert_eq!(record.title(), "Dune");
                assert_eq!(message, DETAIL_FAILED_MESSAGE);
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn late_response_after_close_is_ignored() {
        let mut controller = DetailController::new();
        let ticket = controller.open(seed(Some("tt1"))).unwrap();
        controller.close();

        assert!(!controller.resolve(&ticket, found("late")));
        assert_eq!(controller.view(), &DetailView::Closed);
        assert!(!controller.is_open());
    }

    #[test]
    fn response_for_previous_selection_is_ignored() {
        let mut controller = DetailController::new();
        let first = controller.open(seed(Some("tt1"))).unwrap();
        let mut other = seed(Some("tt2"));
        other.title = "Arrival".into();
        let second = controller.open(other.clone()).unwrap();

        assert!(!controller.resolve(&first, found("old plot")));
        assert_eq!(controller.view(), &DetailView::Loading(other));

        assert!(controller.resolve(&second, found("new plot")));
        assert_eq!(controller.record().unwrap().title(), "Arrival");
    }

    #[test]
    fn resolved_selection_never_returns_to_loading() {
        let mut controller = DetailController::new();
        let ticket = controller.open(seed(Some("tt1"))).unwrap();
        controller.resolve(&ticket, found("plot"));

        assert!(!controller.resolve(&ticket, found("again")));
        assert!(matches!(controller.view(), DetailView::Loaded(_)));
    }

    #[test]
    fn opening_id_less_row_discards_pending_lookup() {
        let mut controller = DetailController::new();
        let ticket = controller.open(seed(Some("tt1"))).unwrap();
        controller.open(seed(None));

        assert!(!controller.resolve(&ticket, found("late")));
        assert_eq!(
            controller.record(),
            Some(&DetailRecord::from_summary(seed(None)))
        );
    }
}

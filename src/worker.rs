//! Bridge between the synchronous UI loop and the async HTTP client.
//!
//! The UI thread pushes [`FetchJob`]s into a channel; a dedicated thread
//! forwards each job into a tokio runtime as its own task and sends the answer
//! back as a [`FetchEvent`]. Jobs run concurrently, so answers can arrive in
//! any order. Ordering is the controllers' concern, via the tickets each
//! event carries.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, error};

use crate::api::{LookupOutcome, OmdbClient, SearchOutcome};
use crate::detail::DetailTicket;
use crate::error::ApiError;
use crate::search::SearchTicket;

/// Request the UI wants run off-thread.
#[derive(Debug, Clone)]
pub enum FetchJob {
    /// The fixed catalog slice, asked for once at startup.
    Trending,
    Search(SearchTicket),
    Detail(DetailTicket),
}

/// Finished request, paired with the ticket it was issued for so the owning
/// controller can tell whether it is still wanted.
#[derive(Debug)]
pub enum FetchEvent {
    Trending(Result<SearchOutcome, ApiError>),
    Search {
        ticket: SearchTicket,
        result: Result<SearchOutcome, ApiError>,
    },
    Detail {
        ticket: DetailTicket,
        result: Result<LookupOutcome, ApiError>,
    },
}

/// Handle owned by the UI. Dropping it stops the worker thread once the
/// remaining jobs have been handed to the runtime.
#[derive(Debug)]
pub struct FetchWorker {
    jobs: Sender<FetchJob>,
    events: Receiver<FetchEvent>,
}

impl FetchWorker {
    pub fn spawn(client: OmdbClient) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("movieverse-http")
            .enable_all()
            .build()
            .context("failed to build fetch runtime")?;

        let (job_tx, job_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        thread::Builder::new()
            .name("movieverse-fetch".into())
            .spawn(move || run(runtime, client, job_rx, event_tx))
            .context("failed to spawn fetch worker")?;

        Ok(Self {
            jobs: job_tx,
            events: event_rx,
        })
    }

    /// Queue `job`. Never blocks; the answer arrives later through `drain`.
    pub fn dispatch(&self, job: FetchJob) {
        if self.jobs.send(job).is_err() {
            error!("fetch worker is gone; dropping job");
        }
    }

    /// Everything that finished since the last call, without blocking.
    pub fn drain(&self) -> Vec<FetchEvent> {
        self.events.try_iter().collect()
    }

    /// Block for the next event, up to `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

fn run(runtime: Runtime, client: OmdbClient, jobs: Receiver<FetchJob>, events: Sender<FetchEvent>) {
    debug!("fetch worker started");
    while let Ok(job) = jobs.recv() {
        let client = client.clone();
        let events = events.clone();
        runtime.spawn(async move {
            let event = execute(&client, job).await;
            // The UI may already have shut down.
            let _ = events.send(event);
        });
    }
    debug!("fetch worker stopping");
    runtime.shutdown_timeout(Duration::from_millis(200));
}

async fn execute(client: &OmdbClient, job: FetchJob) -> FetchEvent {
    match job {
        FetchJob::Trending => FetchEvent::Trending(client.trending().await),
        FetchJob::Search(ticket) => {
            let result = client.search(ticket.query()).await;
            FetchEvent::Search { ticket, result }
        }
        FetchJob::Detail(ticket) => {
            let result = client.lookup(ticket.id()).await;
            FetchEvent::Detail { ticket, result }
        }
    }
}

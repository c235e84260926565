//! Binary entry point: read the configuration, start logging and the fetch
//! worker, request the trending slice, and drive the Ratatui event loop until
//! the user exits.
use anyhow::Context;
use movieverse::{config, run_app, telemetry, App, Config, FetchWorker, OmdbClient};
use tracing::info;

/// Returning a `Result` bubbles fatal start-up problems (most commonly a
/// missing API key) to the terminal before the TUI takes it over.
fn main() -> anyhow::Result<()> {
    telemetry::init(&config::data_dir()?)?;
    let config = Config::load()?;
    info!(?config, "starting");

    let client = OmdbClient::new(&config).context("failed to build HTTP client")?;
    let worker = FetchWorker::spawn(client)?;

    let mut app = App::new(worker);
    app.load_trending();
    run_app(&mut app)
}

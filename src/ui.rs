//! Ratatui front-end: a search bar, a grid of result cards, and a detail
//! modal. Rendering only reads controller state; every mutation goes through
//! the controllers in response to a key press or a finished request.

mod app;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;

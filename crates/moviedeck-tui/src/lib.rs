//! Terminal UI components for moviedeck.
//!
//! Uses `ratatui` + `crossterm` for rendering. The catalog and detail
//! views keep their own state; fetches run as tokio tasks and report
//! back through a channel drained by the event loop.

mod app;
/// Catalog (listing) view.
pub mod catalog;
/// Movie detail view.
pub mod detail;
/// Fetch dispatch and outcome types.
pub mod fetch;
/// Display formatting helpers.
pub mod format;
/// Navigable routes.
pub mod route;

pub use app::run_browser;

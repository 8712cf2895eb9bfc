//! Shared application state for the Top Talks server.
//!
//! A single [`AppState`] is constructed at startup and shared across all Axum
//! handlers via `Arc`.

use std::path::PathBuf;

use toptalks_core::intake::IntakeService;
use toptalks_core::shell::PageShell;

/// Shared application state passed to all HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    /// Trial signup validation and recording.
    pub intake: IntakeService,
    /// HTML document renderer for the marketing pages.
    pub shell: PageShell,
    /// Directory served under `/build`.
    pub build_dir: PathBuf,
}

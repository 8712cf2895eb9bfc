//! Marketing page routes.
//!
//! Each page in the shell's page table gets a `GET` route that returns the
//! HTML shell naming its component. Compiled assets are served from the
//! build directory under `/build`.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use toptalks_core::shell::{Page, PAGES};

use crate::error::AppError;
use crate::state::AppState;

/// Build the page router.
pub fn router(state: &AppState) -> Router<Arc<AppState>> {
    let mut router = Router::new();
    for page in PAGES {
        router = router.route(
            page.path,
            get(move |State(state): State<Arc<AppState>>| async move { render(&state, page) }),
        );
    }
    router.nest_service("/build", ServeDir::new(&state.build_dir))
}

fn render(state: &AppState, page: &Page) -> Result<Html<String>, AppError> {
    Ok(Html(state.shell.render(page)?))
}

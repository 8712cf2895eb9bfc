//! Application assembly: shared state and the Axum router.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use toptalks_core::intake::IntakeService;
use toptalks_core::record::TracingRecorder;
use toptalks_core::shell::PageShell;
use toptalks_core::signup_log::SignupLog;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Largest accepted signup body.
pub const MAX_SIGNUP_BODY_BYTES: usize = 64 * 1024;

/// Concurrent signup requests allowed in flight.
pub const SIGNUP_CONCURRENCY: usize = 64;

/// Build the shared application state from configuration.
///
/// # Errors
///
/// Returns an error if a configured manifest cannot be loaded or the signup
/// log cannot be opened.
pub fn build_app_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let mut intake = IntakeService::new().with_recorder(Arc::new(TracingRecorder));

    if let Some(ref log_path) = config.signup_log_path {
        let log = SignupLog::open(log_path).context("failed to open signup log")?;
        info!(path = %log.path().display(), "signup log opened");
        intake = intake.with_recorder(Arc::new(log));
    }

    let shell = match &config.manifest_path {
        Some(path) => {
            let shell = PageShell::from_manifest(config.app_name.clone(), path)
                .with_context(|| format!("failed to load asset manifest {}", path.display()))?;
            info!(path = %path.display(), "asset manifest loaded");
            shell
        }
        None => {
            warn!("no asset manifest configured, pages will render without compiled assets");
            PageShell::new(config.app_name.clone(), None)
        }
    };

    Ok(Arc::new(AppState {
        intake,
        shell,
        build_dir: config.build_dir(),
    }))
}

/// Build the Axum router with all routes and middleware.
#[must_use]
pub fn build_router(state: Arc<AppState>) -> Router {
    // Body and concurrency limits only apply to the form endpoint.
    let api_routes = Router::new()
        .nest("/api/trial", routes::trial::router())
        .layer(DefaultBodyLimit::max(MAX_SIGNUP_BODY_BYTES))
        .layer(tower::limit::ConcurrencyLimitLayer::new(SIGNUP_CONCURRENCY));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .merge(api_routes)
        .merge(routes::pages::router(&state))
        .merge(routes::health::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state)
}

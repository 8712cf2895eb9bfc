//! Top Talks HTTP server.
//!
//! Wires the core library into a running Axum server. Serves the marketing
//! pages at their public paths, the compiled client assets at `/build`, and
//! the trial signup API at `/api/trial/submit`.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

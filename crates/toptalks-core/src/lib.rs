//! Core library for the Top Talks site.
//!
//! Contains the trial signup model and its validation rules, the intake
//! service that turns a raw form submission into an acknowledgment, the
//! signup recorders and notification hook it drives, and the page shell
//! renderer that stitches compiled assets into the HTML document. This crate
//! knows nothing about HTTP.

pub mod error;
pub mod intake;
pub mod notify;
pub mod record;
pub mod shell;
pub mod signup;
pub mod signup_log;
pub mod validation;

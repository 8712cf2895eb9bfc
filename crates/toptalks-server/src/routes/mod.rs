//! HTTP route modules for the Top Talks server.

pub mod health;
pub mod pages;
pub mod trial;

//! Server configuration for the Top Talks site.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `TOPTALKS_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default site name used in page titles.
pub const DEFAULT_APP_NAME: &str = "Top Talks";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Directory holding the compiled `build/` assets.
    pub public_dir: PathBuf,
    /// Bundler manifest to link assets from, if any.
    pub manifest_path: Option<PathBuf>,
    /// JSON-lines file to append accepted signups to (optional).
    pub signup_log_path: Option<PathBuf>,
    /// Site name shown in page titles.
    pub app_name: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on (hosting convention, binds to `0.0.0.0`)
    /// - `TOPTALKS_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:8000`)
    /// - `TOPTALKS_LOG_LEVEL`: log filter (default: `info`)
    /// - `TOPTALKS_PUBLIC_DIR`: compiled asset root (default: `./public`)
    /// - `TOPTALKS_MANIFEST`: manifest path (default: `<public_dir>/build/manifest.json` if present)
    /// - `TOPTALKS_SIGNUP_LOG`: signup JSON-lines file (optional)
    /// - `TOPTALKS_APP_NAME`: site name (default: `Top Talks`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        // Priority: TOPTALKS_BIND_ADDR > PORT > default 127.0.0.1:8000
        let default_addr = SocketAddr::from(([127, 0, 0, 1], 8000));
        let bind_addr = if let Some(addr) = var("TOPTALKS_BIND_ADDR") {
            addr.parse().unwrap_or(default_addr)
        } else if let Some(port_str) = var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(8000);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            default_addr
        };

        let log_level = var("TOPTALKS_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let public_dir = var("TOPTALKS_PUBLIC_DIR")
            .map_or_else(|| PathBuf::from("./public"), PathBuf::from);

        let manifest_path = var("TOPTALKS_MANIFEST")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                let candidate = public_dir.join("build").join("manifest.json");
                candidate.is_file().then_some(candidate)
            });

        let signup_log_path = var("TOPTALKS_SIGNUP_LOG")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let app_name = var("TOPTALKS_APP_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_owned());

        Self {
            bind_addr,
            log_level,
            public_dir,
            manifest_path,
            signup_log_path,
            app_name,
        }
    }

    /// Directory served under `/build`.
    #[must_use]
    pub fn build_dir(&self) -> PathBuf {
        self.public_dir.join("build")
    }
}

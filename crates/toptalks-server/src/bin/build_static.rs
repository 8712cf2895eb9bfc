//! Static shell builder.
//!
//! Reads the bundler manifest, resolves the app entry's compiled script and
//! stylesheet, and writes a standalone `index.html` for hosting the site
//! without the server.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use toptalks_core::shell::{self, PageShell};
use toptalks_server::config::DEFAULT_APP_NAME;

#[derive(Debug, Parser)]
#[command(
    name = "toptalks-build-static",
    version,
    about = "Write a static index.html that links the compiled client assets"
)]
struct Args {
    /// Directory holding the compiled `build/` assets.
    #[arg(long, env = "TOPTALKS_PUBLIC_DIR", default_value = "./public")]
    public_dir: PathBuf,

    /// Manifest to read (default: `<public-dir>/build/manifest.json`).
    #[arg(long, env = "TOPTALKS_MANIFEST")]
    manifest: Option<PathBuf>,

    /// File to write (default: `<public-dir>/index.html`).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Page component the document boots into.
    #[arg(long, default_value = "Landing")]
    component: String,

    /// Site name shown in the title.
    #[arg(long, env = "TOPTALKS_APP_NAME", default_value = DEFAULT_APP_NAME)]
    app_name: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .without_time()
        .init();

    let args = Args::parse();

    let manifest_path = args
        .manifest
        .unwrap_or_else(|| args.public_dir.join("build").join("manifest.json"));
    let output = args
        .output
        .unwrap_or_else(|| args.public_dir.join("index.html"));

    let page = shell::page_for_component(&args.component)
        .with_context(|| format!("unknown page component '{}'", args.component))?;

    let shell = PageShell::from_manifest(args.app_name, &manifest_path)?;
    if let Some(assets) = shell.assets() {
        info!(
            script = %assets.script,
            stylesheet = assets.stylesheet.as_deref().unwrap_or("-"),
            "resolved app entry assets"
        );
    }

    let html = shell.render(page)?;
    std::fs::write(&output, html)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(path = %output.display(), component = page.component, "static shell written");
    Ok(())
}

//! HTML shell for the marketing pages.
//!
//! Every page is served as the same document: a head that loads the compiled
//! stylesheet and script for the client entry point, and an empty `#app`
//! element whose `data-page` attribute names the page component to hydrate.
//! The compiled file names come from the bundler's `manifest.json`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ShellError;

/// Source path of the client entry point inside the manifest.
pub const APP_ENTRY: &str = "resources/js/app.tsx";

/// URL prefix the compiled assets are served under.
pub const ASSET_BASE: &str = "/build/";

/// Version string embedded in the page data.
pub const PAGE_VERSION: &str = "1";

/// A marketing page route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Request path, e.g. `/pricing`.
    pub path: &'static str,
    /// Client page component rendered at this path.
    pub component: &'static str,
    /// Title prefix, joined with the site name.
    pub title: &'static str,
}

/// All marketing pages, home first.
pub const PAGES: &[Page] = &[
    Page {
        path: "/",
        component: "Landing",
        title: "Learn English Online",
    },
    Page {
        path: "/start-teaching",
        component: "StartTeaching",
        title: "Start Teaching",
    },
    Page {
        path: "/student-services",
        component: "StudentServices",
        title: "Student Services",
    },
    Page {
        path: "/start-learning",
        component: "StartLearning",
        title: "Start Learning",
    },
    Page {
        path: "/teach-english",
        component: "TeachEnglish",
        title: "Teach English",
    },
    Page {
        path: "/pricing",
        component: "ViewPricing",
        title: "Pricing",
    },
    Page {
        path: "/free-trial",
        component: "StartFreeTrial",
        title: "Start Free Trial",
    },
];

/// Look up a page by component name.
#[must_use]
pub fn page_for_component(component: &str) -> Option<&'static Page> {
    PAGES.iter().find(|p| p.component == component)
}

/// One chunk in the bundler manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestChunk {
    /// Compiled file, relative to the build directory.
    pub file: String,
    /// Stylesheets emitted for this chunk.
    #[serde(default)]
    pub css: Vec<String>,
}

/// Bundler manifest: source path to compiled chunk.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    chunks: HashMap<String, ManifestChunk>,
}

impl Manifest {
    /// Parse manifest JSON. `origin` names the source in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Parse`] if the JSON is not a manifest.
    pub fn parse(json: &str, origin: &str) -> Result<Self, ShellError> {
        serde_json::from_str(json).map_err(|e| ShellError::Parse {
            path: origin.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Read`] or [`ShellError::Parse`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShellError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ShellError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&json, &path.display().to_string())
    }

    /// Resolve the script and first stylesheet for `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::MissingEntry`] if the manifest has no such chunk.
    pub fn entry_assets(&self, entry: &str) -> Result<EntryAssets, ShellError> {
        let chunk = self
            .chunks
            .get(entry)
            .ok_or_else(|| ShellError::MissingEntry {
                entry: entry.to_owned(),
            })?;
        Ok(EntryAssets {
            script: chunk.file.clone(),
            stylesheet: chunk.css.first().cloned(),
        })
    }
}

/// Compiled files for one entry point, relative to [`ASSET_BASE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryAssets {
    pub script: String,
    pub stylesheet: Option<String>,
}

/// Page data handed to the client for hydration.
#[derive(Debug, Serialize)]
struct PageData<'a> {
    component: &'a str,
    props: serde_json::Map<String, serde_json::Value>,
    url: &'a str,
    version: &'a str,
}

/// Renders the HTML document for every page.
#[derive(Debug, Clone)]
pub struct PageShell {
    site_name: String,
    assets: Option<EntryAssets>,
}

impl PageShell {
    /// A shell that links `assets`, or no compiled assets at all when `None`.
    #[must_use]
    pub fn new(site_name: impl Into<String>, assets: Option<EntryAssets>) -> Self {
        Self {
            site_name: site_name.into(),
            assets,
        }
    }

    /// Build a shell from a manifest file, using the app entry point.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellError`] if the manifest cannot be loaded or lacks the
    /// app entry.
    pub fn from_manifest(
        site_name: impl Into<String>,
        manifest_path: impl AsRef<Path>,
    ) -> Result<Self, ShellError> {
        let assets = Manifest::load(manifest_path)?.entry_assets(APP_ENTRY)?;
        Ok(Self::new(site_name, Some(assets)))
    }

    #[must_use]
    pub fn assets(&self) -> Option<&EntryAssets> {
        self.assets.as_ref()
    }

    /// Render the document for `page`.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Encode`] if the page data cannot be serialized.
    pub fn render(&self, page: &Page) -> Result<String, ShellError> {
        let data = serde_json::to_string(&PageData {
            component: page.component,
            props: serde_json::Map::new(),
            url: page.path,
            version: PAGE_VERSION,
        })
        .map_err(|e| ShellError::Encode {
            reason: e.to_string(),
        })?;

        let mut html = String::with_capacity(4096);
        html.push_str(SHELL_HEAD);
        html.push_str("        <title>");
        html.push_str(&escape(page.title));
        html.push_str(" - ");
        html.push_str(&escape(&self.site_name));
        html.push_str("</title>\n");
        html.push_str(SHELL_LINKS);

        if let Some(assets) = &self.assets {
            if let Some(css) = &assets.stylesheet {
                html.push_str("        <link rel=\"stylesheet\" href=\"");
                html.push_str(ASSET_BASE);
                html.push_str(&escape(css));
                html.push_str("\">\n");
            }
            html.push_str("        <script type=\"module\" src=\"");
            html.push_str(ASSET_BASE);
            html.push_str(&escape(&assets.script));
            html.push_str("\"></script>\n");
        }

        html.push_str("    </head>\n    <body class=\"font-sans antialiased\">\n");
        html.push_str("        <div id=\"app\" data-page='");
        html.push_str(&escape(&data));
        html.push_str("'></div>\n    </body>\n</html>\n");
        Ok(html)
    }
}

/// Escape text for HTML element content and quoted attributes.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const SHELL_HEAD: &str = r"<!DOCTYPE html>
<html lang='en'>
    <head>
        <meta charset='utf-8'>
        <meta name='viewport' content='width=device-width, initial-scale=1'>

        <script>
            (function() {
                const prefersDark = window.matchMedia('(prefers-color-scheme: dark)').matches;
                if (prefersDark) {
                    document.documentElement.classList.add('dark');
                }
            })();
        </script>

        <style>
            html {
                background-color: oklch(1 0 0);
            }

            html.dark {
                background-color: oklch(0.145 0 0);
            }
        </style>

";

const SHELL_LINKS: &str = r#"
        <link rel="icon" type="image/svg+xml" href="data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'%3E%3Ctext x='50' y='50' font-size='75' font-weight='bold' text-anchor='middle' dominant-baseline='central' fill='%23A0522D'%3ET%3C/text%3E%3C/svg%3E">
        <link rel="preconnect" href="https://fonts.bunny.net">
        <link href="https://fonts.bunny.net/css?family=instrument-sans:400,500,600" rel="stylesheet" />

"#;

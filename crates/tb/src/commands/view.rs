//! `tb view` command implementation.

use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tb_config::{CliSettings, Config};
use tb_renderer::escape_html;
use tb_storage::FsStorage;
use tb_viewer::{
    DocFetcher, DocRegistry, DocViewState, DocViewer, HttpFetcher, StorageFetcher, ViewStatus,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the view command.
#[derive(Args)]
pub(crate) struct ViewArgs {
    /// Location path, e.g. `/` or `/getting-started`.
    #[arg(default_value = "/")]
    location: String,

    /// Read documents from the source directory instead of over HTTP.
    #[arg(long)]
    local: bool,

    /// Also print the sidebar with the active page marked.
    #[arg(long)]
    nav: bool,

    /// Also print the headings of the loaded document.
    #[arg(long)]
    toc: bool,

    /// Base URL to fetch documents from (overrides config).
    #[arg(long, env = "TB_ASSET_URL")]
    asset_url: Option<String>,

    /// Markdown source directory for --local (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover tb.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ViewArgs {
    /// Execute the view command.
    ///
    /// A failed fetch is not an error: the fallback message is printed in
    /// place of the document, like the page would show it.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            asset_url: self.asset_url,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let registry = Arc::new(DocRegistry::from_config(&config.docs_resolved));

        let fetcher: Arc<dyn DocFetcher> = if self.local {
            let storage = FsStorage::new(config.docs_resolved.source_dir.clone());
            Arc::new(StorageFetcher::new(Arc::new(storage)))
        } else {
            Arc::new(HttpFetcher::new(
                config.asset_url(),
                config.viewer_resolved.fetch_timeout,
            ))
        };

        tracing::info!(location = %self.location, local = self.local, "Viewing documentation");
        let mut viewer = DocViewer::new(Arc::clone(&registry), fetcher);
        viewer.visit(&self.location);
        let state = viewer.settle().await;

        if self.nav {
            for item in registry.nav_items(state.active_id()) {
                let marker = if item.active { '*' } else { ' ' };
                output.muted(&format!("{marker} {:<28} {}", item.title, item.path));
            }
            output.gap();
        }

        if self.toc && !state.toc().is_empty() {
            for line in toc_lines(state) {
                output.muted(&line);
            }
            output.gap();
        }

        if state.status() == ViewStatus::Error {
            output.warning("Document could not be fetched (run with --verbose for details)");
        }
        output.print(&page_html(&registry, state));
        Ok(())
    }
}

/// Indented "On this page" outline, one line per heading.
fn toc_lines(state: &DocViewState) -> Vec<String> {
    let top = state.toc().iter().map(|e| e.level).min().unwrap_or(1);
    state
        .toc()
        .iter()
        .map(|entry| {
            let indent = "  ".repeat(usize::from(entry.level - top));
            format!("{indent}{} #{}", entry.title, entry.id)
        })
        .collect()
}

/// HTML for the main content area.
///
/// The home entry shows the quick start cards and a link to every other
/// document instead of a document. Unknown ids render nothing.
fn page_html(registry: &DocRegistry, state: &DocViewState) -> String {
    if let Some(message) = state.error_message() {
        return format!("<p>{message}</p>");
    }
    if state.active_id() != Some(registry.home_id()) || !state.content().is_empty() {
        return state.content().to_owned();
    }

    let mut html = String::new();
    if let Some(home) = registry.find(registry.home_id()) {
        write!(html, "<h1>{}</h1>", escape_html(&home.title)).unwrap();
    }

    html.push_str("<h2>Quick Start</h2><ul>");
    for link in registry.quick_start() {
        write!(
            html,
            r#"<li><a href="{}">{}</a><p>{}</p></li>"#,
            registry.path_for(link.id),
            escape_html(link.title),
            escape_html(link.description)
        )
        .unwrap();
    }
    html.push_str("</ul>");

    html.push_str("<h2>All Documentation</h2><ul>");
    for doc in registry.list().iter().filter(|d| d.id != registry.home_id()) {
        write!(
            html,
            r#"<li><a href="{}">{}</a></li>"#,
            registry.path_for(&doc.id),
            escape_html(&doc.title)
        )
        .unwrap();
    }
    html.push_str("</ul>");
    html
}

//! `tb docs` command implementation.

use std::path::PathBuf;

use clap::Args;
use tb_config::{CliSettings, Config};
use tb_storage::FsStorage;
use tb_viewer::{DocRegistry, SourceAudit};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the docs command.
#[derive(Args)]
pub(crate) struct DocsArgs {
    /// Path to configuration file (default: auto-discover tb.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Check every source file against the source directory.
    #[arg(long)]
    check: bool,

    /// Markdown source directory for --check (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl DocsArgs {
    /// Execute the docs command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let registry = DocRegistry::from_config(&config.docs_resolved);

        if !self.check {
            for line in catalog_lines(&registry) {
                output.print(&line);
            }
            return Ok(());
        }

        let source_dir = &config.docs_resolved.source_dir;
        let audit = registry.audit_sources(&FsStorage::new(source_dir.clone()))?;
        for line in audit_lines(&audit) {
            output.warning(&line);
        }
        if !audit.is_complete() {
            return Err(CliError::Validation(format!(
                "{} document(s) missing from {}",
                audit.missing.len(),
                source_dir.display()
            )));
        }
        output.success(&format!(
            "All {} documents found in {}",
            registry.pages().count(),
            source_dir.display()
        ));
        Ok(())
    }
}

/// One warning per missing source file or unreferenced asset.
fn audit_lines(audit: &SourceAudit) -> Vec<String> {
    let missing = audit
        .missing
        .iter()
        .map(|(id, file)| format!("{id}: {file} not found"));
    let unreferenced = audit
        .unreferenced
        .iter()
        .map(|asset| format!("{} ({} bytes) is not in the registry", asset.path, asset.len));
    missing.chain(unreferenced).collect()
}

/// One line per document: route, title and source file.
fn catalog_lines(registry: &DocRegistry) -> Vec<String> {
    let width = registry
        .list()
        .iter()
        .map(|d| registry.path_for(&d.id).len())
        .max()
        .unwrap_or(0);

    registry
        .list()
        .iter()
        .map(|doc| {
            let path = registry.path_for(&doc.id);
            let file = doc.source_file.as_deref().unwrap_or("-");
            format!("{path:<width$}  {}  ({file})", doc.title)
        })
        .collect()
}

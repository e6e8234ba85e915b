//! TB CLI - TaxoBuddy documentation viewer.
//!
//! Provides commands for:
//! - `serve`: Start the documentation asset server
//! - `view`: Render the page shown at a location
//! - `docs`: List the documentation catalog
//! - `theme`: Show or change the stored color theme
//! - `content`: Inspect and validate site content records

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ContentCommand, DocsArgs, ServeArgs, ThemeArgs, ViewArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// TB - TaxoBuddy documentation viewer.
#[derive(Parser)]
#[command(name = "tb", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the documentation asset server.
    Serve(ServeArgs),
    /// Render the documentation page for a location.
    View(ViewArgs),
    /// List documentation pages.
    Docs(DocsArgs),
    /// Show or change the color theme.
    Theme(ThemeArgs),
    /// Site content commands.
    #[command(subcommand)]
    Content(ContentCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => block_on(args.execute(VERSION)),
        Commands::View(args) => block_on(args.execute()),
        Commands::Docs(args) => args.execute(),
        Commands::Theme(args) => args.execute(),
        Commands::Content(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn block_on<F>(future: F) -> Result<(), error::CliError>
where
    F: Future<Output = Result<(), error::CliError>>,
{
    tokio::runtime::Runtime::new()?.block_on(future)
}

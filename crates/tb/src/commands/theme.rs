//! `tb theme` command implementation.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use tb_config::Config;
use tb_viewer::{FilePreferenceStore, PreferenceError, PreferenceStore, Theme, ThemePreference};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the theme command.
#[derive(Args)]
pub(crate) struct ThemeArgs {
    #[command(subcommand)]
    action: Option<ThemeAction>,

    /// Path to configuration file (default: auto-discover tb.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
enum ThemeAction {
    /// Print the current theme (default).
    Show,
    /// Switch between dark and light.
    Toggle,
    /// Store a specific theme.
    Set {
        /// `dark` or `light`.
        theme: Theme,
    },
}

impl ThemeArgs {
    /// Execute the theme command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let store = FilePreferenceStore::new(config.docs_resolved.preferences_path());

        let mut preference = ThemePreference::load(store);
        let action = self.action.unwrap_or(ThemeAction::Show);
        let theme = apply(&mut preference, action)?;

        if action != ThemeAction::Show {
            output.success(&format!(
                "Saved theme to {}",
                preference.store().path().display()
            ));
        }
        output.print(theme.as_str());
        Ok(())
    }
}

/// Run `action` against the preference and return the resulting theme.
fn apply<S: PreferenceStore>(
    preference: &mut ThemePreference<S>,
    action: ThemeAction,
) -> Result<Theme, PreferenceError> {
    match action {
        ThemeAction::Show => Ok(preference.get()),
        ThemeAction::Toggle => preference.toggle(),
        ThemeAction::Set { theme } => {
            preference.set(theme)?;
            Ok(theme)
        }
    }
}

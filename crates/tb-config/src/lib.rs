//! Configuration management for TaxoBuddy.
//!
//! Parses `tb.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `viewer.asset_url`
//! - `site.base_url`
//! - `site.contact_email`

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override the base URL documents are fetched from.
    pub asset_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tb.toml";

/// Project-local state directory, next to the config file.
const PROJECT_DIR: &str = ".tb";

const DEFAULT_HOME_ID: &str = "home";
const DEFAULT_HOME_TITLE: &str = "Documentation Home";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Viewer configuration as written in TOML.
    viewer: ViewerConfigRaw,
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Public site settings.
    pub site: SiteConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved viewer configuration (set after loading).
    #[serde(skip)]
    pub viewer_resolved: ViewerConfig,
    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// One documentation entry as written in `[[docs.entries]]`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DocEntry {
    /// Route segment and lookup key.
    pub id: String,
    /// Sidebar title.
    pub title: String,
    /// Markdown asset path; absent only for the home entry.
    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    home_id: Option<String>,
    home_title: Option<String>,
    entries: Option<Vec<DocEntry>>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory holding the markdown assets.
    pub source_dir: PathBuf,
    /// Project directory for local state (.tb/).
    pub project_dir: PathBuf,
    /// Id the empty location resolves to.
    pub home_id: String,
    /// Title of the home entry.
    pub home_title: String,
    /// Catalog override. `None` means the built-in catalog.
    pub entries: Option<Vec<DocEntry>>,
}

impl DocsConfig {
    /// File backing the local preference store (.tb/local-storage.json).
    #[must_use]
    pub fn preferences_path(&self) -> PathBuf {
        self.project_dir.join("local-storage.json")
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ViewerConfigRaw {
    asset_url: Option<String>,
    fetch_timeout_secs: Option<u64>,
}

/// Resolved viewer configuration.
#[derive(Debug)]
pub struct ViewerConfig {
    /// Explicit asset base URL. When unset, [`Config::asset_url`] derives
    /// one from the server address.
    pub asset_url: Option<String>,
    /// Upper bound for one document fetch; `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset_url: None,
            fetch_timeout: Some(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    data_dir: Option<String>,
}

/// Resolved content configuration.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory holding `about.json`, `pricing.json` and `blog.json`.
    pub data_dir: PathBuf,
}

/// Public site settings used for the sitemap and contact links.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Canonical site origin, without trailing slash.
    pub base_url: String,
    /// Recipient for the contact form.
    pub contact_email: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://taxobuddy.ai".to_owned(),
            contact_email: "info@taxobuddy.ai".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.base_url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `tb.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the result doesn't validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(asset_url) = &settings.asset_url {
            self.viewer_resolved.asset_url = Some(asset_url.clone());
        }
    }

    /// Base URL documents are fetched from, without trailing slash.
    ///
    /// Falls back to the local asset server. A wildcard bind address is
    /// replaced by loopback since it can't be connected to.
    #[must_use]
    pub fn asset_url(&self) -> String {
        if let Some(url) = &self.viewer_resolved.asset_url {
            return url.trim_end_matches('/').to_owned();
        }
        let host = match self.server.host.as_str() {
            "0.0.0.0" | "::" | "[::]" => "127.0.0.1",
            host => host,
        };
        format!("http://{host}:{}", self.server.port)
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Default config with paths relative to `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            viewer: ViewerConfigRaw::default(),
            content: ContentConfigRaw::default(),
            site: SiteConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                project_dir: base.join(PROJECT_DIR),
                home_id: DEFAULT_HOME_ID.to_owned(),
                home_title: DEFAULT_HOME_TITLE.to_owned(),
                entries: None,
            },
            viewer_resolved: ViewerConfig::default(),
            content_resolved: ContentConfig {
                data_dir: base.join("data"),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_docs()?;
        self.validate_urls()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 lets the OS pick, which is never what a config file means
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;
        require_non_empty(&docs.home_id, "docs.home_id")?;

        let Some(entries) = &docs.entries else {
            return Ok(());
        };

        let mut seen = HashSet::new();
        let mut without_file = Vec::new();
        for entry in entries {
            require_non_empty(&entry.id, "docs.entries.id")?;
            require_non_empty(&entry.title, "docs.entries.title")?;
            if entry.id.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "docs.entries id '{}' cannot contain '/'",
                    entry.id
                )));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "docs.entries id '{}' is duplicated",
                    entry.id
                )));
            }
            match &entry.file {
                Some(file) => require_non_empty(file, "docs.entries.file")?,
                None => without_file.push(entry.id.as_str()),
            }
        }

        match without_file.as_slice() {
            [id] if *id == docs.home_id => Ok(()),
            [id] => Err(ConfigError::Validation(format!(
                "docs.entries '{id}' has no file but docs.home_id is '{}'",
                docs.home_id
            ))),
            [] => Err(ConfigError::Validation(format!(
                "docs.entries must include the home entry '{}' without a file",
                docs.home_id
            ))),
            _ => Err(ConfigError::Validation(format!(
                "docs.entries has more than one entry without a file: {}",
                without_file.join(", ")
            ))),
        }
    }

    fn validate_urls(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.viewer_resolved.asset_url {
            require_http_url(url, "viewer.asset_url")?;
        }
        require_http_url(&self.site.base_url, "site.base_url")?;
        require_non_empty(&self.site.contact_email, "site.contact_email")?;
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        if let Some(url) = &self.viewer.asset_url {
            self.viewer.asset_url = Some(expand::expand_env(url, "viewer.asset_url")?);
        }
        self.site.base_url = expand::expand_env(&self.site.base_url, "site.base_url")?;
        self.site.contact_email =
            expand::expand_env(&self.site.contact_email, "site.contact_email")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory and fill defaults.
    fn resolve(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            project_dir: config_dir.join(PROJECT_DIR),
            home_id: self
                .docs
                .home_id
                .clone()
                .unwrap_or_else(|| DEFAULT_HOME_ID.to_owned()),
            home_title: self
                .docs
                .home_title
                .clone()
                .unwrap_or_else(|| DEFAULT_HOME_TITLE.to_owned()),
            entries: self.docs.entries.clone(),
        };

        self.viewer_resolved = ViewerConfig {
            asset_url: self.viewer.asset_url.clone(),
            fetch_timeout: match self.viewer.fetch_timeout_secs {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => Some(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)),
            },
        };

        self.content_resolved = ContentConfig {
            data_dir: resolve(self.content.data_dir.as_deref(), "data"),
        };
    }
}

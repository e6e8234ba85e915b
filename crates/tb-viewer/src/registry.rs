//! Static catalog of documentation pages.
//!
//! The registry is built once at startup and never mutated. Its order is the
//! sidebar and listing order.

use std::collections::HashSet;

use serde::Serialize;
use tb_config::DocsConfig;
use tb_storage::{Asset, Storage, StorageError};

/// Id the empty location resolves to when no config overrides it.
pub const HOME_ID: &str = "home";

/// One documentation page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocumentDescriptor {
    /// Route segment and lookup key.
    pub id: String,
    /// Sidebar title.
    pub title: String,
    /// Markdown asset path relative to the asset root. `None` for the home
    /// entry, which has no document of its own.
    pub source_file: Option<String>,
}

impl DocumentDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>, source_file: Option<&str>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source_file: source_file.map(str::to_owned),
        }
    }
}

/// Sidebar link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub id: String,
    pub title: String,
    /// Route path: `/` for home, `/<id>` otherwise.
    pub path: String,
    /// Whether this item is the page currently shown.
    pub active: bool,
}

/// Home page card linking to a common starting point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuickLink {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

const BUILTIN: &[(&str, &str, &str)] = &[
    ("getting-started", "Getting Started", "getting-started.md"),
    ("customization-guide", "Customization Guide", "customization-guide.md"),
    ("routing-and-pages", "Routing & Pages", "routing-and-pages.md"),
    ("layout-system", "Layout System", "layout-system.md"),
    ("data-management", "Data Management", "data-management.md"),
    ("components-guide", "Components Guide", "components-guide.md"),
    ("loading-and-performance", "Loading & Performance", "loading-and-performance.md"),
    ("styling-guide", "Styling Guide", "styling-guide.md"),
    ("deployment", "Deployment", "deployment.md"),
    ("troubleshooting", "Troubleshooting", "troubleshooting.md"),
];

const QUICK_START: &[QuickLink] = &[
    QuickLink {
        id: "getting-started",
        title: "Getting Started",
        description: "Installation, setup, and first steps",
    },
    QuickLink {
        id: "customization-guide",
        title: "Customization Guide",
        description: "Logo, favicon, and theme customization",
    },
    QuickLink {
        id: "data-management",
        title: "Data Management",
        description: "Working with JSON data files",
    },
    QuickLink {
        id: "deployment",
        title: "Deployment",
        description: "Building and deploying your template",
    },
];

/// Registry source files checked against the assets in storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceAudit {
    /// `(id, source_file)` of entries whose file isn't in storage.
    pub missing: Vec<(String, String)>,
    /// Markdown assets no entry points at.
    pub unreferenced: Vec<Asset>,
}

impl SourceAudit {
    /// Every entry can be fetched. Unreferenced assets don't count.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Ordered, immutable document catalog.
#[derive(Clone, Debug)]
pub struct DocRegistry {
    docs: Vec<DocumentDescriptor>,
    home_id: String,
}

impl DocRegistry {
    /// Build a registry from descriptors in display order.
    ///
    /// `home_id` is what the empty location resolves to. It doesn't have to
    /// be present in `docs`, although every shipped catalog includes it.
    pub fn new(home_id: impl Into<String>, docs: Vec<DocumentDescriptor>) -> Self {
        Self {
            docs,
            home_id: home_id.into(),
        }
    }

    /// The catalog shipped with the site: a home entry followed by ten guides.
    #[must_use]
    pub fn builtin() -> Self {
        Self::builtin_with_home(HOME_ID, "Documentation Home")
    }

    fn builtin_with_home(home_id: &str, home_title: &str) -> Self {
        let docs = std::iter::once(DocumentDescriptor::new(home_id, home_title, None))
            .chain(
                BUILTIN
                    .iter()
                    .map(|(id, title, file)| DocumentDescriptor::new(*id, *title, Some(*file))),
            )
            .collect();
        Self::new(home_id, docs)
    }

    /// Registry described by `[docs]`, falling back to the built-in catalog
    /// when no entries are configured.
    ///
    /// Entries are expected to have passed config validation.
    #[must_use]
    pub fn from_config(docs: &DocsConfig) -> Self {
        match &docs.entries {
            Some(entries) => Self::new(
                docs.home_id.clone(),
                entries
                    .iter()
                    .map(|e| DocumentDescriptor::new(&e.id, &e.title, e.file.as_deref()))
                    .collect(),
            ),
            None => Self::builtin_with_home(&docs.home_id, &docs.home_title),
        }
    }

    /// Full catalog in display order.
    #[must_use]
    pub fn list(&self) -> &[DocumentDescriptor] {
        &self.docs
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&DocumentDescriptor> {
        self.docs.iter().find(|d| d.id == id)
    }

    #[must_use]
    pub fn home_id(&self) -> &str {
        &self.home_id
    }

    /// Entries that have a markdown document.
    pub fn pages(&self) -> impl Iterator<Item = &DocumentDescriptor> {
        self.docs.iter().filter(|d| d.source_file.is_some())
    }

    /// Route path for a document id.
    #[must_use]
    pub fn path_for(&self, id: &str) -> String {
        if id == self.home_id {
            "/".to_owned()
        } else {
            format!("/{id}")
        }
    }

    /// Sidebar links with `active_id` highlighted.
    #[must_use]
    pub fn nav_items(&self, active_id: Option<&str>) -> Vec<NavItem> {
        self.docs
            .iter()
            .map(|d| NavItem {
                id: d.id.clone(),
                title: d.title.clone(),
                path: self.path_for(&d.id),
                active: active_id == Some(d.id.as_str()),
            })
            .collect()
    }

    /// Compare source files against `storage`.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the assets can't be listed.
    pub fn audit_sources(&self, storage: &dyn Storage) -> Result<SourceAudit, StorageError> {
        let files = || {
            self.pages().filter_map(|d| {
                let file = d.source_file.as_deref()?.trim_start_matches('/');
                Some((d, file))
            })
        };

        let missing = files()
            .filter(|(_, file)| !storage.exists(file))
            .map(|(d, file)| (d.id.clone(), file.to_owned()))
            .collect();
        let referenced: HashSet<&str> = files().map(|(_, file)| file).collect();
        let unreferenced = storage
            .list()?
            .into_iter()
            .filter(|asset| !referenced.contains(asset.path.as_str()))
            .collect();

        Ok(SourceAudit {
            missing,
            unreferenced,
        })
    }

    /// Home page quick start cards whose target exists in this registry.
    pub fn quick_start(&self) -> impl Iterator<Item = &QuickLink> {
        QUICK_START.iter().filter(|link| self.find(link.id).is_some())
    }
}

impl Default for DocRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

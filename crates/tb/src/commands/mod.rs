//! CLI command implementations.

pub(crate) mod content;
pub(crate) mod docs;
pub(crate) mod serve;
pub(crate) mod theme;
pub(crate) mod view;

pub(crate) use content::ContentCommand;
pub(crate) use docs::DocsArgs;
pub(crate) use serve::ServeArgs;
pub(crate) use theme::ThemeArgs;
pub(crate) use view::ViewArgs;

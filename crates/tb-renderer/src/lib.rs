//! Markdown to HTML rendering for documentation pages.
//!
//! The renderer walks `pulldown-cmark` events and writes HTML through a
//! [`RenderBackend`]. Block structure (paragraphs, lists, tables, headings)
//! is handled generically; code blocks, blockquotes, images and link rewriting
//! are delegated to the backend. [`HtmlBackend`] is the only backend shipped.
//!
//! # Trust boundary
//!
//! The produced markup is meant to be injected into a page verbatim, and raw
//! HTML found in the source is passed through untouched. That is only sound
//! because every document is an author-controlled asset bundled at build time.
//! This crate is **not** an HTML sanitizer: never feed it user-supplied
//! markdown.
//!
//! # Example
//!
//! ```
//! let html = tb_renderer::render("## Step 1\nDo X");
//! assert_eq!(html, r#"<h2 id="step-1">Step 1</h2><p>Do X</p>"#);
//! ```

mod backend;
mod html;
mod renderer;
mod state;
mod util;

pub use backend::{AlertKind, RenderBackend};
pub use html::HtmlBackend;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{TocEntry, escape_html, slugify};

/// Render markdown to HTML with the default HTML backend.
///
/// Total over all inputs: malformed markdown degrades to literal text.
#[must_use]
pub fn render(markdown: &str) -> String {
    MarkdownRenderer::<HtmlBackend>::new()
        .render_markdown(markdown)
        .html
}

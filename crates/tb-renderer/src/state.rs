//! Per-render bookkeeping for nested markdown constructs.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::Alignment;

/// Text captured between a start and end event (code block body, image alt).
#[derive(Default)]
pub(crate) struct Capture {
    active: bool,
    buffer: String,
}

impl Capture {
    pub(crate) fn start(&mut self) {
        self.active = true;
        self.buffer.clear();
    }

    pub(crate) fn finish(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.buffer)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Column alignment and position tracking inside a table.
#[derive(Default)]
pub(crate) struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    column: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.column = 0;
    }

    pub(crate) fn set_head(&mut self, in_head: bool) {
        self.in_head = in_head;
        self.column = 0;
    }

    pub(crate) fn start_row(&mut self) {
        self.column = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.column += 1;
    }

    pub(crate) fn cell_tag(&self) -> &'static str {
        if self.in_head { "th" } else { "td" }
    }

    pub(crate) fn alignment_attr(&self) -> &'static str {
        match self.alignments.get(self.column) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Plain heading text.
    pub title: String,
    /// Anchor id emitted on the heading element.
    pub id: String,
}

/// Heading being rendered plus everything collected so far.
///
/// Heading markup is buffered until the end tag because the anchor id depends
/// on the full heading text.
#[derive(Default)]
pub(crate) struct HeadingState {
    level: Option<u8>,
    text: String,
    html: String,
    toc: Vec<TocEntry>,
    slug_counts: HashMap<String, usize>,
    emitted_ids: HashSet<String>,
}

impl HeadingState {
    pub(crate) fn start(&mut self, level: u8) {
        self.level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    pub(crate) fn is_active(&self) -> bool {
        self.level.is_some()
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub(crate) fn html_mut(&mut self) -> &mut String {
        &mut self.html
    }

    /// Close the current heading, returning `(level, id, inner_html)`.
    pub(crate) fn finish(&mut self) -> Option<(u8, String, String)> {
        let level = self.level.take()?;
        let title = std::mem::take(&mut self.text).trim().to_owned();
        let html = std::mem::take(&mut self.html);
        let id = self.unique_id(&title);

        self.toc.push(TocEntry {
            level,
            title,
            id: id.clone(),
        });
        Some((level, id, html))
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }

    fn unique_id(&mut self, title: &str) -> String {
        let base = match slugify(title) {
            slug if slug.is_empty() => "section".to_owned(),
            slug => slug,
        };
        let count = self.slug_counts.entry(base.clone()).or_default();
        loop {
            let id = if *count == 0 {
                base.clone()
            } else {
                format!("{base}-{count}")
            };
            *count += 1;
            if self.emitted_ids.insert(id.clone()) {
                return id;
            }
        }
    }
}

/// Lowercase, dash-separated anchor slug.
///
/// Alphanumerics are kept, whitespace, `-` and `_` collapse into single dashes,
/// everything else is dropped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}

/// Escape the five HTML-significant characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("Routing & Pages"), "routing-pages");
        assert_eq!(slugify("  Step 1  "), "step-1");
        assert_eq!(slugify("snake_case--name"), "snake-case-name");
        assert_eq!(slugify("What's new?"), "whats-new");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>"), "&lt;b&gt;");
        assert_eq!(escape_html("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(escape_html(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_capture() {
        let mut capture = Capture::default();
        assert!(!capture.is_active());
        capture.start();
        capture.push_str("let x = 1;");
        assert!(capture.is_active());
        assert_eq!(capture.finish(), "let x = 1;");
        assert!(!capture.is_active());
    }

    #[test]
    fn test_table_alignment() {
        let mut table = TableState::default();
        table.start(vec![Alignment::None, Alignment::Right]);
        table.set_head(true);
        assert_eq!(table.cell_tag(), "th");
        assert_eq!(table.alignment_attr(), "");
        table.next_cell();
        assert_eq!(table.alignment_attr(), r#" style="text-align:right""#);
        table.set_head(false);
        assert_eq!(table.cell_tag(), "td");
    }

    #[test]
    fn test_heading_ids_are_unique() {
        let mut heading = HeadingState::default();
        for _ in 0..3 {
            heading.start(2);
            heading.push_text("FAQ");
            heading.finish();
        }
        let ids: Vec<_> = heading.take_toc().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["faq", "faq-1", "faq-2"]);
    }

    #[test]
    fn test_heading_id_skips_generated_suffix() {
        let mut heading = HeadingState::default();
        for title in ["Setup", "Setup", "Setup 1", "Setup"] {
            heading.start(2);
            heading.push_text(title);
            heading.finish();
        }
        let ids: Vec<_> = heading.take_toc().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["setup", "setup-1", "setup-1-1", "setup-2"]);
    }

    #[test]
    fn test_heading_without_slug_text() {
        let mut heading = HeadingState::default();
        heading.start(3);
        heading.push_text("!!!");
        let (level, id, _) = heading.finish().unwrap();
        assert_eq!(level, 3);
        assert_eq!(id, "section");
    }
}

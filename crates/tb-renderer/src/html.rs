//! HTML backend.

use std::borrow::Cow;
use std::fmt::Write;

use crate::backend::RenderBackend;
use crate::state::escape_html;

/// Semantic HTML5 output.
///
/// Links to sibling markdown files (`./setup.md`, `setup.md#install`) are
/// rewritten to the viewer route of the document (`/setup`, `/setup#install`).
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        match lang {
            Some(lang) => write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            )
            .unwrap(),
            None => write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap(),
        }
    }

    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        write!(out, r#"<img src="{}""#, escape_html(src)).unwrap();
        if !title.is_empty() {
            write!(out, r#" title="{}""#, escape_html(title)).unwrap();
        }
        write!(out, r#" alt="{}">"#, escape_html(alt)).unwrap();
    }

    fn transform_link(url: &str) -> Cow<'_, str> {
        match doc_route(url) {
            Some(route) => Cow::Owned(route),
            None => Cow::Borrowed(url),
        }
    }
}

/// Map a link to a sibling `.md` asset onto its document route.
///
/// Returns `None` for anything that is not a relative markdown link.
fn doc_route(url: &str) -> Option<String> {
    if url.contains("://") || url.starts_with("//") || url.starts_with('#') || url.contains(':') {
        return None;
    }

    let (path, fragment) = match url.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (url, None),
    };

    let stem = path.strip_suffix(".md")?;
    let stem = stem.trim_start_matches("./").trim_start_matches('/');
    if stem.is_empty() || stem.contains("..") {
        return None;
    }

    let mut route = format!("/{stem}");
    if let Some(fragment) = fragment {
        route.push('#');
        route.push_str(fragment);
    }
    Some(route)
}

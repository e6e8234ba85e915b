//! Output format hooks used by the generic renderer.

use std::borrow::Cow;

use pulldown_cmark::BlockQuoteKind;

/// GitHub-style alert flavour (`> [!NOTE]` and friends).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    /// CSS modifier and display label.
    #[must_use]
    pub fn label(self) -> (&'static str, &'static str) {
        match self {
            Self::Note => ("note", "Note"),
            Self::Tip => ("tip", "Tip"),
            Self::Important => ("important", "Important"),
            Self::Warning => ("warning", "Warning"),
            Self::Caution => ("caution", "Caution"),
        }
    }
}

impl From<BlockQuoteKind> for AlertKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => Self::Note,
            BlockQuoteKind::Tip => Self::Tip,
            BlockQuoteKind::Important => Self::Important,
            BlockQuoteKind::Warning => Self::Warning,
            BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

/// Format-specific pieces of the output.
///
/// Everything with a sensible HTML default has one; a backend only has to
/// provide code blocks, blockquotes and images.
pub trait RenderBackend {
    /// Write a fenced or indented code block.
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);

    fn blockquote_start(out: &mut String);

    fn blockquote_end(out: &mut String);

    /// Write an image once its alt text has been collected.
    fn image(src: &str, alt: &str, title: &str, out: &mut String);

    fn alert_start(kind: AlertKind, out: &mut String) {
        let (class, title) = kind.label();
        out.push_str(r#"<div class="alert alert-"#);
        out.push_str(class);
        out.push_str(r#""><p class="alert-title">"#);
        out.push_str(title);
        out.push_str("</p>");
    }

    fn alert_end(_kind: AlertKind, out: &mut String) {
        out.push_str("</div>");
    }

    /// Rewrite a link target. Identity by default.
    #[must_use]
    fn transform_link(url: &str) -> Cow<'_, str> {
        Cow::Borrowed(url)
    }

    fn hard_break(out: &mut String) {
        out.push_str("<br>");
    }

    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr>");
    }

    fn task_list_marker(checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }
}

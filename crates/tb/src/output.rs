//! Terminal output for `tb` commands.
//!
//! Command results go to stdout so they can be piped. Progress and status
//! lines go to stderr. `console` drops the colours when a stream isn't a
//! terminal.

use console::{Style, Term};

pub(crate) struct Output {
    stdout: Term,
    stderr: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    /// Result line, uncoloured.
    pub(crate) fn print(&self, msg: &str) {
        let _ = self.stdout.write_line(msg);
    }

    /// Result line that stands out, such as a plan name or an open FAQ entry.
    pub(crate) fn highlight(&self, msg: &str) {
        Self::styled(&self.stdout, &Style::new().cyan().bold(), msg);
    }

    /// Secondary result line (sidebar, outline, post metadata).
    pub(crate) fn muted(&self, msg: &str) {
        Self::styled(&self.stdout, &Style::new().dim(), msg);
    }

    /// Blank line between result sections.
    pub(crate) fn gap(&self) {
        let _ = self.stdout.write_line("");
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.stderr.write_line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        Self::styled(&self.stderr, &Style::new().green(), msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        Self::styled(&self.stderr, &Style::new().yellow(), msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        Self::styled(&self.stderr, &Style::new().red(), msg);
    }

    fn styled(term: &Term, style: &Style, msg: &str) {
        let _ = term.write_line(&style.apply_to(msg).to_string());
    }
}

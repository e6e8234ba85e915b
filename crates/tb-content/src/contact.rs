//! Contact form submissions as `mailto:` links.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::{ContentError, require};

/// Characters left alone by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Filled-in contact form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    /// All fields are required.
    pub fn validate(&self) -> Result<(), ContentError> {
        require(&self.name, "contact", "name")?;
        require(&self.email, "contact", "email")?;
        if !self.email.contains('@') {
            return Err(ContentError::invalid("contact", "email must contain '@'"));
        }
        require(&self.subject, "contact", "subject")?;
        require(&self.message, "contact", "message")?;
        Ok(())
    }

    /// `mailto:` URL that opens a prefilled draft to `to`.
    #[must_use]
    pub fn mailto(&self, to: &str) -> String {
        let subject = format!("{} - {}", self.subject, self.name);
        let body = format!("From: {} <{}>\n\n{}", self.name, self.email, self.message);
        format!(
            "mailto:{to}?subject={}&body={}",
            utf8_percent_encode(&subject, COMPONENT),
            utf8_percent_encode(&body, COMPONENT)
        )
    }
}

//! `mailto:` link construction for pre-filled emails.
//!
//! Builds RFC 6068 style URIs from a recipient, subject and body, and parses
//! them back so a scanned link can be checked against what was encoded.

pub mod defaults;
pub mod uri;

use serde::{Deserialize, Serialize};

pub use uri::MailtoUri;

/// Errors raised while building or parsing a mailto link.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailtoError {
    #[error("Recipient is empty")]
    EmptyRecipient,

    #[error("Recipient contains a character that cannot appear in a URI: {0:?}")]
    InvalidRecipient(char),

    #[error("Not a mailto URI (missing 'mailto:' scheme)")]
    MissingScheme,

    #[error("Percent-encoded {field} is not valid UTF-8")]
    InvalidEncoding { field: &'static str },
}

/// Recipient, subject and body of a pre-filled email.
///
/// The recipient is checked at construction time; subject and body accept any
/// text since every string can be percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEmailSpec")]
pub struct EmailSpec {
    recipient: String,
    subject: String,
    body: String,
}

#[derive(Deserialize)]
struct RawEmailSpec {
    recipient: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    body: String,
}

impl TryFrom<RawEmailSpec> for EmailSpec {
    type Error = MailtoError;

    fn try_from(raw: RawEmailSpec) -> Result<Self, Self::Error> {
        Self::new(raw.recipient, raw.subject, raw.body)
    }
}

impl EmailSpec {
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, MailtoError> {
        let recipient = recipient.into();
        validate_recipient(&recipient)?;
        Ok(Self {
            recipient,
            subject: subject.into(),
            body: body.into(),
        })
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Build the `mailto:` URI for this email.
    pub fn to_uri(&self) -> MailtoUri {
        MailtoUri::build(self)
    }
}

impl Default for EmailSpec {
    /// French study-recruitment message.
    fn default() -> Self {
        Self {
            recipient: defaults::RECIPIENT.to_string(),
            subject: defaults::SUBJECT.to_string(),
            body: defaults::BODY.to_string(),
        }
    }
}

/// Reject recipients that cannot form a valid `mailto:` target.
///
/// Whitespace and control characters are refused rather than escaped: mail
/// clients treat an escaped space in the address part as a different mailbox.
pub fn validate_recipient(recipient: &str) -> Result<(), MailtoError> {
    if recipient.trim().is_empty() {
        return Err(MailtoError::EmptyRecipient);
    }
    if let Some(c) = recipient
        .chars()
        .find(|c| c.is_control() || c.is_whitespace())
    {
        return Err(MailtoError::InvalidRecipient(c));
    }
    Ok(())
}

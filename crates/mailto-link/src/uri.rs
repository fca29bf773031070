//! Building and parsing `mailto:` URIs.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use tracing::debug;

use crate::{EmailSpec, MailtoError};

const SCHEME: &str = "mailto:";

/// Everything except unreserved characters (RFC 3986 section 2.3).
const HFVALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Address part keeps `@` and the `,` separator between mailboxes.
const ADDRESS: &AsciiSet = &HFVALUE.remove(b'@').remove(b',');

/// A `mailto:` URI derived from an [`EmailSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MailtoUri(String);

impl MailtoUri {
    /// Format `mailto:<recipient>?subject=<enc>&body=<enc>`.
    pub fn build(spec: &EmailSpec) -> Self {
        let uri = format!(
            "{SCHEME}{}?subject={}&body={}",
            utf8_percent_encode(spec.recipient(), ADDRESS),
            utf8_percent_encode(spec.subject(), HFVALUE),
            utf8_percent_encode(spec.body(), HFVALUE),
        );
        debug!(len = uri.len(), "Built mailto URI");
        Self(uri)
    }

    /// Decode a `mailto:` URI back into its recipient, subject and body.
    ///
    /// Header names are matched case-insensitively and unknown headers are
    /// ignored. A missing subject or body decodes as an empty string.
    pub fn parse(input: &str) -> Result<EmailSpec, MailtoError> {
        let rest = input
            .get(..SCHEME.len())
            .filter(|scheme| scheme.eq_ignore_ascii_case(SCHEME))
            .map(|_| &input[SCHEME.len()..])
            .ok_or(MailtoError::MissingScheme)?;

        let (to, query) = rest.split_once('?').unwrap_or((rest, ""));
        let recipient = decode(to, "recipient")?;

        let mut subject = String::new();
        let mut body = String::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            if name.eq_ignore_ascii_case("subject") {
                subject = decode(value, "subject")?;
            } else if name.eq_ignore_ascii_case("body") {
                body = decode(value, "body")?;
            }
        }

        EmailSpec::new(recipient, subject, body)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for MailtoUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MailtoUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn decode(value: &str, field: &'static str) -> Result<String, MailtoError> {
    percent_decode_str(value)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| MailtoError::InvalidEncoding { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(recipient: &str, subject: &str, body: &str) -> EmailSpec {
        EmailSpec::new(recipient, subject, body).unwrap()
    }

    #[test]
    fn builds_scenario_a_uri() {
        let uri = MailtoUri::build(&spec(
            "etude@example.com",
            "Participation",
            "Bonjour, je souhaite participer.",
        ));
        assert_eq!(
            uri.as_str(),
            "mailto:etude@example.com?subject=Participation&body=Bonjour%2C%20je%20souhaite%20participer."
        );
    }

    #[test]
    fn encodes_reserved_and_non_ascii() {
        let uri = MailtoUri::build(&spec("a@b.fr", "Q&A? 100%", "étude + café\n"));
        assert_eq!(
            uri.as_str(),
            "mailto:a@b.fr?subject=Q%26A%3F%20100%25&body=%C3%A9tude%20%2B%20caf%C3%A9%0A"
        );
    }

    #[test]
    fn recipient_keeps_at_and_comma_but_escapes_query_chars() {
        let uri = MailtoUri::build(&spec("a@b.fr,c?d@e.fr", "", ""));
        assert_eq!(uri.as_str(), "mailto:a@b.fr,c%3Fd@e.fr?subject=&body=");
    }

    #[test]
    fn parse_reverses_build() {
        let cases = [
            spec("etude@example.com", "Participation", "Bonjour, je souhaite participer."),
            spec("x@y.org", "Q&A = ok?", "ligne 1\r\nligne 2 #3 ~ 50%"),
            EmailSpec::default(),
            spec("a@b.fr", "", ""),
        ];
        for original in cases {
            let uri = original.to_uri();
            assert_eq!(MailtoUri::parse(uri.as_str()).unwrap(), original, "{uri}");
        }
    }

    #[test]
    fn parse_is_lenient_on_case_and_missing_fields() {
        let parsed = MailtoUri::parse("MAILTO:a@b.fr?Body=hi&cc=z@z.fr").unwrap();
        assert_eq!(parsed.recipient(), "a@b.fr");
        assert_eq!(parsed.subject(), "");
        assert_eq!(parsed.body(), "hi");
    }

    #[test]
    fn parse_rejects_other_schemes() {
        assert_eq!(
            MailtoUri::parse("https://example.com").unwrap_err(),
            MailtoError::MissingScheme
        );
        assert_eq!(MailtoUri::parse("mail").unwrap_err(), MailtoError::MissingScheme);
    }

    #[test]
    fn parse_rejects_invalid_utf8() {
        assert_eq!(
            MailtoUri::parse("mailto:a@b.fr?subject=%FF").unwrap_err(),
            MailtoError::InvalidEncoding { field: "subject" }
        );
    }

    #[test]
    fn parse_rejects_empty_recipient() {
        assert_eq!(
            MailtoUri::parse("mailto:?subject=x").unwrap_err(),
            MailtoError::EmptyRecipient
        );
    }
}

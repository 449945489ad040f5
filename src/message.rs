//! The message to sign.

use crate::header::{HeaderFields, ParseHeaderError};
use std::str::FromStr;

/// A message as handed over for signing: the header block, the subject, and
/// the body as an opaque byte sequence.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawMessage {
    pub headers: HeaderFields,
    pub subject: String,
    pub body: Vec<u8>,
}

impl RawMessage {
    pub fn new(
        headers: HeaderFields,
        subject: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            headers,
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Creates a message from a header block in textual form.
    pub fn parse(
        header_block: &str,
        subject: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Result<Self, ParseHeaderError> {
        let headers = HeaderFields::from_str(header_block)?;
        Ok(Self::new(headers, subject, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::ParseHeaderErrorKind;

    #[test]
    fn parse_ok() {
        let msg = RawMessage::parse("From: a@example.com\r\nTo: b@example.com\r\n", "Hi", "body").unwrap();

        assert_eq!(msg.headers.as_ref().len(), 2);
        assert_eq!(msg.subject, "Hi");
        assert_eq!(msg.body, b"body");
    }

    #[test]
    fn parse_malformed() {
        let error = RawMessage::parse("From a@example.com", "", "").unwrap_err();

        assert_eq!(error.line, 1);
        assert_eq!(error.kind, ParseHeaderErrorKind::MissingColon);
    }
}

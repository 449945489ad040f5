//! Representation of email header data.

use crate::util::is_wsp;
use bstr::ByteSlice;
use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

pub type HeaderField = (FieldName, FieldBody);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HeaderFieldError;

impl Display for HeaderFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid header field")
    }
}

impl Error for HeaderFieldError {}

/// An ordered collection of header fields, as received.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HeaderFields(Box<[HeaderField]>);

impl HeaderFields {
    pub fn new(value: impl Into<Box<[HeaderField]>>) -> Self {
        Self(value.into())
    }

    pub fn from_vec(value: Vec<(String, Vec<u8>)>) -> Result<Self, HeaderFieldError> {
        let value: Vec<_> = value
            .into_iter()
            .map(|(name, value)| {
                let name = FieldName::new(name)?;
                let body = FieldBody::new(value)?;
                Ok((name, body))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self::new(value))
    }

    /// Returns the first header field with the given name, compared
    /// case-insensitively.
    pub fn find(&self, name: &str) -> Option<&HeaderField> {
        self.0.iter().find(|(n, _)| *n == name)
    }
}

impl AsRef<[HeaderField]> for HeaderFields {
    fn as_ref(&self) -> &[HeaderField] {
        &self.0
    }
}

impl From<HeaderFields> for Vec<HeaderField> {
    fn from(header_fields: HeaderFields) -> Self {
        header_fields.0.into_vec()
    }
}

/// The reason a header block could not be parsed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParseHeaderErrorKind {
    MissingColon,
    InvalidName,
    InvalidValue,
    UnexpectedContinuation,
}

/// An error that occurs when parsing a header block.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ParseHeaderError {
    /// The 1-based number of the offending line.
    pub line: usize,
    pub kind: ParseHeaderErrorKind,
}

impl Display for ParseHeaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let line = self.line;
        match self.kind {
            ParseHeaderErrorKind::MissingColon => write!(f, "line {line}: header field without colon"),
            ParseHeaderErrorKind::InvalidName => write!(f, "line {line}: invalid header field name"),
            ParseHeaderErrorKind::InvalidValue => write!(f, "line {line}: invalid header field value"),
            ParseHeaderErrorKind::UnexpectedContinuation => {
                write!(f, "line {line}: continuation line without header field")
            }
        }
    }
}

impl Error for ParseHeaderError {}

impl FromStr for HeaderFields {
    type Err = ParseHeaderError;

    /// Parses a header block.
    ///
    /// Lines may be separated by CRLF or by a bare LF; folded continuation
    /// lines are joined to the preceding field with CRLF. Trailing line breaks
    /// are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_end_matches(|c| matches!(c, '\r' | '\n'));

        if s.is_empty() {
            return Ok(Self::default());
        }

        let error = |line, kind| ParseHeaderError { line, kind };

        // (name, raw value, line number of the field's first line)
        let mut fields: Vec<(FieldName, Vec<u8>, usize)> = vec![];

        for (i, line) in s.split('\n').enumerate() {
            let line_no = i + 1;
            let line = line.strip_suffix('\r').unwrap_or(line);

            if line.starts_with(is_wsp) {
                let (_, value, _) = fields
                    .last_mut()
                    .ok_or_else(|| error(line_no, ParseHeaderErrorKind::UnexpectedContinuation))?;
                value.extend(b"\r\n");
                value.extend(line.bytes());
            } else {
                let (name, value) = line
                    .split_once(':')
                    .ok_or_else(|| error(line_no, ParseHeaderErrorKind::MissingColon))?;

                // obsolete syntax allows WSP between name and colon
                let name = FieldName::new(name.trim_end_matches(is_wsp))
                    .map_err(|_| error(line_no, ParseHeaderErrorKind::InvalidName))?;

                fields.push((name, value.as_bytes().to_vec(), line_no));
            }
        }

        let fields: Vec<_> = fields
            .into_iter()
            .map(|(name, value, line_no)| {
                FieldBody::new(value)
                    .map(|body| (name, body))
                    .map_err(|_| error(line_no, ParseHeaderErrorKind::InvalidValue))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self::new(fields))
    }
}

/// A header field name.
#[derive(Clone, Eq)]
pub struct FieldName(Box<str>);

impl FieldName {
    pub fn new(value: impl Into<Box<str>>) -> Result<Self, HeaderFieldError> {
        let value = value.into();
        if value.is_empty() {
            return Err(HeaderFieldError);
        }
        if !value.chars().all(|c| c.is_ascii_graphic() && c != ':') {
            return Err(HeaderFieldError);
        }
        Ok(Self(value))
    }

    /// Creates a field name from a well-known valid name.
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(Self::new(value).is_ok());
        Self(value.into())
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for FieldName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Debug for FieldName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl PartialEq for FieldName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl PartialEq<&str> for FieldName {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl Hash for FieldName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

/// A header field value: everything after the colon, including leading
/// whitespace and folding line breaks, excluding the final CRLF.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct FieldBody(Box<[u8]>);

impl FieldBody {
    pub fn new(value: impl Into<Box<[u8]>>) -> Result<Self, HeaderFieldError> {
        let value = value.into();
        // only folded continuation lines:
        if !(value.split_str("\r\n").skip(1).all(|line| line.starts_with(b" ") || line.starts_with(b"\t"))) {
            return Err(HeaderFieldError);
        }
        // no empty or blank lines past the first one, no trailing CRLF:
        if !(value.split_str("\r\n").skip(1).all(|line| !line.trim_with(|c| matches!(c, ' ' | '\t')).is_empty())) {
            return Err(HeaderFieldError);
        }
        // no stray CR and LF
        if !(value.split_str("\r\n").all(|line| !line.contains(&b'\r') && !line.contains(&b'\n'))) {
            return Err(HeaderFieldError);
        }
        // allow all other bytes, UTF-8 not required to accomodate eg mistaken Latin 1 bytes
        Ok(Self(value))
    }
}

impl AsRef<[u8]> for FieldBody {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for FieldBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldBody")
            .field(&self.0.as_bstr())
            .finish()
    }
}

//! Canonicalization utilities.
//!
//! Header fields are canonicalized with the *relaxed* algorithm, the body with
//! the *simple* algorithm (RFC 6376, section 3.4).

use crate::header::{FieldBody, FieldName, HeaderFields, ParseHeaderError};
use bstr::ByteSlice;
use std::str::FromStr;

const SP: u8 = b' ';
const CR: u8 = b'\r';
const LF: u8 = b'\n';
const CRLF: [u8; 2] = [CR, LF];

// which state are we in = what did we see last?
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CanonState {
    Init,
    LineEnd,
    Cr,
    Byte,
}

/// A canonicalizer using the *simple* body canonicalization algorithm.
///
/// The body may be fed in chunks of any size; the concatenated output of all
/// calls to `canonicalize_chunk` plus the output of `finish` is the canonical
/// body. Line endings are normalized to CRLF: a bare LF ends a line just like
/// CRLF does, while a stray CR not followed by LF is kept as content.
pub struct BodyCanonicalizer {
    state: CanonState,
    blank_line: bool,  // whether currently on an empty line
    empty_lines: usize,  // number of empty lines seen but not yet written
    written: bool,  // whether any output has been produced
}

impl BodyCanonicalizer {
    pub fn new() -> Self {
        Self {
            state: CanonState::Init,
            blank_line: true,
            empty_lines: 0,
            written: false,
        }
    }

    pub fn canonicalize_chunk(&mut self, bytes: &[u8]) -> Vec<u8> {
        let mut result = Vec::with_capacity(bytes.len());

        for &b in bytes {
            match self.state {
                CanonState::Init | CanonState::LineEnd | CanonState::Byte => {
                    if b == CR {
                        self.state = CanonState::Cr;
                    } else if b == LF {
                        self.end_line(&mut result);
                    } else {
                        self.flush_empty_lines(&mut result);
                        result.push(b);
                        self.state = CanonState::Byte;
                    }
                }
                CanonState::Cr => {
                    if b == LF {
                        self.end_line(&mut result);
                        continue;
                    }

                    // stray CR is content
                    self.flush_empty_lines(&mut result);
                    result.push(CR);

                    if b != CR {
                        result.push(b);
                        self.state = CanonState::Byte;
                    }
                }
            }
        }

        result
    }

    pub fn finish(mut self) -> Vec<u8> {
        let mut result = vec![];

        match self.state {
            CanonState::Init | CanonState::LineEnd => {
                // empty body, or only empty lines: canonical form is CRLF
                if !self.written {
                    result.extend(CRLF);
                }
            }
            CanonState::Cr => {
                self.flush_empty_lines(&mut result);
                result.push(CR);
                result.extend(CRLF);  // body needs final CRLF
            }
            CanonState::Byte => result.extend(CRLF),  // body needs final CRLF
        }

        result
    }

    fn end_line(&mut self, result: &mut Vec<u8>) {
        if self.blank_line {
            self.empty_lines += 1;
        } else {
            result.extend(CRLF);
            self.blank_line = true;
        }
        self.state = CanonState::LineEnd;
    }

    // write out remembered empty lines after encountering/before processing
    // byte that ends a section of empty lines
    fn flush_empty_lines(&mut self, result: &mut Vec<u8>) {
        for _ in 0..self.empty_lines {
            result.extend(CRLF);
        }
        self.empty_lines = 0;
        self.blank_line = false;
        self.written = true;
    }
}

impl Default for BodyCanonicalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonicalizes a complete body with the *simple* algorithm.
pub fn canonicalize_body(body: &[u8]) -> Vec<u8> {
    let mut bc = BodyCanonicalizer::new();
    let mut result = bc.canonicalize_chunk(body);
    result.extend(bc.finish());
    result
}

/// Produces the relaxed canonicalization of the given header fields, in the
/// order given, each terminated with CRLF.
pub fn canonicalize_headers<'a, I>(headers: I) -> Vec<u8>
where
    I: IntoIterator<Item = (&'a FieldName, &'a FieldBody)>,
{
    let mut result = vec![];

    for (name, value) in headers {
        canonicalize_header(&mut result, name, value);
        result.extend(CRLF);
    }

    result
}

/// Canonicalizes a header field into some result vector, using the relaxed
/// algorithm. No line terminator is written.
pub fn canonicalize_header(
    result: &mut Vec<u8>,
    name: impl AsRef<str>,
    value: impl AsRef<[u8]>,
) {
    result.extend(name.as_ref().trim_end().to_ascii_lowercase().bytes());
    result.push(b':');
    canonicalize_header_value(result, value.as_ref());
}

fn canonicalize_header_value(result: &mut Vec<u8>, value: &[u8]) {
    fn is_space(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\r' | '\n')
    }

    // unfolding and compressing in one: a run of WSP and line breaks becomes
    // a single SP, leading and trailing runs are dropped
    let value = value.trim_with(is_space);

    let mut compressing = false;
    for &b in value {
        if is_space(b.into()) {
            if !compressing {
                result.push(SP);
                compressing = true;
            }
        } else {
            result.push(b);
            compressing = false;
        }
    }
}

/// Canonicalizes a complete header block with the relaxed algorithm. The
/// canonicalized fields are joined with CRLF, without a final CRLF.
pub fn canonicalize_header_block(block: &str) -> Result<Vec<u8>, ParseHeaderError> {
    let headers = HeaderFields::from_str(block)?;

    let mut result = canonicalize_headers(headers.as_ref().iter().map(|(n, v)| (n, v)));
    if result.ends_with(&CRLF) {
        result.truncate(result.len() - 2);
    }

    Ok(result)
}

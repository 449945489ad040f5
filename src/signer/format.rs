// dkimsig – DKIM signing of outgoing email
// Copyright © 2022–2023 David Bürgin <dbuergin@gluet.ch>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.

use crate::{
    header::FieldName,
    quoted_printable,
    signature::{
        DkimSignature, DomainName, Identity, Selector, SignatureAlgorithm, CANONICALIZATION,
        QUERY_METHOD,
    },
    util::{self, CanonicalStr},
};
use std::{fmt::Write, iter};

pub const LINE_WIDTH: usize = 78;

const FOLD: &str = "\r\n\t";

/// DKIM signature data that does not yet have a cryptographic signature.
#[derive(Clone, Debug)]
pub struct UnsignedDkimSignature {
    pub algorithm: SignatureAlgorithm,
    pub body_hash: Box<[u8]>,
    pub domain: DomainName,
    pub signed_headers: Box<[FieldName]>,
    pub identity: Option<Identity>,
    pub body_length: usize,
    pub selector: Selector,
    pub timestamp: u64,
    pub copied_headers: Box<[(FieldName, Box<[u8]>)]>,
}

impl UnsignedDkimSignature {
    /// Returns the formatted header value, ending with an empty *b=* tag.
    ///
    /// The value starts right after the colon of the header name, so that
    /// `name + ":" + value` is the complete header field.
    pub fn format_without_signature(&self) -> String {
        let mut out = String::new();

        write!(
            out,
            " v=1; a={}; q={QUERY_METHOD}; l={}; s={};",
            self.algorithm.canonical_str(),
            self.body_length,
            self.selector,
        )
        .unwrap();

        write!(out, "{FOLD}t={}; c={CANONICALIZATION};", self.timestamp).unwrap();

        out.push_str(FOLD);
        out.push_str("h=");
        for (n, name) in self.signed_headers.iter().enumerate() {
            if n > 0 {
                out.push(':');
            }
            out.push_str(name.as_ref());
        }
        out.push(';');

        write!(out, "{FOLD}d={};", self.domain).unwrap();

        if let Some(identity) = &self.identity {
            let identity = quoted_printable::encode(identity.to_string().as_bytes());
            write!(out, " i={identity};").unwrap();
        }

        if !self.copied_headers.is_empty() {
            format_tag_z(&mut out, &self.copied_headers);
        }

        write!(out, "{FOLD}bh={};", util::encode_base64(&self.body_hash)).unwrap();

        out.push_str(FOLD);
        out.push_str("b=");

        out
    }

    pub fn into_signature(self, signature_data: Box<[u8]>) -> DkimSignature {
        DkimSignature {
            algorithm: self.algorithm,
            signature_data,
            body_hash: self.body_hash,
            domain: self.domain,
            signed_headers: self.signed_headers,
            identity: self.identity,
            body_length: self.body_length,
            selector: self.selector,
            timestamp: self.timestamp,
            copied_headers: self.copied_headers,
        }
    }
}

// Note: `i` is the cursor in the current line, counted in characters, with the
// indenting tab counting as one.

fn format_tag_z(out: &mut String, value: &[(FieldName, Box<[u8]>)]) {
    for (n, (name, val)) in value.iter().enumerate() {
        out.push_str(FOLD);

        let mut i = if n == 0 {
            out.push_str("z=");
            3
        } else {
            out.push('|');
            2
        };

        let mut field = Vec::with_capacity(name.as_ref().len() + 1 + val.len());
        field.extend(name.as_ref().bytes());
        field.push(b':');
        field.extend(val.iter());

        let encoded = quoted_printable::encode(&field);
        format_qp_chunks_into_string(out, &mut i, &encoded);
    }

    out.push(';');
}

/// Writes a DKIM-Quoted-Printable string, folding it between encoded tokens so
/// that no `=XX` escape is split across lines.
fn format_qp_chunks_into_string(out: &mut String, i: &mut usize, s: &str) {
    let mut rest = s;

    while !rest.is_empty() {
        let len = if rest.starts_with('=') { 3.min(rest.len()) } else { 1 };
        let token;
        (token, rest) = rest.split_at(len);

        if *i + len > LINE_WIDTH {
            out.push_str(FOLD);
            *i = 1;
        }

        out.push_str(token);
        *i += len;
    }
}

fn format_chunks_into_string(out: &mut String, i: &mut usize, mut s: &str) {
    debug_assert!(s.is_ascii());

    let first_chunk_len = LINE_WIDTH.saturating_sub(*i).min(s.len());

    if first_chunk_len > 0 {
        let first_chunk;
        (first_chunk, s) = s.split_at(first_chunk_len);
        out.push_str(first_chunk);
        *i += first_chunk_len;
    }

    let chunk_width = LINE_WIDTH - 1;
    let chunks = iter::from_fn(|| {
        if s.is_empty() {
            None
        } else {
            let chunk;
            (chunk, s) = s.split_at(chunk_width.min(s.len()));
            Some(chunk)
        }
    });

    for chunk in chunks {
        out.push_str(FOLD);
        out.push_str(chunk);
        *i = chunk.len() + 1;
    }
}

/// Appends the Base64-encoded signature data to a header value produced by
/// `format_without_signature`, folding at the line width.
pub fn insert_signature_data(formatted_value: &mut String, signature_data: &[u8]) {
    let s = util::encode_base64(signature_data);

    // the value always ends with the line "\tb="
    let mut i = match formatted_value.rsplit_once(FOLD) {
        Some((_, last_line)) => last_line.len() + 1,
        None => formatted_value.len(),
    };

    format_chunks_into_string(formatted_value, &mut i, &s);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_signature() -> UnsignedDkimSignature {
        UnsignedDkimSignature {
            algorithm: SignatureAlgorithm::RsaSha256,
            body_hash: Box::from(*b"0123456789"),
            domain: DomainName::new("example.com").unwrap(),
            signed_headers: ["From", "To", "Subject"]
                .into_iter()
                .map(|n| FieldName::new(n).unwrap())
                .collect(),
            identity: None,
            body_length: 42,
            selector: Selector::new("sel1").unwrap(),
            timestamp: 1700000000,
            copied_headers: vec![
                copied("From", " a@example.com"),
                copied("To", " b@example.org"),
                copied("Subject", " Hi"),
            ]
            .into(),
        }
    }

    fn copied(name: &str, value: &str) -> (FieldName, Box<[u8]>) {
        (FieldName::new(name).unwrap(), value.as_bytes().into())
    }

    #[test]
    fn format_without_signature_ok() {
        let sig = example_signature();

        assert_eq!(
            sig.format_without_signature(),
            " v=1; a=rsa-sha256; q=dns/txt; l=42; s=sel1;\r\n\
             \tt=1700000000; c=relaxed/simple;\r\n\
             \th=From:To:Subject;\r\n\
             \td=example.com;\r\n\
             \tz=From:=20a@example.com\r\n\
             \t|To:=20b@example.org\r\n\
             \t|Subject:=20Hi;\r\n\
             \tbh=MDEyMzQ1Njc4OQ==;\r\n\
             \tb="
        );
    }

    #[test]
    fn format_without_signature_identity() {
        let mut sig = example_signature();
        sig.identity = Some(Identity::new("joe=x@mail.example.com").unwrap());

        let value = sig.format_without_signature();

        assert!(value.contains("\r\n\td=example.com; i=joe=3Dx@mail.example.com;\r\n\tz="));
    }

    #[test]
    fn format_tag_z_folds_between_tokens() {
        let mut out = String::new();
        let value = [copied("Subject", &" x".repeat(40))];

        format_tag_z(&mut out, &value);

        for line in out.split("\r\n").skip(1) {
            // tab counts as one column; the final ; may exceed the width
            assert!(line.trim_end_matches(';').len() <= LINE_WIDTH);
            assert!(!line.ends_with('=') && !line.ends_with("=2"));
        }

        let unfolded: String = out.split("\r\n\t").collect();
        assert_eq!(unfolded, format!("z=Subject:{};", "=20x".repeat(40)));
    }

    #[test]
    fn insert_signature_data_folds() {
        let mut value = String::from(" v=1;\r\n\tb=");
        let data = [0xab; 256];

        insert_signature_data(&mut value, &data);

        let lines: Vec<_> = value.split("\r\n").collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1].len(), LINE_WIDTH);
        assert!(lines[1..].iter().all(|l| l.len() <= LINE_WIDTH && l.starts_with('\t')));

        let b: String = lines[1..].iter().map(|l| l.trim_start()).collect();
        assert_eq!(b, format!("b={}", util::encode_base64(data)));
    }

    #[test]
    fn insert_signature_data_short() {
        let mut value = String::from(" v=1;\r\n\tb=");

        insert_signature_data(&mut value, b"sig");

        assert_eq!(value, " v=1;\r\n\tb=c2ln");
    }
}

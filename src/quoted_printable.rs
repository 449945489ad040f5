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

//! DKIM-Quoted-Printable encoding.
//!
//! See RFC 6376, section 2.11. The encoding is used for the copied header
//! fields in the *z=* tag and for the *i=* tag. It does not take part in
//! canonicalization.

use std::fmt::Write;

/// Encodes bytes as a DKIM-Quoted-Printable string.
///
/// Only the bytes 0x21–0x3A, 0x3C, and 0x3E–0x7E pass through unchanged,
/// except for the vertical bar `|`, which separates the copied header fields
/// in the *z=* tag. All other bytes are written as `=XX` with uppercase hex
/// digits.
pub fn encode(bytes: &[u8]) -> String {
    let mut result = String::with_capacity(bytes.len());

    for &b in bytes {
        if is_dkim_safe_byte(b) && b != b'|' {
            result.push(char::from(b));
        } else {
            write!(result, "={b:02X}").unwrap();
        }
    }

    result
}

fn is_dkim_safe_byte(b: u8) -> bool {
    // printable ASCII without ; and =
    matches!(b, b'!'..=b':' | b'<' | b'>'..=b'~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_bar() {
        assert_eq!(encode(b"A|B"), "A=7CB");
    }

    #[test]
    fn encode_basic() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(b"abc|; d\xfe=e"), "abc=7C=3B=20d=FE=3De");
        assert_eq!(encode("Grüße".as_bytes()), "Gr=C3=BC=C3=9Fe");
    }

    #[test]
    fn encode_header_copy() {
        let example = b"Subject: Is dinner ready?\r\n\t(yes)";
        assert_eq!(
            encode(example),
            "Subject:=20Is=20dinner=20ready?=0D=0A=09(yes)"
        );
    }

    #[test]
    fn encode_safe_range() {
        for b in 0..=u8::MAX {
            let s = encode(&[b]);
            let passes = matches!(b, 0x21..=0x3a | 0x3c | 0x3e..=0x7b | 0x7d..=0x7e);
            if passes {
                assert_eq!(s, char::from(b).to_string());
            } else {
                assert_eq!(s, format!("={b:02X}"));
            }
        }
    }
}

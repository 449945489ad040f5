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

//! A library for producing *DomainKeys Identified Mail* (DKIM) signatures for
//! outgoing email, as described in [RFC 6376].
//!
//! A signature covers the *From*, *To*, and *Subject* header fields and the
//! message body. Header fields are canonicalized with the *relaxed* algorithm,
//! the body with the *simple* algorithm. Copies of the signed header fields
//! are included in the *z=* tag for diagnostic purposes.
//!
//! The high-level API is the [`Signer`], configured once with a validated
//! [`SigningIdentity`] and then used for any number of messages, also
//! concurrently. The low-level building blocks (canonicalization,
//! DKIM-Quoted-Printable encoding, body hashing, cryptography) are available
//! in their own modules.
//!
//! # Usage
//!
//! ```no_run
//! use dkimsig::{Signer, SigningConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SigningConfig {
//!     private_key: std::fs::read_to_string("private.pem")?,
//!     public_key: std::fs::read_to_string("public.pem")?,
//!     domain: "example.com".into(),
//!     selector: "mail".into(),
//!     ..Default::default()
//! };
//!
//! let signer = Signer::from_config(&config)?;
//!
//! let headers = "From: me@example.com\r\nTo: you@example.org\r\n";
//! let result = signer.sign(headers, "Hello", b"Hello!\r\n")?;
//!
//! let signed_headers = result.prepend_to(headers);
//! # let _ = signed_headers;
//! # Ok(())
//! # }
//! ```
//!
//! # Cargo features
//!
//! The feature **`serde`** makes [`SigningConfig`] and [`SignatureAlgorithm`]
//! deserializable, so that the configuration can be read from the host
//! application’s configuration file.
//!
//! The feature **`pre-rfc8301`** reverts cryptographic algorithm and key usage
//! back to before [RFC 8301]: it lowers the minimum RSA key size to 512 bits,
//! and enables dependency `sha1` and thereby the insecure, historic *rsa-sha1*
//! signature algorithm. This is a legacy compatibility feature, its use is
//! strongly discouraged.
//!
//! [RFC 6376]: https://www.rfc-editor.org/rfc/rfc6376
//! [RFC 8301]: https://www.rfc-editor.org/rfc/rfc8301

pub mod body_hash;
pub mod canonicalize;
pub mod crypto;
pub mod error;
pub mod header;
pub mod identity;
pub mod message;
pub mod quoted_printable;
pub mod signature;
pub mod signer;
mod util;

pub use crate::{
    crypto::{SigningKey, VerifyingKey},
    error::{ConfigurationError, SignerError, ValidationError},
    header::{FieldBody, FieldName, HeaderField, HeaderFields},
    identity::{SigningConfig, SigningIdentity},
    message::RawMessage,
    signature::{DkimSignature, DomainName, Identity, Selector, SignatureAlgorithm},
    signer::{Signer, SigningResult, Timestamp},
    util::{encode_base64, CanonicalStr},
};

//! DKIM signature.

mod names;

pub use names::{DomainName, Identity, ParseDomainError, ParseSelectorError, Selector};

use crate::{
    crypto::{HashAlgorithm, KeyType},
    header::FieldName,
    util::{self, CanonicalStr},
};
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The name of the DKIM-Signature header field.
pub const DKIM_SIGNATURE_NAME: &str = "DKIM-Signature";

/// The query method, as used in the *q=* tag.
pub const QUERY_METHOD: &str = "dns/txt";

/// The canonicalization, as used in the *c=* tag: *relaxed* for the header,
/// *simple* for the body.
pub const CANONICALIZATION: &str = "relaxed/simple";

/// The header fields that are signed, in signing order.
pub const SIGNED_HEADERS: [&str; 3] = ["From", "To", "Subject"];

/// A signature algorithm.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum SignatureAlgorithm {
    /// The *rsa-sha256* signature algorithm.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "rsa-sha256"))]
    RsaSha256,
    /// The *ed25519-sha256* signature algorithm (RFC 8463).
    #[cfg_attr(feature = "serde", serde(rename = "ed25519-sha256"))]
    Ed25519Sha256,
    /// The historic *rsa-sha1* signature algorithm.
    #[cfg(feature = "pre-rfc8301")]
    #[cfg_attr(feature = "serde", serde(rename = "rsa-sha1"))]
    RsaSha1,
}

impl SignatureAlgorithm {
    /// Returns this signature algorithm’s key type.
    pub fn key_type(self) -> KeyType {
        match self {
            Self::RsaSha256 => KeyType::Rsa,
            Self::Ed25519Sha256 => KeyType::Ed25519,
            #[cfg(feature = "pre-rfc8301")]
            Self::RsaSha1 => KeyType::Rsa,
        }
    }

    /// Returns this signature algorithm’s hash algorithm.
    pub fn hash_algorithm(self) -> HashAlgorithm {
        match self {
            Self::RsaSha256 | Self::Ed25519Sha256 => HashAlgorithm::Sha256,
            #[cfg(feature = "pre-rfc8301")]
            Self::RsaSha1 => HashAlgorithm::Sha1,
        }
    }
}

impl CanonicalStr for SignatureAlgorithm {
    fn canonical_str(&self) -> &'static str {
        match self {
            Self::RsaSha256 => "rsa-sha256",
            Self::Ed25519Sha256 => "ed25519-sha256",
            #[cfg(feature = "pre-rfc8301")]
            Self::RsaSha1 => "rsa-sha1",
        }
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_str())
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ParseAlgorithmError;

impl Display for ParseAlgorithmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "unknown signature algorithm")
    }
}

impl Error for ParseAlgorithmError {}

impl FromStr for SignatureAlgorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rsa-sha256" => Ok(Self::RsaSha256),
            "ed25519-sha256" => Ok(Self::Ed25519Sha256),
            #[cfg(feature = "pre-rfc8301")]
            "rsa-sha1" => Ok(Self::RsaSha1),
            _ => Err(ParseAlgorithmError),
        }
    }
}

/// A complete DKIM signature, as produced by the signer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DkimSignature {
    pub algorithm: SignatureAlgorithm,
    pub signature_data: Box<[u8]>,
    pub body_hash: Box<[u8]>,
    pub domain: DomainName,
    pub signed_headers: Box<[FieldName]>,
    pub identity: Option<Identity>,
    pub body_length: usize,
    pub selector: Selector,
    pub timestamp: u64,
    pub copied_headers: Box<[(FieldName, Box<[u8]>)]>,
}

impl DkimSignature {
    /// The Base64-encoded signature data, as in the *b=* tag.
    pub fn signature_data_base64(&self) -> String {
        util::encode_base64(&self.signature_data)
    }

    /// The Base64-encoded body hash, as in the *bh=* tag.
    pub fn body_hash_base64(&self) -> String {
        util::encode_base64(&self.body_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_algorithm_default() {
        assert_eq!(SignatureAlgorithm::default(), SignatureAlgorithm::RsaSha256);
        assert_eq!(SignatureAlgorithm::default().to_string(), "rsa-sha256");
    }

    #[test]
    fn signature_algorithm_from_str() {
        assert_eq!("rsa-sha256".parse(), Ok(SignatureAlgorithm::RsaSha256));
        assert_eq!("Ed25519-SHA256".parse(), Ok(SignatureAlgorithm::Ed25519Sha256));
        assert_eq!("rsa-sha512".parse::<SignatureAlgorithm>(), Err(ParseAlgorithmError));
    }

    #[test]
    fn signature_algorithm_components() {
        let alg = SignatureAlgorithm::Ed25519Sha256;

        assert_eq!(alg.key_type(), KeyType::Ed25519);
        assert_eq!(alg.hash_algorithm(), HashAlgorithm::Sha256);
    }

    #[cfg(feature = "pre-rfc8301")]
    #[test]
    fn signature_algorithm_rsa_sha1() {
        assert_eq!("rsa-sha1".parse(), Ok(SignatureAlgorithm::RsaSha1));
        assert_eq!(SignatureAlgorithm::RsaSha1.hash_algorithm(), HashAlgorithm::Sha1);
    }
}

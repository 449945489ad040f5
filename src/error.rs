//! Error types.

use crate::{
    crypto::{KeyError, KeyType, SigningError},
    header::ParseHeaderError,
    signature::SignatureAlgorithm,
};
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// An error that occurs when setting up a signing identity.
///
/// These errors are detected once, before any message is signed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigurationError {
    MissingPrivateKey,
    MissingPublicKey,
    InvalidPrivateKey(KeyError),
    InvalidPublicKey(KeyError),
    KeyPairMismatch,
    IncompatibleKeyType {
        algorithm: SignatureAlgorithm,
        key_type: KeyType,
    },
    InsufficientKeySize {
        bits: usize,
        min_bits: usize,
    },
    InvalidDomain,
    InvalidSelector,
    InvalidIdentity,
    IdentityOutsideDomain,
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPrivateKey => write!(f, "no private key configured"),
            Self::MissingPublicKey => write!(f, "no public key configured"),
            Self::InvalidPrivateKey(_) => write!(f, "could not read private key"),
            Self::InvalidPublicKey(_) => write!(f, "could not read public key"),
            Self::KeyPairMismatch => write!(f, "public key does not belong to private key"),
            Self::IncompatibleKeyType { algorithm, key_type } => {
                write!(f, "{key_type} key cannot be used with algorithm {algorithm}")
            }
            Self::InsufficientKeySize { bits, min_bits } => {
                write!(f, "key size {bits} below minimum of {min_bits} bits")
            }
            Self::InvalidDomain => write!(f, "invalid signing domain"),
            Self::InvalidSelector => write!(f, "invalid selector"),
            Self::InvalidIdentity => write!(f, "invalid agent or user identifier"),
            Self::IdentityOutsideDomain => {
                write!(f, "identity domain is not the signing domain or a subdomain of it")
            }
        }
    }
}

impl Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPrivateKey(e) | Self::InvalidPublicKey(e) => Some(e),
            _ => None,
        }
    }
}

/// An error that occurs when the message to sign is not acceptable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationError {
    MissingFromHeader,
    MissingToHeader,
    MalformedHeader(ParseHeaderError),
    /// The subject cannot be used as a header field value.
    InvalidSubject,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFromHeader => write!(f, "message has no From header"),
            Self::MissingToHeader => write!(f, "message has no To header"),
            Self::MalformedHeader(e) => write!(f, "malformed header: {e}"),
            Self::InvalidSubject => write!(f, "subject contains line breaks"),
        }
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedHeader(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseHeaderError> for ValidationError {
    fn from(error: ParseHeaderError) -> Self {
        Self::MalformedHeader(error)
    }
}

/// An error that occurs when using a [`Signer`][crate::signer::Signer].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SignerError {
    Configuration(ConfigurationError),
    Validation(ValidationError),
    Signing(SigningError),
}

impl Display for SignerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(_) => write!(f, "configuration error"),
            Self::Validation(_) => write!(f, "invalid message"),
            Self::Signing(_) => write!(f, "signing error"),
        }
    }
}

impl Error for SignerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::Validation(e) => Some(e),
            Self::Signing(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for SignerError {
    fn from(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }
}

impl From<ValidationError> for SignerError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl From<SigningError> for SignerError {
    fn from(error: SigningError) -> Self {
        Self::Signing(error)
    }
}

impl From<ParseHeaderError> for SignerError {
    fn from(error: ParseHeaderError) -> Self {
        Self::Validation(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::ParseHeaderErrorKind;

    #[test]
    fn signer_error_source_chain() {
        let parse_error = ParseHeaderError {
            line: 3,
            kind: ParseHeaderErrorKind::MissingColon,
        };

        let error = SignerError::from(parse_error);

        assert_eq!(error, SignerError::Validation(ValidationError::MalformedHeader(parse_error)));

        let source = error.source().unwrap();
        assert_eq!(source.to_string(), "malformed header: line 3: header field without colon");
        assert!(source.source().is_some());
    }

    #[test]
    fn configuration_error_display() {
        let error = ConfigurationError::IncompatibleKeyType {
            algorithm: SignatureAlgorithm::Ed25519Sha256,
            key_type: KeyType::Rsa,
        };

        assert_eq!(error.to_string(), "rsa key cannot be used with algorithm ed25519-sha256");
        assert!(error.source().is_none());

        let error = ConfigurationError::InvalidPrivateKey(KeyError::InvalidPem);
        assert_eq!(error.source().unwrap().to_string(), "not a PEM key document");
    }
}

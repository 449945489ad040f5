//! Cryptographic utilities.
//!
//! Private keys are read from PEM text, either in PKCS#8 format (RSA or
//! Ed25519, label `PRIVATE KEY`) or in PKCS#1 format (RSA only, label `RSA
//! PRIVATE KEY`, what `openssl genrsa` used to produce). Public keys are read
//! in SubjectPublicKeyInfo format (label `PUBLIC KEY`) or in PKCS#1 format
//! (label `RSA PUBLIC KEY`).

mod ed25519;
mod hash;
mod rsa;

pub use self::{
    ed25519::sign_ed25519,
    hash::{digest, CountingHasher},
    rsa::{rsa_key_size, sign_rsa},
};

use crate::util::CanonicalStr;
use ::rsa::{
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey},
    RsaPrivateKey, RsaPublicKey,
};
use ed25519_dalek::{SigningKey as Ed25519SigningKey, VerifyingKey as Ed25519VerifyingKey};
use pkcs8::{der::pem::PemLabel, DecodePublicKey, Document, PrivateKeyInfo};
use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
};
use tracing::trace;

const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";
const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
const RSA_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";

/// A private key used for signing.
pub enum SigningKey {
    Rsa(RsaPrivateKey),
    Ed25519(Ed25519SigningKey),
}

impl SigningKey {
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::Rsa(_) => KeyType::Rsa,
            Self::Ed25519(_) => KeyType::Ed25519,
        }
    }

    /// Reads a private key from PEM text.
    pub fn from_pem(s: &str) -> Result<Self, KeyError> {
        let (label, der) = Document::from_pem(s.trim()).map_err(|_| KeyError::InvalidPem)?;

        if PrivateKeyInfo::validate_pem_label(label).is_ok() {
            // lightweight (could be Copy), therefore clonable:
            let pk = PrivateKeyInfo::try_from(der.as_bytes())
                .map_err(|_| KeyError::InvalidKeyData)?;

            if let Ok(rpk) = RsaPrivateKey::try_from(pk.clone()) {
                Ok(Self::Rsa(rpk))
            } else if let Ok(esk) = Ed25519SigningKey::try_from(pk) {
                Ok(Self::Ed25519(esk))
            } else {
                Err(KeyError::UnsupportedKeyType)
            }
        } else if label == RSA_PRIVATE_KEY_LABEL {
            RsaPrivateKey::from_pkcs1_der(der.as_bytes())
                .map(Self::Rsa)
                .map_err(|_| KeyError::InvalidKeyData)
        } else {
            Err(KeyError::InvalidPem)
        }
    }

    /// Returns the public key belonging to this private key.
    pub fn to_verifying_key(&self) -> VerifyingKey {
        match self {
            Self::Rsa(k) => VerifyingKey::Rsa(RsaPublicKey::from(k)),
            Self::Ed25519(k) => VerifyingKey::Ed25519(k.verifying_key()),
        }
    }

    /// Returns the key size in bits, if applicable to the key type.
    pub fn key_size(&self) -> Option<usize> {
        match self {
            Self::Rsa(k) => Some(rsa_key_size(k)),
            Self::Ed25519(_) => None,
        }
    }

    /// Signs the hash of the data to be signed.
    pub fn sign_hash(&self, hash_alg: HashAlgorithm, data_hash: &[u8]) -> Result<Vec<u8>, SigningError> {
        match self {
            Self::Rsa(k) => match sign_rsa(hash_alg, k, data_hash) {
                Ok(s) => {
                    trace!("RSA signing successful");
                    Ok(s)
                }
                Err(e) => {
                    trace!("RSA signing failed: {e}");
                    Err(e)
                }
            },
            Self::Ed25519(k) => match sign_ed25519(k, data_hash) {
                Ok(s) => {
                    trace!("Ed25519 signing successful");
                    Ok(s)
                }
                Err(e) => {
                    trace!("Ed25519 signing failed: {e}");
                    Err(e)
                }
            },
        }
    }
}

// never print key material
impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa(_) => write!(f, "SigningKey::Rsa(..)"),
            Self::Ed25519(_) => write!(f, "SigningKey::Ed25519(..)"),
        }
    }
}

impl AsRef<SigningKey> for SigningKey {
    fn as_ref(&self) -> &SigningKey {
        self
    }
}

/// A public key, used only to check the configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VerifyingKey {
    Rsa(RsaPublicKey),
    Ed25519(Ed25519VerifyingKey),
}

impl VerifyingKey {
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::Rsa(_) => KeyType::Rsa,
            Self::Ed25519(_) => KeyType::Ed25519,
        }
    }

    /// Reads a public key from PEM text.
    pub fn from_pem(s: &str) -> Result<Self, KeyError> {
        let (label, der) = Document::from_pem(s.trim()).map_err(|_| KeyError::InvalidPem)?;

        if label == PUBLIC_KEY_LABEL {
            let key_data = der.as_bytes();
            if let Ok(k) = RsaPublicKey::from_public_key_der(key_data) {
                Ok(Self::Rsa(k))
            } else if let Ok(k) = Ed25519VerifyingKey::from_public_key_der(key_data) {
                Ok(Self::Ed25519(k))
            } else {
                Err(KeyError::UnsupportedKeyType)
            }
        } else if label == RSA_PUBLIC_KEY_LABEL {
            RsaPublicKey::from_pkcs1_der(der.as_bytes())
                .map(Self::Rsa)
                .map_err(|_| KeyError::InvalidKeyData)
        } else {
            Err(KeyError::InvalidPem)
        }
    }

    /// Whether this is the public key belonging to the given private key.
    pub fn matches(&self, signing_key: &SigningKey) -> bool {
        *self == signing_key.to_verifying_key()
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeyType {
    Rsa,
    Ed25519,
}

impl CanonicalStr for KeyType {
    fn canonical_str(&self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::Ed25519 => "ed25519",
        }
    }
}

impl Display for KeyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HashAlgorithm {
    Sha256,
    #[cfg(feature = "pre-rfc8301")]
    Sha1,
}

impl CanonicalStr for HashAlgorithm {
    fn canonical_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            #[cfg(feature = "pre-rfc8301")]
            Self::Sha1 => "sha1",
        }
    }
}

/// An error that occurs when reading a key from PEM text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeyError {
    InvalidPem,
    InvalidKeyData,
    UnsupportedKeyType,
}

impl Display for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPem => write!(f, "not a PEM key document"),
            Self::InvalidKeyData => write!(f, "invalid key data"),
            Self::UnsupportedKeyType => write!(f, "unsupported key type"),
        }
    }
}

impl Error for KeyError {}

/// An error that occurs when the signing primitive fails.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SigningError {
    SigningFailure,
}

impl Display for SigningError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SigningFailure => write!(f, "failed to compute signature"),
        }
    }
}

impl Error for SigningError {}

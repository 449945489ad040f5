//! Signing identity and its configuration.

use crate::{
    crypto::{SigningKey, VerifyingKey},
    error::ConfigurationError,
    signature::{DomainName, Identity, Selector, SignatureAlgorithm},
};
use std::fmt::{self, Debug, Formatter};
use tracing::debug;

/// The minimum accepted RSA key size in bits.
#[cfg(not(feature = "pre-rfc8301"))]
pub const MIN_RSA_KEY_BITS: usize = 1024;
/// The minimum accepted RSA key size in bits.
#[cfg(feature = "pre-rfc8301")]
pub const MIN_RSA_KEY_BITS: usize = 512;

/// Signing configuration, as supplied by the host application.
///
/// Keys are given as PEM text. An empty key counts as not configured.
#[derive(Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SigningConfig {
    pub private_key: String,
    pub public_key: String,
    pub domain: String,
    pub selector: String,
    pub identity: Option<String>,
    pub algorithm: SignatureAlgorithm,
}

// never print key material
impl Debug for SigningConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("private_key", &"..")
            .field("public_key", &"..")
            .field("domain", &self.domain)
            .field("selector", &self.selector)
            .field("identity", &self.identity)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// A validated, immutable signing identity.
///
/// A signing identity is created once and then shared read-only, usually as
/// an `Arc<SigningIdentity>`, by all signing calls.
#[derive(Debug)]
pub struct SigningIdentity {
    domain: DomainName,
    selector: Selector,
    identity: Option<Identity>,
    algorithm: SignatureAlgorithm,
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl SigningIdentity {
    /// Creates a signing identity from already parsed parts.
    ///
    /// # Errors
    ///
    /// Fails if the keys do not fit the algorithm or each other, or if the
    /// identity is not in the signing domain.
    pub fn new(
        domain: DomainName,
        selector: Selector,
        identity: Option<Identity>,
        algorithm: SignatureAlgorithm,
        signing_key: SigningKey,
        verifying_key: VerifyingKey,
    ) -> Result<Self, ConfigurationError> {
        let key_type = signing_key.key_type();
        if key_type != algorithm.key_type() {
            return Err(ConfigurationError::IncompatibleKeyType { algorithm, key_type });
        }

        if let Some(bits) = signing_key.key_size() {
            if bits < MIN_RSA_KEY_BITS {
                return Err(ConfigurationError::InsufficientKeySize {
                    bits,
                    min_bits: MIN_RSA_KEY_BITS,
                });
            }
        }

        if !verifying_key.matches(&signing_key) {
            return Err(ConfigurationError::KeyPairMismatch);
        }

        if let Some(identity) = &identity {
            if !identity.domain_part.eq_or_subdomain_of(&domain) {
                return Err(ConfigurationError::IdentityOutsideDomain);
            }
        }

        debug!(%domain, %selector, %algorithm, "signing identity configured");

        Ok(Self {
            domain,
            selector,
            identity,
            algorithm,
            signing_key,
            verifying_key,
        })
    }

    /// Validates the given configuration and creates a signing identity.
    ///
    /// # Errors
    ///
    /// Missing keys are reported first, before any other problem.
    pub fn from_config(config: &SigningConfig) -> Result<Self, ConfigurationError> {
        if config.private_key.trim().is_empty() {
            return Err(ConfigurationError::MissingPrivateKey);
        }
        if config.public_key.trim().is_empty() {
            return Err(ConfigurationError::MissingPublicKey);
        }

        let signing_key = SigningKey::from_pem(&config.private_key)
            .map_err(ConfigurationError::InvalidPrivateKey)?;
        let verifying_key = VerifyingKey::from_pem(&config.public_key)
            .map_err(ConfigurationError::InvalidPublicKey)?;

        let domain =
            DomainName::new(&config.domain).map_err(|_| ConfigurationError::InvalidDomain)?;
        let selector =
            Selector::new(&config.selector).map_err(|_| ConfigurationError::InvalidSelector)?;

        let identity = match &config.identity {
            Some(identity) => {
                Some(Identity::new(identity).map_err(|_| ConfigurationError::InvalidIdentity)?)
            }
            None => None,
        };

        Self::new(domain, selector, identity, config.algorithm, signing_key, verifying_key)
    }

    pub fn domain(&self) -> &DomainName {
        &self.domain
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// The public key, as published in DNS by the host.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

use crate::crypto::{HashAlgorithm, SigningError};
use rsa::{traits::PublicKeyParts, Pkcs1v15Sign, RsaPrivateKey};
use sha2::Sha256;
#[cfg(feature = "pre-rfc8301")]
use sha1::Sha1;

/// Returns the RSA key size in bits.
pub fn rsa_key_size(k: &impl PublicKeyParts) -> usize {
    k.size() * 8
}

/// Produces an RSASSA-PKCS1-v1_5 signature over the given hash.
pub fn sign_rsa(
    hash_alg: HashAlgorithm,
    private_key: &RsaPrivateKey,
    data_hash: &[u8],
) -> Result<Vec<u8>, SigningError> {
    let result = match hash_alg {
        HashAlgorithm::Sha256 => private_key.sign(Pkcs1v15Sign::new::<Sha256>(), data_hash),
        #[cfg(feature = "pre-rfc8301")]
        HashAlgorithm::Sha1 => private_key.sign(Pkcs1v15Sign::new::<Sha1>(), data_hash),
    };

    result.map_err(|_| SigningError::SigningFailure)
}

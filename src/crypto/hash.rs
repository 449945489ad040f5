use crate::crypto::HashAlgorithm;
use digest::DynDigest;
use sha2::Sha256;
#[cfg(feature = "pre-rfc8301")]
use sha1::Sha1;

/// Computes the digest of the given bytes.
pub fn digest(hash_alg: HashAlgorithm, bytes: &[u8]) -> Box<[u8]> {
    let mut hasher = CountingHasher::new(hash_alg);
    hasher.update(bytes);
    hasher.finish().0
}

/// A hasher that keeps count of the number of bytes digested.
pub struct CountingHasher {
    digest: Box<dyn DynDigest + Send>,
    bytes_written: usize,
}

impl CountingHasher {
    pub fn new(hash_alg: HashAlgorithm) -> Self {
        let digest: Box<dyn DynDigest + Send> = match hash_alg {
            HashAlgorithm::Sha256 => Box::new(Sha256::default()),
            #[cfg(feature = "pre-rfc8301")]
            HashAlgorithm::Sha1 => Box::new(Sha1::default()),
        };

        Self {
            digest,
            bytes_written: 0,
        }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.digest.update(bytes);
        self.bytes_written += bytes.len();
    }

    pub fn finish(self) -> (Box<[u8]>, usize) {
        (self.digest.finalize(), self.bytes_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64ct::{Base64, Encoding};

    #[test]
    fn counting_hasher_ok() {
        let mut hasher = CountingHasher::new(HashAlgorithm::Sha256);
        hasher.update(b"ab");
        hasher.update(b"");
        hasher.update(b"c");

        let (hash, len) = hasher.finish();
        assert_eq!(len, 3);
        assert_eq!(hash, digest(HashAlgorithm::Sha256, b"abc"));
    }

    #[test]
    fn digest_rfc_examples() {
        // See §3.4.3:
        let hash = digest(HashAlgorithm::Sha256, b"\r\n");
        assert_eq!(Base64::encode_string(&hash), "frcCV1k9oG9oKj3dpUqdJg1PxRT2RSN/XKdLCPjaYaY=");

        // See §3.4.4:
        let hash = digest(HashAlgorithm::Sha256, b"");
        assert_eq!(Base64::encode_string(&hash), "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=");
    }

    #[cfg(feature = "pre-rfc8301")]
    #[test]
    fn digest_rfc_examples_sha1() {
        let hash = digest(HashAlgorithm::Sha1, b"\r\n");
        assert_eq!(Base64::encode_string(&hash), "uoq1oCgLlTqpdDX/iUbLy7J1Wic=");

        let hash = digest(HashAlgorithm::Sha1, b"");
        assert_eq!(Base64::encode_string(&hash), "2jmj7l5rSw0yVb/vlWAYkK/YBwk=");
    }
}

//! Body hash computation.

use crate::{
    canonicalize::BodyCanonicalizer,
    crypto::{CountingHasher, HashAlgorithm},
    util,
};

/// The hash of the canonicalized body, and the length of the canonicalized
/// body in bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BodyHash {
    pub digest: Box<[u8]>,
    pub length: usize,
}

impl BodyHash {
    /// Returns the Base64-encoded digest, as used in the *bh=* tag.
    pub fn to_base64(&self) -> String {
        util::encode_base64(&self.digest)
    }
}

/// A hasher that canonicalizes body content and hashes the result.
pub struct BodyHasher {
    canonicalizer: BodyCanonicalizer,
    hasher: CountingHasher,
}

impl BodyHasher {
    pub fn new(hash_alg: HashAlgorithm) -> Self {
        Self {
            canonicalizer: BodyCanonicalizer::new(),
            hasher: CountingHasher::new(hash_alg),
        }
    }

    /// Processes a chunk of the message body.
    ///
    /// Note that the chunk is canonicalized and hashed, but not otherwise
    /// retained in memory.
    pub fn hash_chunk(&mut self, chunk: &[u8]) {
        let canonicalized_chunk = self.canonicalizer.canonicalize_chunk(chunk);
        self.hasher.update(&canonicalized_chunk);
    }

    pub fn finish(self) -> BodyHash {
        let Self { canonicalizer, mut hasher } = self;

        hasher.update(&canonicalizer.finish());

        let (digest, length) = hasher.finish();

        BodyHash { digest, length }
    }
}

/// Computes the body hash of a complete body.
pub fn compute_body_hash(hash_alg: HashAlgorithm, body: &[u8]) -> BodyHash {
    let mut hasher = BodyHasher::new(hash_alg);
    hasher.hash_chunk(body);
    hasher.finish()
}

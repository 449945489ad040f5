//! Signer and supporting types.

mod format;
mod sign;

pub use format::{insert_signature_data, UnsignedDkimSignature, LINE_WIDTH};
pub use sign::compute_signed_data;

use crate::{
    error::SignerError,
    header::HeaderFields,
    identity::{SigningConfig, SigningIdentity},
    message::RawMessage,
    signature::DkimSignature,
};
use std::{str::FromStr, sync::Arc};

/// A generator for the timestamp tag.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Timestamp {
    /// The current time, read from the system clock at signing.
    #[default]
    Now,
    Exact(u64),
}

/// The result of signing a message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SigningResult {
    // Usage: header_name and header_value are meant to be concatenated with
    // only an intervening colon, no additional whitespace!
    pub header_name: String,
    pub header_value: String,
    pub signature: Box<DkimSignature>,
}

impl SigningResult {
    /// Returns the complete *DKIM-Signature* header field, including the final
    /// CRLF.
    pub fn format_header(&self) -> String {
        format!("{}:{}\r\n", self.header_name, self.header_value)
    }

    /// Returns the given header block with the *DKIM-Signature* header field
    /// placed in front of it.
    pub fn prepend_to(&self, header_block: &str) -> String {
        let mut result = self.format_header();
        result.push_str(header_block);
        result
    }
}

/// A signer for email messages.
///
/// The signer holds a shared read-only reference to its signing identity and
/// can be cloned cheaply and used from many threads at once.
#[derive(Clone, Debug)]
pub struct Signer {
    identity: Arc<SigningIdentity>,
    timestamp: Timestamp,
}

impl Signer {
    pub fn new(identity: Arc<SigningIdentity>) -> Self {
        Self {
            identity,
            timestamp: Timestamp::Now,
        }
    }

    /// Validates the configuration and creates a signer for it.
    pub fn from_config(config: &SigningConfig) -> Result<Self, SignerError> {
        let identity = SigningIdentity::from_config(config)?;
        Ok(Self::new(Arc::new(identity)))
    }

    /// Uses the given timestamp for all signatures, instead of the current
    /// time.
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn identity(&self) -> &Arc<SigningIdentity> {
        &self.identity
    }

    /// Signs a message given as header block, subject, and body.
    ///
    /// The header block is a sequence of CRLF-separated header lines. The
    /// subject given here is signed as the *Subject* header, regardless of any
    /// *Subject* header in the header block.
    pub fn sign(
        &self,
        header_block: &str,
        subject: &str,
        body: &[u8],
    ) -> Result<SigningResult, SignerError> {
        let headers = HeaderFields::from_str(header_block)?;
        let message = RawMessage::new(headers, subject, body);

        self.sign_message(&message)
    }

    /// Signs a message.
    pub fn sign_message(&self, message: &RawMessage) -> Result<SigningResult, SignerError> {
        sign::perform_signing(&self.identity, message, self.timestamp)
    }
}

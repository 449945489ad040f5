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

use crate::{
    body_hash,
    canonicalize,
    crypto,
    error::{SignerError, ValidationError},
    header::{FieldBody, FieldName, HeaderField},
    identity::SigningIdentity,
    message::RawMessage,
    signature::{DKIM_SIGNATURE_NAME, SIGNED_HEADERS},
    signer::{
        format::{self, UnsignedDkimSignature},
        SigningResult, Timestamp,
    },
};
use std::time::SystemTime;
use tracing::{debug, trace};

pub fn perform_signing(
    identity: &SigningIdentity,
    message: &RawMessage,
    timestamp: Timestamp,
) -> Result<SigningResult, SignerError> {
    let algorithm = identity.algorithm();
    let hash_alg = algorithm.hash_algorithm();

    // select headers, always in the order From, To, Subject

    let signed_fields = select_signed_fields(message)?;

    // calculate body hash

    let body_hash = body_hash::compute_body_hash(hash_alg, &message.body);

    debug!(
        domain = %identity.domain(),
        selector = %identity.selector(),
        %algorithm,
        body_length = body_hash.length,
        "signing message"
    );

    let timestamp = match timestamp {
        Timestamp::Now => now_unix_secs(),
        Timestamp::Exact(t) => t,
    };

    let signed_headers = SIGNED_HEADERS.into_iter().map(FieldName::from_static).collect();

    let copied_headers = signed_fields
        .iter()
        .map(|(name, value)| (name.clone(), Box::<[u8]>::from(value.as_ref())))
        .collect();

    // prepare complete formatted signature header with body hash except with contents of b= tag

    let sig = UnsignedDkimSignature {
        algorithm,
        body_hash: body_hash.digest,
        domain: identity.domain().clone(),
        signed_headers,
        identity: identity.identity().cloned(),
        body_length: body_hash.length,
        selector: identity.selector().clone(),
        timestamp,
        copied_headers,
    };

    let mut header_value = sig.format_without_signature();

    let data = compute_signed_data(&signed_fields, DKIM_SIGNATURE_NAME, &header_value);

    trace!(len = data.len(), "computed data to sign");

    let data_hash = crypto::digest(hash_alg, &data);

    let signature_data = identity
        .signing_key()
        .sign_hash(hash_alg, &data_hash)?
        .into_boxed_slice();

    let sig = sig.into_signature(signature_data);

    format::insert_signature_data(&mut header_value, &sig.signature_data);

    debug!(domain = %sig.domain, "message signed");

    Ok(SigningResult {
        header_name: DKIM_SIGNATURE_NAME.into(),
        header_value,
        signature: Box::new(sig),
    })
}

/// Looks up the first From and To header fields, and makes a Subject header
/// field from the subject argument.
fn select_signed_fields(message: &RawMessage) -> Result<[HeaderField; 3], ValidationError> {
    let from = message
        .headers
        .find("From")
        .ok_or(ValidationError::MissingFromHeader)?;
    let to = message
        .headers
        .find("To")
        .ok_or(ValidationError::MissingToHeader)?;

    let subject = subject_field(&message.subject)?;

    Ok([from.clone(), to.clone(), subject])
}

fn subject_field(subject: &str) -> Result<HeaderField, ValidationError> {
    let name = FieldName::from_static("Subject");

    let value = FieldBody::new(format!(" {subject}").into_bytes())
        .map_err(|_| ValidationError::InvalidSubject)?;

    Ok((name, value))
}

/// Computes the data to sign: the canonicalized signed header fields, each
/// with CRLF, followed by the canonicalized DKIM-Signature header field with
/// empty *b=* tag and without final CRLF.
pub fn compute_signed_data(
    signed_fields: &[HeaderField],
    header_name: &str,
    header_value: &str,
) -> Vec<u8> {
    let mut data = canonicalize::canonicalize_headers(signed_fields.iter().map(|(n, v)| (n, v)));

    canonicalize::canonicalize_header(&mut data, header_name, header_value);

    data
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |t| t.as_secs())
}

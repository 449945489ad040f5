use dkimsig::{
    canonicalize,
    crypto::{self, HashAlgorithm},
    HeaderField, HeaderFields, SigningConfig, SigningResult, VerifyingKey,
};
use ed25519_dalek::Verifier;
use rsa::Pkcs1v15Sign;
use sha2::Sha256;
use std::{io, str::FromStr};
use tokio::fs;

pub const FROM_TO_HEADERS: &str = "\
From: Joe SixPack <joe@football.example.com>\r
To: Suzie Q <suzie@shopping.example.net>\r
Date: Fri, 11 Jul 2003 21:00:37 -0700 (PDT)\r
Message-ID: <20030712040037.46341.5F8J@football.example.com>\r
";

pub const BODY: &[u8] = b"\
Hi.\r
\r
We lost the game. Are you hungry yet?\r
\r
Joe.\r
";

pub fn read_key_file(file_name: &str) -> String {
    std::fs::read_to_string(file_name).unwrap()
}

pub async fn read_key_file_async(file_name: &str) -> io::Result<String> {
    fs::read_to_string(file_name).await
}

pub fn rsa_config() -> SigningConfig {
    SigningConfig {
        private_key: read_key_file("tests/keys/rsa2048.pem"),
        public_key: read_key_file("tests/keys/rsa2048.pub.pem"),
        domain: "example.com".into(),
        selector: "sel1".into(),
        ..Default::default()
    }
}

/// Verifies a produced signature against the given message headers and
/// subject, reconstructing the signed data from the formatted header.
pub fn verify(
    result: &SigningResult,
    header_block: &str,
    subject: &str,
    public_key: &VerifyingKey,
) -> bool {
    let headers = HeaderFields::from_str(header_block).unwrap();

    let mut fields: Vec<HeaderField> = ["From", "To"]
        .into_iter()
        .map(|name| headers.find(name).unwrap().clone())
        .collect();
    let subject_field = HeaderFields::from_str(&format!("Subject: {subject}")).unwrap();
    fields.push(subject_field.as_ref()[0].clone());

    let value = &result.header_value;
    let b_index = value.rfind(";\r\n\tb=").unwrap() + ";\r\n\tb=".len();
    let unsigned_value = &value[..b_index];

    let mut data = canonicalize::canonicalize_headers(fields.iter().map(|(n, v)| (n, v)));
    canonicalize::canonicalize_header(&mut data, &result.header_name, unsigned_value);

    let hash_alg = result.signature.algorithm.hash_algorithm();
    let data_hash = crypto::digest(hash_alg, &data);
    let signature_data = &result.signature.signature_data;

    match public_key {
        VerifyingKey::Rsa(k) => {
            let scheme = match hash_alg {
                HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
                #[cfg(feature = "pre-rfc8301")]
                HashAlgorithm::Sha1 => Pkcs1v15Sign::new::<sha1::Sha1>(),
            };
            k.verify(scheme, &data_hash, signature_data).is_ok()
        }
        VerifyingKey::Ed25519(k) => {
            let signature = match ed25519_dalek::Signature::from_slice(signature_data) {
                Ok(s) => s,
                Err(_) => return false,
            };
            k.verify(&data_hash, &signature).is_ok()
        }
    }
}

/// Returns the value of the given tag in a formatted header value.
pub fn tag_value(header_value: &str, name: &str) -> Option<String> {
    let unfolded = header_value.replace("\r\n\t", "");
    unfolded.split(';').find_map(|tag| {
        let (k, v) = tag.split_once('=')?;
        (k.trim() == name).then(|| v.trim().to_owned())
    })
}

use bstr::ByteSlice;
use dkimsig::{HeaderFields, RawMessage, Signer, SigningConfig};
use std::{env, process, str::FromStr};
use tokio::{
    fs,
    io::{self, AsyncReadExt},
};

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt::try_init();

    let mut args = env::args();

    let (private_key_file, public_key_file, domain, selector) = match (
        args.next().as_deref(),
        args.next(),
        args.next(),
        args.next(),
        args.next(),
        args.next(),
    ) {
        (_, Some(private_key_file), Some(public_key_file), Some(domain), Some(selector), None) => {
            (private_key_file, public_key_file, domain, selector)
        }
        (program, ..) => {
            eprintln!(
                "usage: {} <private_key_file> <public_key_file> <domain> <selector>",
                program.unwrap_or("dkimsign")
            );
            process::exit(1);
        }
    };

    let config = SigningConfig {
        private_key: fs::read_to_string(private_key_file).await.unwrap(),
        public_key: fs::read_to_string(public_key_file).await.unwrap(),
        domain,
        selector,
        ..Default::default()
    };

    let signer = match Signer::from_config(&config) {
        Ok(signer) => signer,
        Err(e) => {
            eprintln!("ERROR: {e}: {:?}", e);
            process::exit(1);
        }
    };

    let mut msg = vec![];
    let n = io::stdin().read_to_end(&mut msg).await.unwrap();
    assert!(n > 0, "empty message on stdin");

    let (header, body) = match msg.find("\r\n\r\n") {
        Some(i) => (&msg[..i + 2], &msg[i + 4..]),
        None => match msg.find("\n\n") {
            Some(i) => (&msg[..i + 1], &msg[i + 2..]),
            None => (&msg[..], &[][..]),
        },
    };

    let header = header.to_str_lossy();

    let headers = match HeaderFields::from_str(&header) {
        Ok(headers) => headers,
        Err(e) => {
            eprintln!("ERROR: {e}");
            process::exit(1);
        }
    };

    // the subject is signed as given, here taken from the message itself
    let subject = headers
        .find("Subject")
        .map(|(_, value)| value.as_ref().trim().to_str_lossy().into_owned())
        .unwrap_or_default();

    let message = RawMessage::new(headers, subject, body);

    match signer.sign_message(&message) {
        Ok(result) => {
            let header = result.format_header().replace("\r\n", "\n");
            print!("{header}");
        }
        Err(e) => {
            eprintln!("ERROR: {e}: {:?}", e);
            process::exit(1);
        }
    }
}

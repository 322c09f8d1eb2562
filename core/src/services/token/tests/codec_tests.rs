//! Tests for the signed token codec

use crate::domain::entities::grant::AccessGrant;
use crate::errors::TokenError;
use crate::services::token::TokenCodec;

fn codec() -> TokenCodec {
    TokenCodec::new(b"test-secret".to_vec())
}

fn grant() -> AccessGrant {
    AccessGrant::new(5, "https://example.org/lesson".to_string(), 120)
}

#[test]
fn sign_then_verify_round_trips() {
    let codec = codec();
    let grant = grant();

    let token = codec.sign(&grant).unwrap();
    let verified = codec.verify(&token).unwrap();

    assert_eq!(verified, grant);
}

#[test]
fn token_is_url_safe() {
    let codec = codec();
    let token = codec.sign(&grant()).unwrap();

    assert!(token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}

#[test]
fn any_single_character_tamper_is_rejected() {
    let codec = codec();
    let token = codec.sign(&grant()).unwrap();

    for position in 0..token.len() {
        let mut bytes = token.clone().into_bytes();
        bytes[position] = if bytes[position] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();
        if tampered == token {
            continue;
        }

        assert!(
            codec.verify(&tampered).is_err(),
            "tamper at position {} was accepted",
            position
        );
    }
}

#[test]
fn wrong_secret_is_rejected() {
    let token = codec().sign(&grant()).unwrap();
    let other = TokenCodec::new(b"another-secret".to_vec());

    assert_eq!(other.verify(&token), Err(TokenError::InvalidSignature));
}

#[test]
fn garbage_input_is_malformed() {
    let codec = codec();

    assert_eq!(codec.verify("not base64 at all!"), Err(TokenError::Malformed));
    assert_eq!(codec.verify(""), Err(TokenError::Malformed));
}

#[test]
fn missing_separator_is_malformed() {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    let codec = codec();
    let no_dot = URL_SAFE_NO_PAD.encode(r#"{"cid":5}"#);

    assert_eq!(codec.verify(&no_dot), Err(TokenError::Malformed));
}

#[test]
fn valid_signature_over_non_json_body_is_malformed() {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let body = "not-json";
    let mut mac = <Hmac<Sha256>>::new_from_slice(b"test-secret").unwrap();
    mac.update(body.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    let token = URL_SAFE_NO_PAD.encode(format!("{}.{}", body, signature));

    assert_eq!(codec().verify(&token), Err(TokenError::Malformed));
}

#[test]
fn redirect_urls_with_dots_round_trip() {
    // The JSON body contains dots; the signature split must not eat them.
    let codec = codec();
    let grant = AccessGrant::new(
        7,
        "https://courses.example.co.uk/lessons/intro.html".to_string(),
        300,
    );

    let token = codec.sign(&grant).unwrap();
    assert_eq!(codec.verify(&token).unwrap(), grant);
}

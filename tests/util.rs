#![allow(dead_code)]

use std::sync::OnceLock;

use regex::Regex;
use tlsfixture::fixture;

/// A 2048-bit key PEM shared by every test in the binary; RSA generation is slow
/// in debug builds.
pub fn shared_key_pem() -> &'static str {
    static KEY: OnceLock<String> = OnceLock::new();
    KEY.get_or_init(|| fixture::rsa_private_key_pem(2048).expect("key generation failed"))
}

/// Asserts `pem` is exactly one block with the given label, LF line endings,
/// 64-column base64 lines and a trailing newline. Returns the decoded body.
pub fn assert_single_pem_block(pem: &str, label: &str) -> Vec<u8> {
    use base64::Engine;

    let pattern = format!(
        r"^-----BEGIN {label}-----\n((?:[A-Za-z0-9+/]{{64}}\n)*[A-Za-z0-9+/=]{{1,64}}\n)-----END {label}-----\n$"
    );
    let re = Regex::new(&pattern).unwrap();
    let captures = re
        .captures(pem)
        .unwrap_or_else(|| panic!("not a single {label} PEM block:\n{pem}"));

    assert_eq!(pem.matches("-----BEGIN").count(), 1);
    let body: String = captures[1].lines().collect();
    base64::engine::general_purpose::STANDARD
        .decode(body)
        .expect("PEM body is not base64")
}

mod util;

use std::fs;
use std::process::Command;

use openssl::nid::Nid;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use openssl::x509::X509;
use regex::Regex;
use tlsfixture::fixture;

fn common_name(name: &openssl::x509::X509NameRef) -> String {
    name.entries_by_nid(Nid::COMMONNAME)
        .next()
        .unwrap()
        .data()
        .as_utf8()
        .unwrap()
        .to_string()
}

#[test]
fn test_openssl_crate_reads_private_key() {
    let key_pem = util::shared_key_pem();

    let rsa = Rsa::private_key_from_pem(key_pem.as_bytes()).expect("Failed to parse key PEM");
    assert_eq!(rsa.size() * 8, 2048, "Modulus size mismatch");
    assert!(rsa.check_key().unwrap(), "RSA key consistency check failed");
}

#[test]
fn test_openssl_crate_validate_cert() {
    let key_pem = util::shared_key_pem();
    let cert_pem = fixture::self_signed_certificate_pem(key_pem, "example.com").unwrap();

    let x509 = X509::from_pem(cert_pem.as_bytes()).expect("Failed to parse PEM");
    let private_key = PKey::private_key_from_pem(key_pem.as_bytes()).unwrap();

    assert_eq!(common_name(x509.subject_name()), "example.com", "Subject CN mismatch");
    assert_eq!(common_name(x509.issuer_name()), "example.com", "Issuer CN mismatch");
    assert_eq!(
        x509.subject_name().entries_by_nid(Nid::ORGANIZATIONNAME)
            .next()
            .unwrap()
            .data()
            .as_utf8()
            .unwrap()
            .to_string(),
        "ACME Examples, Inc"
    );

    // Check version
    assert_eq!(x509.version(), 2, "X509 version should be 3 (0-based index)");

    // Check signature algorithm
    assert_eq!(
        x509.signature_algorithm().object().nid(),
        Nid::SHA256WITHRSAENCRYPTION,
        "Signature algorithm should be sha256WithRSAEncryption"
    );

    // Self-signed: the embedded key is ours and verifies the signature
    let public_key = x509.public_key().unwrap();
    assert!(public_key.public_eq(&private_key), "Certificate carries a different key");
    assert!(x509.verify(&public_key).unwrap(), "Signature does not verify");

    // Exactly 24 hours of validity
    let diff = x509.not_before().diff(x509.not_after()).unwrap();
    assert_eq!((diff.days, diff.secs), (1, 0), "Validity is not 24 hours");
}

#[test]
fn test_openssl_validate_cert() {
    let cert_pem =
        fixture::self_signed_certificate_pem(util::shared_key_pem(), "example.com").unwrap();

    let cert_path = std::env::temp_dir().join(format!(
        "tlsfixture_openssl_{}.pem",
        std::process::id()
    ));
    fs::write(&cert_path, cert_pem).expect("Failed to write certificate");

    let output = Command::new("openssl")
        .arg("x509")
        .arg("-in")
        .arg(&cert_path)
        .arg("-noout")
        .arg("-text")
        .output();

    fs::remove_file(&cert_path).expect("Failed to remove test certificate");

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            eprintln!("skipping: openssl CLI not available: {e}");
            return;
        }
    };

    assert!(
        output.status.success(),
        "OpenSSL command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output_text = String::from_utf8_lossy(&output.stdout);

    assert!(
        output_text.contains("Version: 3 (0x2)"),
        "Version field is incorrect"
    );
    assert!(
        output_text.contains("Signature Algorithm: sha256WithRSAEncryption"),
        "Signature Algorithm field is incorrect"
    );
    assert!(
        output_text.contains("Public-Key: (2048 bit)"),
        "Public key size is incorrect"
    );

    let name_regex = Regex::new(r"O\s*=\s*ACME Examples, Inc,\s*CN\s*=\s*example\.com").unwrap();
    let issuer_regex = Regex::new(r"Issuer: .+").unwrap();
    let subject_regex = Regex::new(r"Subject: .+").unwrap();
    let issuer = issuer_regex.find(&output_text).expect("Missing Issuer");
    let subject = subject_regex.find(&output_text).expect("Missing Subject");
    assert!(name_regex.is_match(issuer.as_str()), "Issuer field is incorrect");
    assert!(name_regex.is_match(subject.as_str()), "Subject field is incorrect");

    assert!(
        Regex::new(r"Key Usage: critical\s+Digital Signature, Key Encipherment")
            .unwrap()
            .is_match(&output_text),
        "Key Usage is incorrect"
    );
    assert!(
        Regex::new(r"Extended Key Usage:\s+TLS Web Server Authentication\s")
            .unwrap()
            .is_match(&output_text),
        "Extended Key Usage is incorrect"
    );
    assert!(
        Regex::new(r"Basic Constraints: critical\s+CA:FALSE")
            .unwrap()
            .is_match(&output_text),
        "Basic Constraints is incorrect"
    );

    assert!(
        Regex::new(r"Not Before: .+").unwrap().is_match(&output_text),
        "Missing or incorrect Not Before field"
    );
    assert!(
        Regex::new(r"Not After : .+").unwrap().is_match(&output_text),
        "Missing or incorrect Not After field"
    );
}

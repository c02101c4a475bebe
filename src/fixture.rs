//! One-call TLS fixtures: an RSA key PEM, a self-signed server certificate
//! PEM for that key, and newline escaping for single-line config templates.
//!
//! ```rust,no_run
//! use tlsfixture::fixture;
//!
//! # fn main() -> Result<(), tlsfixture::error::TlsFixtureError> {
//! let key_pem = fixture::rsa_private_key_pem(2048)?;
//! let cert_pem = fixture::self_signed_certificate_pem(&key_pem, "example.com")?;
//!
//! let config = format!(
//!     "private_key_pem = \"{}\"\ncertificate_pem = \"{}\"",
//!     fixture::escape_pem_newlines(&key_pem),
//!     fixture::escape_pem_newlines(&cert_pem),
//! );
//! # let _ = config;
//! # Ok(())
//! # }
//! ```

use time::{Duration, OffsetDateTime};
use tracing::{debug, instrument};

use crate::cert::Certificate;
use crate::cert::extensions::{ExtendedKeyUsageOption, KeyUsages};
use crate::cert::params::{CertificationRequestInfo, DistinguishedName, Validity};
use crate::error::{Result, TlsFixtureError};
use crate::key::{KeyPair, PublicKey};

pub use crate::cert::CERTIFICATE_LABEL;
pub use crate::issuer::SERIAL_NUMBER_BITS;
pub use crate::key::RSA_PRIVATE_KEY_LABEL;

/// Organization placed in the subject (and so the issuer) of every fixture certificate.
pub const FIXTURE_ORGANIZATION: &str = "ACME Examples, Inc";

/// Lifetime of every fixture certificate, counted from the moment it is generated.
pub const FIXTURE_VALIDITY: Duration = Duration::hours(24);

/// Generates an RSA private key of `bits` bits and returns it as an
/// `RSA PRIVATE KEY` (PKCS#1) PEM block.
///
/// Every call draws a fresh key from the OS entropy source.
#[instrument(level = "debug")]
pub fn rsa_private_key_pem(bits: usize) -> Result<String> {
    let key = KeyPair::generate_rsa(bits)?;
    let pem = key.to_pkcs1_pem().map_err(|e| match e {
        TlsFixtureError::EncodingError(msg) => TlsFixtureError::KeyGenerationFailure(msg),
        other => other,
    })?;
    debug!(bits = key.bits(), "generated RSA private key");
    Ok(pem)
}

/// Builds a self-signed X.509 server certificate for the key in `key_pem` and
/// returns it as a `CERTIFICATE` PEM block.
///
/// `key_pem` must be an unescaped PEM block holding a PKCS#1 RSA private key,
/// such as one from [`rsa_private_key_pem`]. `common_name` is copied verbatim
/// into the subject.
#[instrument(level = "debug", skip(key_pem))]
pub fn self_signed_certificate_pem(key_pem: &str, common_name: &str) -> Result<String> {
    let key = KeyPair::import_from_pkcs1_pem(key_pem)?;
    self_signed_certificate_pem_for_key(&key, common_name)
}

/// Same as [`self_signed_certificate_pem`] for a key that is already parsed.
pub fn self_signed_certificate_pem_for_key(key: &KeyPair, common_name: &str) -> Result<String> {
    let certificate = self_signed_certificate(key, common_name, OffsetDateTime::now_utc())?;
    certificate
        .to_pem()
        .map_err(|e| TlsFixtureError::CertificateSigningFailure(e.to_string()))
}

pub(crate) fn self_signed_certificate(
    key: &KeyPair,
    common_name: &str,
    now: OffsetDateTime,
) -> Result<Certificate> {
    let subject = DistinguishedName::builder()
        .common_name(common_name.to_string())
        .organization(FIXTURE_ORGANIZATION.to_string())
        .build();

    let cert_info = CertificationRequestInfo::builder()
        .subject(subject)
        .subject_public_key(PublicKey::from_key_pair(key))
        .key_usages(KeyUsages::DigitalSignature | KeyUsages::KeyEncipherment)
        .usages(vec![ExtendedKeyUsageOption::ServerAuth])
        .build();

    let validity = Validity::starting_at(now, FIXTURE_VALIDITY);
    debug!(
        not_before = %validity.not_before,
        not_after = %validity.not_after,
        "signing self-signed fixture certificate"
    );

    Certificate::new_self_signed(&cert_info, key, validity)
}

/// Replaces every newline with the two characters `\` and `n`, so a PEM block
/// can be dropped into a single-line quoted string such as
/// `private_key_pem = "%s"`. Nothing else, backslashes included, is touched.
pub fn escape_pem_newlines(pem: &str) -> String {
    pem.replace('\n', "\\n")
}

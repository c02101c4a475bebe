use der::DateTime;
use der::asn1::{AnyRef, GeneralizedTime, OctetString, UtcTime};
use rand::TryRngCore;
use rand::rngs::OsRng;
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::AlgorithmIdentifierOwned;
use x509_cert::time::Time;

use crate::cert::params::{DistinguishedName, ExtensionParam, Validity};
use crate::error::{Result, TlsFixtureError};
use crate::key::PublicKey;

/// Signature algorithm used for every certificate this crate signs:
/// RSASSA-PKCS1-v1_5 with SHA-256.
pub fn sha256_with_rsa_algorithm() -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
        parameters: Some(AnyRef::NULL.into()),
    }
}

/// Draws a serial number uniformly from `[0, 2^bits)` using the OS CSPRNG.
///
/// The result is the minimal big-endian two's complement encoding of a
/// non-negative integer, ready for [`SerialNumber::new`].
pub fn random_serial_number(bits: usize) -> Result<Vec<u8>> {
    if bits == 0 || bits % 8 != 0 || bits > 152 {
        return Err(TlsFixtureError::InvalidInput(format!(
            "serial number size must be a whole number of bytes up to 152 bits, got {bits}"
        )));
    }
    let mut raw = vec![0u8; bits / 8];
    OsRng
        .try_fill_bytes(&mut raw)
        .map_err(|e| TlsFixtureError::CertificateSigningFailure(format!("serial number: {e}")))?;
    Ok(positive_integer_bytes(&raw))
}

/// Strips leading zero octets and re-adds one when the high bit would
/// otherwise make the integer negative.
fn positive_integer_bytes(raw: &[u8]) -> Vec<u8> {
    let first_nonzero = raw.iter().position(|b| *b != 0).unwrap_or(raw.len());
    let significant = &raw[first_nonzero..];
    match significant.first() {
        None => vec![0],
        Some(b) if b & 0x80 != 0 => {
            let mut bytes = Vec::with_capacity(significant.len() + 1);
            bytes.push(0);
            bytes.extend_from_slice(significant);
            bytes
        }
        Some(_) => significant.to_vec(),
    }
}

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
///
/// # Fields
/// * `serial_number` - Positive DER integer bytes identifying the certificate.
/// * `issuer` - The distinguished name of the certificate issuer.
/// * `validity` - The `notBefore`/`notAfter` window.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `extensions` - Additional X.509 extensions for the certificate.
pub struct TbsCertificate {
    pub serial_number: Vec<u8>,
    pub issuer: DistinguishedName,
    pub validity: Validity,
    pub subject: DistinguishedName,
    pub subject_public_key: PublicKey,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Converts the `TbsCertificate` into a `TbsCertificateInner` for DER encoding.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner> {
        let extensions = self
            .extensions
            .iter()
            .map(|ext| -> Result<x509_cert::ext::Extension> {
                Ok(x509_cert::ext::Extension {
                    extn_id: ext.oid,
                    critical: ext.critical,
                    extn_value: OctetString::new(ext.value.clone())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let validity = x509_cert::time::Validity {
            not_before: validity_time(self.validity.not_before)?,
            not_after: validity_time(self.validity.not_after)?,
        };

        let serial_number = SerialNumber::new(self.serial_number.as_slice())
            .map_err(|e| TlsFixtureError::InvalidInput(format!("serial number: {e}")))?;

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number,
            signature: sha256_with_rsa_algorithm(),
            issuer: self.issuer.as_x509_name()?,
            validity,
            subject: self.subject.as_x509_name()?,
            subject_public_key_info: self.subject_public_key.to_x509spki()?,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: if extensions.is_empty() {
                None
            } else {
                Some(extensions)
            },
        })
    }
}

/// RFC 5280 encoding of a validity bound: UTCTime through 2049,
/// GeneralizedTime from 2050 on.
fn validity_time(at: time::OffsetDateTime) -> Result<Time> {
    let invalid = |e: der::Error| TlsFixtureError::InvalidInput(format!("validity time {at}: {e}"));
    let date_time = DateTime::from_system_time(at.into()).map_err(invalid)?;
    if date_time.year() < 2050 {
        Ok(Time::UtcTime(
            UtcTime::from_date_time(date_time).map_err(invalid)?,
        ))
    } else {
        Ok(Time::GeneralTime(GeneralizedTime::from_date_time(date_time)))
    }
}

pub mod extensions;
pub mod params;

use der::{Decode, Encode};
use params::{CertificationRequestInfo, DistinguishedName, ExtensionParam, Validity};
use x509_cert::certificate::CertificateInner;

use crate::error::{Result, TlsFixtureError};
use crate::issuer::{Issuer, SelfIssuer};
use crate::key::{KeyPair, PublicKey};
use crate::pem_utils;

/// PEM label of an X.509 certificate.
pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Represents an X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM
/// formats, to read one back, and to inspect the fields fixtures care about.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Creates a new self-signed certificate.
    ///
    /// The issuer name is the subject name, and `key` both signs the
    /// certificate and is expected to match `cert_info.subject_public_key`.
    pub fn new_self_signed(
        cert_info: &CertificationRequestInfo,
        key: &KeyPair,
        validity: Validity,
    ) -> Result<Self> {
        let self_issuer = SelfIssuer {
            name: cert_info.subject.clone(),
            key,
        };
        self_issuer.issue(cert_info, validity)
    }

    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| TlsFixtureError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into PEM format.
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(&self.to_der()?, CERTIFICATE_LABEL))
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)?;
        Ok(Self { inner })
    }

    /// Decodes the first `CERTIFICATE` block of `pem`.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let der = pem_utils::pem_to_der_with_label(pem, CERTIFICATE_LABEL)?;
        Self::from_der(&der)
    }

    pub fn subject(&self) -> Result<DistinguishedName> {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    pub fn issuer(&self) -> Result<DistinguishedName> {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    pub fn subject_common_name(&self) -> Result<String> {
        Ok(self.subject()?.common_name)
    }

    pub fn subject_organization(&self) -> Result<Option<String>> {
        Ok(self.subject()?.organization)
    }

    /// Whether the issuer name is byte-for-byte the subject name.
    pub fn is_self_issued(&self) -> Result<bool> {
        let tbs = &self.inner.tbs_certificate;
        Ok(tbs.issuer.to_der()? == tbs.subject.to_der()?)
    }

    /// The `notBefore`/`notAfter` window, whatever key type the certificate carries.
    pub fn validity(&self) -> Validity {
        Validity::from(&self.inner.tbs_certificate.validity)
    }

    /// Serial number as positive DER integer bytes.
    pub fn serial_number(&self) -> Vec<u8> {
        self.inner
            .tbs_certificate
            .serial_number
            .as_bytes()
            .to_vec()
    }

    pub fn extensions(&self) -> Vec<ExtensionParam> {
        self.inner
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .map(|ext| ExtensionParam {
                oid: ext.extn_id,
                critical: ext.critical,
                value: ext.extn_value.as_bytes().to_vec(),
            })
            .collect()
    }

    /// Finds and decodes the extension of type `E`, if present.
    pub fn extension<E: extensions::ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        self.extensions()
            .iter()
            .find(|ext| ext.oid == E::OID)
            .map(|ext| ext.to_extension())
            .transpose()
    }

    /// The subject public key carried by the certificate.
    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// Verifies the certificate signature against `issuer_key`.
    ///
    /// Only `sha256WithRSAEncryption` signatures are understood.
    pub fn verify_signature(&self, issuer_key: &PublicKey) -> Result<bool> {
        if self.inner.signature_algorithm.oid != const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION
        {
            return Err(TlsFixtureError::DecodingError(format!(
                "Unsupported signature algorithm {}",
                self.inner.signature_algorithm.oid
            )));
        }
        let tbs_der = self.inner.tbs_certificate.to_der()?;
        let signature = self.inner.signature.as_bytes().ok_or_else(|| {
            TlsFixtureError::DecodingError("signature has unused bits".to_string())
        })?;
        crate::pki::verify_signature(&tbs_der, signature, issuer_key)
    }

    /// Self-issued and signed by the key it carries.
    pub fn verify_self_signed(&self) -> Result<bool> {
        Ok(self.is_self_issued()? && self.verify_signature(&self.public_key()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::extensions::{BasicConstraints, ExtendedKeyUsage, ExtendedKeyUsageOption, KeyUsage};

    fn self_signed(key: &KeyPair, common_name: &str) -> Certificate {
        let cert_info = CertificationRequestInfo::builder()
            .subject(
                DistinguishedName::builder()
                    .common_name(common_name.to_string())
                    .organization("Crab widgits SE".to_string())
                    .build(),
            )
            .subject_public_key(PublicKey::from_key_pair(key))
            .usages(vec![ExtendedKeyUsageOption::ServerAuth])
            .build();
        Certificate::new_self_signed(&cert_info, key, Validity::for_hours(24)).unwrap()
    }

    #[test]
    fn test_pem_round_trip_keeps_fields() {
        let key = KeyPair::generate_rsa(1024).unwrap();
        let cert = self_signed(&key, "crabs.crabs");
        let pem = cert.to_pem().unwrap();

        let parsed = Certificate::from_pem(&pem).unwrap();
        assert_eq!(parsed.to_der().unwrap(), cert.to_der().unwrap());
        assert_eq!(parsed.subject_common_name().unwrap(), "crabs.crabs");
        assert_eq!(
            parsed.subject_organization().unwrap().as_deref(),
            Some("Crab widgits SE")
        );
        assert_eq!(parsed.issuer().unwrap(), parsed.subject().unwrap());
        assert_eq!(parsed.public_key().unwrap(), key.public_key());
        assert_eq!(parsed.validity().length(), time::Duration::hours(24));
    }

    #[test]
    fn test_self_signed_verifies() {
        let key = KeyPair::generate_rsa(1024).unwrap();
        let cert = self_signed(&key, "crabs.crabs");
        assert!(cert.verify_self_signed().unwrap());

        let other = KeyPair::generate_rsa(1024).unwrap();
        assert!(!cert.verify_signature(&other.public_key()).unwrap());
    }

    #[test]
    fn test_tampered_certificate_fails_verification() {
        let key = KeyPair::generate_rsa(1024).unwrap();
        let mut cert = self_signed(&key, "crabs.crabs");
        cert.inner.tbs_certificate.subject = DistinguishedName::builder()
            .common_name("evil.crabs".to_string())
            .build()
            .as_x509_name()
            .unwrap();
        assert!(!cert.verify_signature(&key.public_key()).unwrap());
        assert!(!cert.verify_self_signed().unwrap());
    }

    #[test]
    fn test_extensions_are_decodable() {
        let key = KeyPair::generate_rsa(1024).unwrap();
        let cert = self_signed(&key, "crabs.crabs");

        let eku: ExtendedKeyUsage = cert.extension().unwrap().unwrap();
        assert_eq!(eku.usage, vec![ExtendedKeyUsageOption::ServerAuth]);
        let bc: BasicConstraints = cert.extension().unwrap().unwrap();
        assert!(!bc.is_ca);
        assert!(cert.extension::<KeyUsage>().unwrap().is_some());
    }

    #[test]
    fn test_validity_readable_without_rsa_key() {
        let key = KeyPair::generate_rsa(1024).unwrap();
        let mut cert = self_signed(&key, "crabs.crabs");
        cert.inner
            .tbs_certificate
            .subject_public_key_info
            .algorithm
            .oid = const_oid::db::rfc8410::ID_ED_25519;
        let reparsed = Certificate::from_der(&cert.to_der().unwrap()).unwrap();

        assert!(reparsed.public_key().is_err());
        assert_eq!(reparsed.validity().length(), time::Duration::hours(24));
        assert_eq!(reparsed.subject_common_name().unwrap(), "crabs.crabs");
    }

    #[test]
    fn test_validity_past_2049_round_trips() {
        let key = KeyPair::generate_rsa(1024).unwrap();
        let cert_info = CertificationRequestInfo::builder()
            .subject(
                DistinguishedName::builder()
                    .common_name("far.future".to_string())
                    .build(),
            )
            .subject_public_key(PublicKey::from_key_pair(&key))
            .build();
        // 2060-01-01T00:00:00Z
        let not_before = time::OffsetDateTime::from_unix_timestamp(2_840_140_800).unwrap();
        let validity = Validity::starting_at(not_before, time::Duration::hours(24));
        let cert = Certificate::new_self_signed(&cert_info, &key, validity.clone()).unwrap();

        let parsed = Certificate::from_pem(&cert.to_pem().unwrap()).unwrap();
        assert_eq!(parsed.validity(), validity);
        assert!(parsed.verify_self_signed().unwrap());
    }

    #[test]
    fn test_from_pem_rejects_key_block() {
        let key = KeyPair::generate_rsa(1024).unwrap();
        let err = Certificate::from_pem(&key.to_pkcs1_pem().unwrap()).unwrap_err();
        assert!(matches!(err, TlsFixtureError::DecodingError(_)));
    }
}

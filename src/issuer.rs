use der::Encode;
use tracing::debug;
use x509_cert::certificate::CertificateInner;

use crate::cert::Certificate;
use crate::cert::extensions::BasicConstraints;
use crate::cert::extensions::ExtendedKeyUsage;
use crate::cert::extensions::KeyUsage;
use crate::cert::params::Validity;
use crate::cert::params::{CertificationRequestInfo, DistinguishedName, ExtensionParam};
use crate::error::{Result, TlsFixtureError};
use crate::key::KeyPair;
use crate::pki;
use crate::tbs_certificate::{self, TbsCertificate};

/// Size of the random serial number drawn for every issued certificate.
pub const SERIAL_NUMBER_BITS: usize = 128;

/// Represents an entity capable of issuing certificates.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> DistinguishedName;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Issues a certificate based on the provided certification request information.
    ///
    /// The serial number is drawn at random. The extensions are, in order,
    /// KeyUsage (critical) carrying exactly the requested bits when any is
    /// set, ExtendedKeyUsage when usages were requested, and BasicConstraints
    /// (critical, CA false).
    ///
    /// Any failure here is reported as
    /// [`TlsFixtureError::CertificateSigningFailure`].
    fn issue(
        &self,
        cert_request: &CertificationRequestInfo,
        validity: Validity,
    ) -> Result<Certificate> {
        let tbs_cert = TbsCertificate {
            serial_number: tbs_certificate::random_serial_number(SERIAL_NUMBER_BITS)?,
            issuer: self.issuer_name(),
            validity,
            subject: cert_request.subject.clone(),
            subject_public_key: cert_request.subject_public_key.clone(),
            extensions: request_extensions(cert_request).map_err(signing_failure)?,
        };

        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner().map_err(signing_failure)?;
        let tbs_der = tbs_cert_inner
            .to_der()
            .map_err(|e| TlsFixtureError::CertificateSigningFailure(e.to_string()))?;
        let signature = pki::sign_data(&tbs_der, self.signing_key())?;

        debug!(
            serial_len = tbs_cert.serial_number.len(),
            tbs_len = tbs_der.len(),
            signature_len = signature.len(),
            "certificate signed"
        );

        let cert_inner = CertificateInner {
            signature_algorithm: tbs_cert_inner.signature.clone(),
            tbs_certificate: tbs_cert_inner,
            signature: der::asn1::BitString::from_bytes(&signature)
                .map_err(|e| TlsFixtureError::CertificateSigningFailure(e.to_string()))?,
        };

        Ok(Certificate { inner: cert_inner })
    }
}

fn signing_failure(err: TlsFixtureError) -> TlsFixtureError {
    match err {
        TlsFixtureError::CertificateSigningFailure(_) => err,
        other => TlsFixtureError::CertificateSigningFailure(other.to_string()),
    }
}

fn request_extensions(cert_request: &CertificationRequestInfo) -> Result<Vec<ExtensionParam>> {
    let mut extensions = Vec::with_capacity(3);

    if !cert_request.key_usages.is_empty() {
        extensions.push(ExtensionParam::from_extension(
            KeyUsage(cert_request.key_usages),
            true,
        )?);
    }

    if !cert_request.usages.is_empty() {
        let extended_key_usage = ExtendedKeyUsage {
            usage: cert_request.usages.clone(),
        };
        extensions.push(ExtensionParam::from_extension(extended_key_usage, false)?);
    }

    // Issued certificates are never CAs
    let basic_constraints = BasicConstraints {
        is_ca: false,
        max_path_length: None,
    };
    extensions.push(ExtensionParam::from_extension(basic_constraints, true)?);

    Ok(extensions)
}

/// Issuer for self-signed certificates: the subject names itself and signs
/// with its own key.
pub struct SelfIssuer<'a> {
    pub name: DistinguishedName,
    pub key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> DistinguishedName {
        self.name.clone()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }
}

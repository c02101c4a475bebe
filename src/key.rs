use pkcs8::DecodePublicKey;
use rsa::{
    RsaPrivateKey, RsaPublicKey,
    pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey},
    traits::PublicKeyParts,
};
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::{Result, TlsFixtureError};
use crate::pem_utils;

/// PEM label of a PKCS#1 RSA private key.
pub const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";

/// An RSA key pair. RSA is the only key type fixtures are generated for.
#[derive(Debug, Clone)]
pub struct KeyPair {
    private: Box<RsaPrivateKey>,
    public: RsaPublicKey,
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    ///
    /// The size is not validated here; whatever the RSA primitive rejects comes
    /// back as [`TlsFixtureError::KeyGenerationFailure`].
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| TlsFixtureError::KeyGenerationFailure(e.to_string()))?;
        Ok(Self::from_private(private))
    }

    fn from_private(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        KeyPair {
            private: Box::new(private),
            public,
        }
    }

    /// Import a PKCS#1 DER-encoded RSA private key.
    pub fn import_from_pkcs1_der(der: &[u8]) -> Result<Self> {
        let private = RsaPrivateKey::from_pkcs1_der(der)
            .map_err(|e| TlsFixtureError::KeyParseFailure(e.to_string()))?;
        Ok(Self::from_private(private))
    }

    /// Import a PEM-encoded PKCS#1 RSA private key.
    ///
    /// The block label is not checked: whatever the first block holds must parse
    /// as PKCS#1.
    pub fn import_from_pkcs1_pem(pem: &str) -> Result<Self> {
        let der = pem_utils::pem_to_der(pem)
            .map_err(|e| TlsFixtureError::KeyParseFailure(e.to_string()))?;
        Self::import_from_pkcs1_der(&der)
    }

    /// Export the private key as PKCS#1 DER.
    pub fn to_pkcs1_der(&self) -> Result<Vec<u8>> {
        let document = self
            .private
            .to_pkcs1_der()
            .map_err(|e| TlsFixtureError::EncodingError(e.to_string()))?;
        Ok(document.as_bytes().to_vec())
    }

    /// Export the private key as an `RSA PRIVATE KEY` PEM block.
    pub fn to_pkcs1_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(
            &self.to_pkcs1_der()?,
            RSA_PRIVATE_KEY_LABEL,
        ))
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.public.n().bits()
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.public.clone())
    }
}

/// The public half of an RSA key pair, as carried by a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(pub RsaPublicKey);

impl PublicKey {
    pub fn from_key_pair(key_pair: &KeyPair) -> Self {
        key_pair.public_key()
    }

    pub fn to_x509spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        SubjectPublicKeyInfoOwned::from_key(self.0.clone())
            .map_err(|e| TlsFixtureError::EncodingError(e.to_string()))
    }

    /// Reads an RSA public key from a subject public key info.
    pub fn from_x509spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        let der = der::Encode::to_der(spki)?;
        let public = RsaPublicKey::from_public_key_der(&der).map_err(|e| {
            TlsFixtureError::DecodingError(format!("not an RSA public key: {e}"))
        })?;
        Ok(PublicKey(public))
    }

    pub fn bits(&self) -> usize {
        self.0.n().bits()
    }
}

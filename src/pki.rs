use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use sha2::Sha256;

use crate::error::{Result, TlsFixtureError};
use crate::key::{KeyPair, PublicKey};

/// Signs `data` with RSASSA-PKCS1-v1_5 over SHA-256.
pub fn sign_data(data: &[u8], key: &KeyPair) -> Result<Vec<u8>> {
    let signing_key: SigningKey<Sha256> = SigningKey::new(key.private_key().clone());
    let signature = signing_key
        .try_sign(data)
        .map_err(|e| TlsFixtureError::CertificateSigningFailure(e.to_string()))?;
    Ok(signature.to_vec())
}

/// Checks an RSASSA-PKCS1-v1_5 / SHA-256 signature over `data`.
///
/// Returns `Ok(false)` for a well-formed signature that does not verify.
pub fn verify_signature(data: &[u8], signature: &[u8], key: &PublicKey) -> Result<bool> {
    let verifying_key: VerifyingKey<Sha256> = VerifyingKey::new(key.0.clone());
    let signature = Signature::try_from(signature)
        .map_err(|e| TlsFixtureError::DecodingError(format!("malformed signature: {e}")))?;
    Ok(verifying_key.verify(data, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let key = KeyPair::generate_rsa(1024).unwrap();
        let message = b"tbs certificate bytes";

        let signature = sign_data(message, &key).unwrap();
        assert_eq!(signature.len(), 128);
        assert!(verify_signature(message, &signature, &key.public_key()).unwrap());
        assert!(!verify_signature(b"other bytes", &signature, &key.public_key()).unwrap());
    }

    #[test]
    fn test_verify_with_wrong_key() {
        let key = KeyPair::generate_rsa(1024).unwrap();
        let other = KeyPair::generate_rsa(1024).unwrap();
        let signature = sign_data(b"payload", &key).unwrap();
        assert!(!verify_signature(b"payload", &signature, &other.public_key()).unwrap());
    }
}

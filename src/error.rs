//! use tlsfixture::error::TlsFixtureError;

use thiserror::Error;

/// Represents errors that can occur while producing TLS fixtures.
///
/// The fixture generators never recover from any of these. Each variant names
/// the step that failed so a test that `expect`s the result gets a useful panic.
#[derive(Debug, Error, Clone)]
pub enum TlsFixtureError {
    /// The RSA primitive could not produce a key (entropy failure, unsupported size).
    #[error("Key generation failed: {0}")]
    KeyGenerationFailure(String),

    /// The key PEM did not decode to a PKCS#1 RSA private key.
    #[error("Key parse failed: {0}")]
    KeyParseFailure(String),

    /// Drawing the serial, encoding the TBS certificate, or signing it failed.
    #[error("Certificate signing failed: {0}")]
    CertificateSigningFailure(String),

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<der::Error> for TlsFixtureError {
    /// Converts a `der::Error` into a `TlsFixtureError`.
    fn from(err: der::Error) -> Self {
        TlsFixtureError::DecodingError(err.to_string())
    }
}

impl From<pem::PemError> for TlsFixtureError {
    fn from(err: pem::PemError) -> Self {
        TlsFixtureError::DecodingError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TlsFixtureError>;

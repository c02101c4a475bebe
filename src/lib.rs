//! # tlsfixture - Disposable TLS Fixtures in Pure Rust
//!
//! tlsfixture produces throwaway RSA private keys and self-signed X.509 server
//! certificates as PEM text, for tests that need a TLS key and certificate but
//! do not care where they came from. It is built entirely with RustCrypto
//! libraries; OpenSSL is only used by the test suite to cross-check output.
//!
//! It is not a certificate authority: there is no chain building, revocation,
//! key storage or support for key types other than RSA.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tlsfixture::fixture;
//!
//! # fn main() -> Result<(), tlsfixture::error::TlsFixtureError> {
//! let key_pem = fixture::rsa_private_key_pem(2048)?;
//! let cert_pem = fixture::self_signed_certificate_pem(&key_pem, "example.com")?;
//!
//! // Single-line form for templated configuration
//! let line = format!("private_key_pem = \"{}\"", fixture::escape_pem_newlines(&key_pem));
//! assert!(!line.contains('\n'));
//! # let _ = cert_pem;
//! # Ok(())
//! # }
//! ```
//!
//! Every fixture certificate has:
//! - a random 128-bit serial number
//! - subject and issuer `O=ACME Examples, Inc, CN=<common name>`
//! - a validity window of exactly 24 hours starting at generation time
//! - KeyUsage digitalSignature + keyEncipherment, ExtendedKeyUsage serverAuth,
//!   and BasicConstraints with CA unset
//! - a sha256WithRSAEncryption signature by its own key
//!
//! ## Inspecting What Was Generated
//!
//! ```rust,no_run
//! use tlsfixture::{cert::Certificate, fixture, key::KeyPair};
//!
//! # fn main() -> Result<(), tlsfixture::error::TlsFixtureError> {
//! let key_pem = fixture::rsa_private_key_pem(2048)?;
//! let cert_pem = fixture::self_signed_certificate_pem(&key_pem, "example.com")?;
//!
//! let key = KeyPair::import_from_pkcs1_pem(&key_pem)?;
//! let cert = Certificate::from_pem(&cert_pem)?;
//! assert_eq!(cert.subject_common_name()?, "example.com");
//! assert!(cert.verify_signature(&key.public_key())?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Nothing in this crate retries or recovers. Failures come back as
//! [`error::TlsFixtureError`] and test code is expected to `expect` them:
//!
//! ```rust
//! use tlsfixture::{error::TlsFixtureError, fixture};
//!
//! match fixture::self_signed_certificate_pem("not a key", "example.com") {
//!     Ok(_) => unreachable!(),
//!     Err(TlsFixtureError::KeyParseFailure(msg)) => println!("bad key PEM: {}", msg),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`fixture`]: The one-call key, certificate and escaping helpers
//! - [`key`]: RSA key generation and PKCS#1 import/export
//! - [`cert`]: Certificate encoding/decoding, inspection and extensions
//! - [`issuer`]: Certificate issuing
//! - [`pki`]: Signing and signature verification
//! - [`tbs_certificate`]: Low-level certificate structure and serial numbers
//! - [`error`]: Error types

pub mod cert;
pub mod error;
pub mod fixture;
pub mod issuer;
pub mod key;
pub mod pem_utils;
pub mod pki;
pub mod tbs_certificate;

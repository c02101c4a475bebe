use crate::error::{Result, TlsFixtureError};

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
///
/// Lines are wrapped at 64 columns and terminated with `\n`, including the
/// line after the END marker.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Convert a PEM‑encoded string to DER‑encoded bytes.
///
/// Only the first PEM block is read; anything after it is ignored.
pub fn pem_to_der(pem_str: &str) -> Result<Vec<u8>> {
    let pem = pem::parse(pem_str)?;
    Ok(pem.contents().to_vec())
}

/// Like [`pem_to_der`], but rejects a block whose label is not `label`.
pub fn pem_to_der_with_label(pem_str: &str, label: &str) -> Result<Vec<u8>> {
    let pem = pem::parse(pem_str)?;
    if pem.tag() != label {
        return Err(TlsFixtureError::DecodingError(format!(
            "expected a {label} PEM block, found {}",
            pem.tag()
        )));
    }
    Ok(pem.contents().to_vec())
}

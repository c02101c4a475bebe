use bon::Builder;
use const_oid::ObjectIdentifier;
use der::{Tag, Tagged};
use der::asn1::{Any, SetOfVec};
use time::Duration;
use time::OffsetDateTime;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{RdnSequence, RelativeDistinguishedName};

use super::extensions::KeyUsages;
use super::extensions::{FlagSet, ToAndFromX509Extension};
pub use crate::cert::extensions::ExtendedKeyUsageOption;
use crate::error::TlsFixtureError;
use crate::key::PublicKey;

/// Parameters for building an X.509 certificate.
///
/// # Fields
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `key_usages` - Key usage bits, written exactly as given.
/// * `usages` - A list of extended key usage options.
#[derive(Clone, Debug, Builder)]
pub struct CertificationRequestInfo {
    pub subject: DistinguishedName,
    pub subject_public_key: PublicKey,
    #[builder(default)]
    pub key_usages: FlagSet<KeyUsages>,
    #[builder(default)]
    pub usages: Vec<ExtendedKeyUsageOption>,
}

/// Distinguished name of a certificate subject or issuer.
///
/// Only the attributes fixtures need are modelled. They are encoded as one
/// RDN each, organization first, as UTF8String values taken verbatim.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: String,
    pub organization: Option<String>,
}

impl DistinguishedName {
    /// Converts the distinguished name to an X.509-compatible format.
    pub fn as_x509_name(&self) -> Result<x509_cert::name::DistinguishedName, TlsFixtureError> {
        let mut rdns = Vec::with_capacity(2);
        if let Some(organization) = &self.organization {
            rdns.push(single_attribute_rdn(
                const_oid::db::rfc4519::O,
                organization,
            )?);
        }
        rdns.push(single_attribute_rdn(
            const_oid::db::rfc4519::CN,
            &self.common_name,
        )?);
        Ok(RdnSequence(rdns))
    }

    /// Creates a `DistinguishedName` from an X.509-compatible format.
    ///
    /// String attributes of any of the usual directory string types are
    /// accepted; attributes other than CN and O are ignored.
    pub fn from_x509_name(
        x509dn: &x509_cert::name::DistinguishedName,
    ) -> Result<Self, TlsFixtureError> {
        let mut name = DistinguishedName::default();

        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                if attr.oid == const_oid::db::rfc4519::CN {
                    name.common_name = attribute_string(attr)?;
                } else if attr.oid == const_oid::db::rfc4519::O {
                    name.organization = Some(attribute_string(attr)?);
                }
            }
        }

        Ok(name)
    }
}

fn single_attribute_rdn(
    oid: ObjectIdentifier,
    value: &str,
) -> Result<RelativeDistinguishedName, TlsFixtureError> {
    let atv = AttributeTypeAndValue {
        oid,
        value: Any::new(Tag::Utf8String, value.as_bytes())
            .map_err(|e| TlsFixtureError::InvalidInput(e.to_string()))?,
    };
    let set = SetOfVec::try_from(vec![atv])
        .map_err(|e| TlsFixtureError::InvalidInput(e.to_string()))?;
    Ok(RelativeDistinguishedName(set))
}

fn attribute_string(attr: &AttributeTypeAndValue) -> Result<String, TlsFixtureError> {
    match attr.value.tag() {
        Tag::Utf8String | Tag::PrintableString | Tag::Ia5String | Tag::TeletexString => {
            String::from_utf8(attr.value.value().to_vec()).map_err(|e| {
                TlsFixtureError::DecodingError(format!("attribute {} is not UTF-8: {e}", attr.oid))
            })
        }
        tag => Err(TlsFixtureError::DecodingError(format!(
            "attribute {} has unsupported string type {tag}",
            attr.oid
        ))),
    }
}

/// Certificate validity period.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// A validity window of `length` starting at `not_before`.
    ///
    /// Sub-second precision is dropped, since certificates carry whole seconds.
    pub fn starting_at(not_before: OffsetDateTime, length: Duration) -> Self {
        let not_before = not_before.replace_nanosecond(0).unwrap_or(not_before);
        Self {
            not_before,
            not_after: not_before + length,
        }
    }

    /// Creates a validity period starting now for the given number of hours.
    pub fn for_hours(hours: i64) -> Self {
        Self::starting_at(OffsetDateTime::now_utc(), Duration::hours(hours))
    }

    pub fn length(&self) -> Duration {
        self.not_after - self.not_before
    }
}

impl From<&x509_cert::time::Validity> for Validity {
    fn from(validity: &x509_cert::time::Validity) -> Self {
        Self {
            not_before: validity.not_before.to_system_time().into(),
            not_after: validity.not_after.to_system_time().into(),
        }
    }
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(
        extension: E,
        critical: bool,
    ) -> Result<Self, TlsFixtureError> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E, TlsFixtureError> {
        if self.oid != E::OID {
            return Err(TlsFixtureError::InvalidInput(format!(
                "extension {} is not {}",
                self.oid,
                E::OID
            )));
        }
        E::from_x509_extension_value(&self.value)
    }
}

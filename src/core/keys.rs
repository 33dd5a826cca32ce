//! Key-set loading and key matching by `kid`.
//!
//! Two key sources are supported: a certificate set mapping each `kid`
//! to a PEM certificate, and a JWKS document whose RSA records expose a
//! base64url modulus and exponent. Lookups never fail: a missing `kid`
//! or an unknown key simply resolves to `None` so the caller can apply
//! its own rejection policy.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::decoder::DecodedHeader;
use crate::error::KeySetError;

/// Maximum length, in bytes, of a `kid` echoed back in messages.
const MAX_DISPLAY_KID_LEN: usize = 128;

/// The only key type usable for modulus/exponent resolution.
const RSA_KEY_TYPE: &str = "RSA";

/// Provider certificates keyed by `kid`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CertificateSet(HashMap<String, String>);

impl CertificateSet {
    /// Parse a certificate-set document: a JSON object of `kid` to PEM.
    ///
    /// # Errors
    ///
    /// Returns [`KeySetError::InvalidJson`] if the document is not a JSON
    /// object of strings.
    pub fn from_json(document: &str) -> Result<Self, KeySetError> {
        serde_json::from_str(document).map_err(|e| KeySetError::InvalidJson {
            kind: "certificate set",
            reason: e.to_string(),
        })
    }

    /// Look up the certificate for a `kid`.
    pub fn get(&self, kid: &str) -> Option<&str> {
        self.0.get(kid).map(String::as_str)
    }

    /// Iterate over `(kid, certificate)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of certificates in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no certificates.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for CertificateSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single record of a JWKS document.
///
/// Every field is optional so that foreign key types (EC, oct, ...) in
/// the same document do not prevent the RSA records from loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyRecord {
    /// Key type, e.g. `"RSA"` or `"EC"`.
    #[serde(default)]
    pub kty: Option<String>,
    /// Key identifier.
    #[serde(default)]
    pub kid: Option<String>,
    /// Base64url RSA modulus.
    #[serde(default)]
    pub n: Option<String>,
    /// Base64url RSA exponent.
    #[serde(default)]
    pub e: Option<String>,
    /// Declared algorithm, carried opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Declared use (`sig`/`enc`), carried opaquely.
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
}

impl KeyRecord {
    /// The RSA material of this record, if it is a complete RSA key.
    fn rsa_material(&self) -> Option<RsaKeyMaterial> {
        if self.kty.as_deref() != Some(RSA_KEY_TYPE) {
            return None;
        }
        Some(RsaKeyMaterial {
            modulus: self.n.clone()?,
            exponent: self.e.clone()?,
        })
    }
}

/// An ordered JWKS key list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonWebKeySet {
    /// Records in document order.
    pub keys: Vec<KeyRecord>,
}

/// Accepted JWKS document shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum JwksDocument {
    Object {
        #[serde(default)]
        keys: Vec<KeyRecord>,
    },
    Array(Vec<KeyRecord>),
}

impl JsonWebKeySet {
    /// Parse a JWKS document, either `{"keys": [...]}` or a bare array.
    ///
    /// An object without `keys` loads as an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`KeySetError::InvalidJson`] if the document is not valid
    /// JSON or its records are not objects with string fields.
    pub fn from_json(document: &str) -> Result<Self, KeySetError> {
        let value: serde_json::Value =
            serde_json::from_str(document).map_err(|e| KeySetError::InvalidJson {
                kind: "JWKS",
                reason: e.to_string(),
            })?;

        let keys = match serde_json::from_value(value) {
            Ok(JwksDocument::Object { keys }) | Ok(JwksDocument::Array(keys)) => keys,
            Err(_) => {
                return Err(KeySetError::InvalidJson {
                    kind: "JWKS",
                    reason: "expected an object with a 'keys' array or an array of key records"
                        .to_string(),
                });
            }
        };

        Ok(Self { keys })
    }

    /// Iterate over `(kid, material)` for every usable RSA record,
    /// keeping only the first record per `kid`.
    pub fn rsa_keys(&self) -> impl Iterator<Item = (&str, RsaKeyMaterial)> {
        let mut seen = std::collections::HashSet::new();
        self.keys.iter().filter_map(move |record| {
            let kid = record.kid.as_deref()?;
            let material = record.rsa_material()?;
            seen.insert(kid).then_some((kid, material))
        })
    }
}

impl From<Vec<KeyRecord>> for JsonWebKeySet {
    fn from(keys: Vec<KeyRecord>) -> Self {
        Self { keys }
    }
}

/// An RSA public key as base64url modulus and exponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsaKeyMaterial {
    /// Base64url modulus (`n`).
    pub modulus: String,
    /// Base64url exponent (`e`).
    pub exponent: String,
}

/// Key material resolved for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResolvedKey {
    /// A PEM certificate from a certificate set.
    Certificate {
        /// The PEM text.
        certificate: String,
    },
    /// RSA modulus and exponent from a JWKS.
    Rsa(RsaKeyMaterial),
}

/// A key collection to resolve against.
#[derive(Debug, Clone)]
pub enum KeySource {
    /// Provider certificates keyed by `kid`.
    Certificates(CertificateSet),
    /// A JWKS document.
    Jwks(JsonWebKeySet),
}

/// Find the certificate whose `kid` matches the token header.
///
/// Returns `None` when the header has no `kid` or the set has no entry
/// for it.
pub fn resolve_cert<'a>(header: &DecodedHeader, certs: &'a CertificateSet) -> Option<&'a str> {
    let Some(kid) = header.kid() else {
        debug!("token header has no kid; no certificate resolved");
        return None;
    };

    let cert = certs.get(kid);
    if cert.is_none() {
        debug!(kid = %sanitize_kid(kid), "no certificate for kid");
    }
    cert
}

/// Find the RSA modulus and exponent whose `kid` matches the token header.
///
/// Scans the records in order; the first complete RSA record with the
/// header's `kid` wins. Records of any other key type are skipped even
/// when their `kid` matches.
pub fn resolve_jwks(header: &DecodedHeader, keys: &[KeyRecord]) -> Option<RsaKeyMaterial> {
    let Some(kid) = header.kid() else {
        debug!("token header has no kid; no JWKS key resolved");
        return None;
    };

    let found = keys
        .iter()
        .filter(|record| record.kid.as_deref() == Some(kid))
        .find_map(KeyRecord::rsa_material);

    if found.is_none() {
        debug!(kid = %sanitize_kid(kid), records = keys.len(), "no RSA key for kid");
    }
    found
}

/// Resolve key material for a token header against either key source.
pub fn resolve(header: &DecodedHeader, source: &KeySource) -> Option<ResolvedKey> {
    match source {
        KeySource::Certificates(certs) => {
            resolve_cert(header, certs).map(|certificate| ResolvedKey::Certificate {
                certificate: certificate.to_string(),
            })
        }
        KeySource::Jwks(jwks) => resolve_jwks(header, &jwks.keys).map(ResolvedKey::Rsa),
    }
}

/// Sanitize a `kid` value for safe inclusion in logs and error messages.
///
/// Replaces control characters (including ANSI escape sequences) with
/// the Unicode replacement character, then truncates to 128 bytes on a
/// character boundary.
pub fn sanitize_kid(kid: &str) -> String {
    let clean: String = kid
        .chars()
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect();

    if clean.len() <= MAX_DISPLAY_KID_LEN {
        return clean;
    }

    let end = clean
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= MAX_DISPLAY_KID_LEN)
        .last()
        .unwrap_or(0);
    format!("{}...(truncated)", &clean[..end])
}

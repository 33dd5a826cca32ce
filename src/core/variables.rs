//! Gateway variable export.
//!
//! A gateway consumes results as flat named variables rather than
//! structured values. These helpers flatten claims, key sets and
//! resolved keys into `(name, value)` assignments using the variable
//! names gateway flows conventionally read.
//!
//! Rendered output is one assignment per line. Every value originates in
//! an unverified token or key-set document, so string values are escaped
//! and key IDs that cannot form a variable name are dropped.

use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

use crate::core::claims::ClaimsResult;
use crate::core::keys::{self, CertificateSet, JsonWebKeySet, ResolvedKey};

/// One gateway variable assignment.
pub type Assignment = (String, Value);

/// Default prefix for per-`kid` certificate variables.
pub const DEFAULT_CERT_PREFIX: &str = "cert";

/// Default prefix for per-`kid` JWKS variables.
pub const DEFAULT_JWKS_PREFIX: &str = "jwks";

/// Flatten a claims result. Absent fields produce no assignment.
pub fn claims_variables(claims: &ClaimsResult) -> Vec<Assignment> {
    let mut vars = Vec::new();
    let mut push = |name: &str, value: Option<Value>| {
        if let Some(value) = value {
            vars.push((name.to_string(), value));
        }
    };

    push("issuer", claims.issuer.clone());
    push("jwtExpiration", claims.expiration.map(Value::from));
    push("accessTokenExpiration", claims.ttl_millis.map(Value::from));
    push("expired", claims.expired.map(Value::from));
    push("dealerId", claims.dealer_id.clone());
    push("active", claims.active.clone());
    push("jti", claims.jti.clone());
    push("subject", claims.subject.clone());
    push("audience", claims.audience.clone().map(Value::from));
    push("issuedAt", claims.issued_at.map(Value::from));

    vars
}

/// Whether a `kid` can be embedded in a dotted variable name.
fn is_name_segment(kid: &str) -> bool {
    let usable = !kid.is_empty()
        && !kid
            .chars()
            .any(|c| c == '=' || c.is_whitespace() || c.is_control());
    if !usable {
        debug!(kid = %keys::sanitize_kid(kid), "skipping kid unusable in a variable name");
    }
    usable
}

/// Flatten a certificate set into `<prefix>.<kid>` assignments.
pub fn certificate_variables(certs: &CertificateSet, prefix: &str) -> Vec<Assignment> {
    certs
        .iter()
        .filter(|(kid, _)| is_name_segment(kid))
        .map(|(kid, pem)| (format!("{prefix}.{kid}"), Value::from(pem)))
        .collect()
}

/// Flatten the usable RSA keys of a JWKS into
/// `<prefix>.<kid>.modulus` / `<prefix>.<kid>.exponent` assignments.
pub fn jwks_variables(jwks: &JsonWebKeySet, prefix: &str) -> Vec<Assignment> {
    jwks.rsa_keys()
        .filter(|(kid, _)| is_name_segment(kid))
        .flat_map(|(kid, material)| {
            [
                (format!("{prefix}.{kid}.modulus"), Value::from(material.modulus)),
                (format!("{prefix}.{kid}.exponent"), Value::from(material.exponent)),
            ]
        })
        .collect()
}

/// Flatten a resolved key into the variables a verifier reads.
pub fn resolved_key_variables(key: &ResolvedKey) -> Vec<Assignment> {
    match key {
        ResolvedKey::Certificate { certificate } => {
            vec![("certificate".to_string(), Value::from(certificate.as_str()))]
        }
        ResolvedKey::Rsa(material) => vec![
            ("key_modulus".to_string(), Value::from(material.modulus.as_str())),
            ("key_exponent".to_string(), Value::from(material.exponent.as_str())),
        ],
    }
}

/// Render an assignment as a single `name=value` line.
///
/// Strings are written unquoted with backslash, line breaks, tabs and
/// other control characters escaped; a multi-line PEM therefore stays on
/// one line. Other values are written as compact JSON.
pub fn format_assignment((name, value): &Assignment) -> String {
    let name = escape(name);
    match value {
        Value::String(s) => format!("{name}={}", escape(s)),
        other => format!("{name}={other}"),
    }
}

fn escape(raw: &str) -> Cow<'_, str> {
    if !raw.chars().any(|c| c == '\\' || c.is_control()) {
        return Cow::Borrowed(raw);
    }

    let mut escaped = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.extend(c.escape_unicode()),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

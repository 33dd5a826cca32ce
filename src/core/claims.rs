//! Caller-facing claim extraction.
//!
//! Turns a decoded payload into the handful of values a gateway acts on:
//! the issuer, the expiration with its time-to-live relative to an
//! evaluation instant, and the application pass-through claims.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::core::decoder::DecodedPayload;

/// Claims derived from a token payload.
///
/// `expiration`, `ttl_millis` and `expired` are either all present or
/// all absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsResult {
    /// The `iss` claim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Value>,
    /// The `exp` claim in whole seconds since the epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<i64>,
    /// Milliseconds until expiry; negative once expired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_millis: Option<i64>,
    /// Whether the token had expired at the evaluation instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
    /// The `dealerId` claim, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_id: Option<Value>,
    /// The `active` claim, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<Value>,
    /// The `jti` claim, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<Value>,
    /// The `sub` claim, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Value>,
    /// The `aud` claim; multiple audiences are joined with `,`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    /// The `iat` claim in whole seconds since the epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,
}

/// Extract the claim set from a payload, evaluated at `now`.
///
/// The evaluation instant is truncated to whole seconds before the
/// time-to-live is computed. Claims missing from the payload (or set to
/// `null`) stay absent in the result.
pub fn extract(payload: &DecodedPayload, now: DateTime<Utc>) -> ClaimsResult {
    let mut result = ClaimsResult {
        issuer: payload.claim("iss").cloned(),
        dealer_id: payload.claim("dealerId").cloned(),
        active: payload.claim("active").cloned(),
        jti: payload.claim("jti").cloned(),
        subject: payload.claim("sub").cloned(),
        audience: payload.claim("aud").and_then(audience),
        issued_at: payload.claim("iat").and_then(numeric_date),
        ..ClaimsResult::default()
    };

    if let Some(exp) = payload.claim("exp") {
        match numeric_date(exp) {
            Some(expiration) => {
                let ttl_millis = expiration
                    .saturating_sub(now.timestamp())
                    .saturating_mul(1000);
                result.expiration = Some(expiration);
                result.ttl_millis = Some(ttl_millis);
                result.expired = Some(ttl_millis < 0);
            }
            None => debug!("ignoring exp claim that is not a numeric date"),
        }
    }

    result
}

/// Read a JWT NumericDate as whole seconds.
///
/// Accepts integers, finite floats (floored) and decimal strings.
fn numeric_date(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.floor() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Read `aud` as a single string or a list of strings.
fn audience(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let names: Option<Vec<&str>> = items.iter().map(Value::as_str).collect();
            match names {
                Some(names) if !names.is_empty() => Some(names.join(",")),
                _ => {
                    debug!("ignoring aud claim that is not a list of strings");
                    None
                }
            }
        }
        _ => None,
    }
}

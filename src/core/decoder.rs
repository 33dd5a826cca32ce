//! JWT decoding logic.
//!
//! Handles splitting a raw JWT string into its three parts (header,
//! payload, signature), base64url-decoding the header and payload, and
//! parsing each as a JSON object. The signature is never decoded.

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::base64url;
use crate::error::ParseError;

/// The JOSE header of a token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedHeader(Map<String, Value>);

impl DecodedHeader {
    /// The key identifier, if the header carries one as a string.
    pub fn kid(&self) -> Option<&str> {
        self.0.get("kid").and_then(Value::as_str)
    }

    /// The signing algorithm, if present.
    pub fn alg(&self) -> Option<&str> {
        self.0.get("alg").and_then(Value::as_str)
    }

    /// Look up an arbitrary header field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Borrow the raw header fields.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for DecodedHeader {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// The claims of a token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedPayload(Map<String, Value>);

impl DecodedPayload {
    /// Look up a claim. JSON `null` is reported as absent.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// Borrow the raw claims.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for DecodedPayload {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// The decoded parts of a JWT.
///
/// Implements a custom `Debug` that redacts `payload` and `signature`
/// to prevent accidental leakage of sensitive claim data.
pub struct ParsedToken {
    /// The parsed JWT header (typically contains `alg`, `typ` and `kid`).
    pub header: DecodedHeader,
    /// The parsed JWT payload (claims).
    pub payload: DecodedPayload,
    /// The raw base64url-encoded signature segment, untouched.
    pub signature: String,
}

impl fmt::Debug for ParsedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedToken")
            .field("header", &self.header)
            .field("payload", &"[REDACTED]")
            .field("signature", &"[REDACTED]")
            .finish()
    }
}

/// Parse a compact JWT into its constituent parts.
///
/// # Errors
///
/// Returns [`ParseError::MalformedStructure`] if the token doesn't have
/// exactly three parts, [`ParseError::Decode`] if base64url decoding
/// fails, or [`ParseError::InvalidJson`] if a segment is not a JSON
/// object.
pub fn parse_token(token: &str) -> Result<ParsedToken, ParseError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        debug!(segments = parts.len(), "rejecting token with wrong segment count");
        return Err(ParseError::MalformedStructure {
            segments: parts.len(),
        });
    }

    let header = decode_segment(parts[0], "header")?;
    let payload = decode_segment(parts[1], "payload")?;

    Ok(ParsedToken {
        header: DecodedHeader(header),
        payload: DecodedPayload(payload),
        signature: parts[2].to_string(),
    })
}

/// Base64url-decode a segment, drop NUL bytes, and parse it as a JSON object.
fn decode_segment(encoded: &str, segment: &'static str) -> Result<Map<String, Value>, ParseError> {
    let mut bytes = base64url::decode(encoded).map_err(|source| {
        debug!(segment, error = %source, "segment is not valid base64url");
        ParseError::Decode { segment, source }
    })?;
    bytes.retain(|&b| b != 0);

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(ParseError::InvalidJson {
            segment,
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
        Err(e) => {
            debug!(segment, error = %e, "segment is not valid JSON");
            Err(ParseError::InvalidJson {
                segment,
                reason: e.to_string(),
            })
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! jwt-gate: JWT claim extraction and key resolution for API gateways.
//!
//! The library decodes compact JWTs with a strict base64url decoder,
//! resolves the verification key for a token's `kid` from either a
//! certificate set or a JWKS document, and derives the claim values a
//! gateway acts on (issuer, expiry, time-to-live, application claims).
//! Signature verification and key retrieval are left to the caller.
//!
//! ```
//! use jwt_gate::core::{claims, decoder, keys};
//!
//! // Header: {"alg":"RS256","kid":"198"}, Payload: {"exp":1000}
//! let token = decoder::parse_token(
//!     "eyJhbGciOiJSUzI1NiIsImtpZCI6IjE5OCJ9.eyJleHAiOjEwMDB9.sig",
//! )?;
//!
//! let certs = keys::CertificateSet::from_json(r#"{"198":"PEM-DATA"}"#)?;
//! assert_eq!(keys::resolve_cert(&token.header, &certs), Some("PEM-DATA"));
//!
//! let now = chrono::DateTime::from_timestamp(500, 0).unwrap();
//! let result = claims::extract(&token.payload, now);
//! assert_eq!(result.ttl_millis, Some(500_000));
//! assert_eq!(result.expired, Some(false));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

pub mod core;
pub mod error;

pub use error::{DecodeError, JwtGateError, KeySetError, ParseError, TimeExpressionError};

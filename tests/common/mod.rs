//! Shared test fixtures and helper utilities.
//!
//! Provides pre-built JWT tokens and key-set documents with known
//! contents for use across the integration tests.
#![allow(dead_code)]

/// A valid HS256-signed JWT for testing.
///
/// Header: `{"alg":"HS256","typ":"JWT"}`
/// Payload: `{"sub":"1234567890","name":"Test User","iat":1516239022}`
pub const VALID_HS256_TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
     eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IlRlc3QgVXNlciIsImlhdCI6MTUxNjIzOTAyMn0.\
     SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

/// A malformed token with only two parts (missing signature).
pub const MALFORMED_TOKEN_TWO_PARTS: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

/// A completely invalid token string.
pub const INVALID_TOKEN: &str = "not-a-valid-jwt";

/// Secret used to sign generated tokens. Nothing here verifies it.
pub const SIGNING_SECRET: &str = "jwt-gate-test-secret";

/// A certificate set as served by a rotating-certificate provider.
pub const CERTIFICATE_SET: &str = r#"{
    "198": "-----BEGIN CERTIFICATE-----\nMIIB198\n-----END CERTIFICATE-----\n",
    "200": "-----BEGIN CERTIFICATE-----\nMIIB200\n-----END CERTIFICATE-----\n"
}"#;

/// A JWKS document with an EC key sharing a `kid` with an RSA key.
pub const JWKS: &str = r#"{"keys":[
    {"use":"sig","kty":"EC","crv":"P-256","kid":"198","x":"ecx","y":"ecy"},
    {"use":"sig","e":"AQAB","kty":"RSA","alg":"RS256","n":"sTuRuR0_k","kid":"198"},
    {"use":"sig","e":"AQAB","kty":"RSA","alg":"RS256","n":"later-duplicate","kid":"198"},
    {"use":"sig","e":"AQAB","kty":"RSA","alg":"RS256","n":"xYz1","kid":"200"}
]}"#;

/// Create an HS256-signed token with the given `kid` and claims.
pub fn create_token(kid: Option<&str>, claims: &serde_json::Value) -> String {
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    let mut header = Header::new(Algorithm::HS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_secret(SIGNING_SECRET.as_bytes());
    encode(&header, claims, &key).unwrap()
}

/// Claims a dealer-portal token typically carries.
pub fn dealer_claims(exp: i64) -> serde_json::Value {
    serde_json::json!({
        "iss": "https://login.example.com",
        "exp": exp,
        "dealerId": "D1",
        "active": true,
        "jti": "abc"
    })
}

//! Domain error types for jwt-gate.
//!
//! All business-logic errors are defined here using `thiserror`.
//! The core returns the narrow error types ([`DecodeError`],
//! [`ParseError`], [`KeySetError`], [`TimeExpressionError`]); the CLI boundary folds them into
//! [`JwtGateError`] and converts that to a user-facing message.

use thiserror::Error;

/// Failure while decoding a base64url segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A character outside the base64 alphabet was encountered.
    #[error("invalid base64 character {character:?} at position {position}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Character offset within the segment.
        position: usize,
    },

    /// The decoded bytes are not valid UTF-8 text.
    #[error("decoded segment is not valid UTF-8")]
    InvalidUtf8,
}

/// Failure while parsing a compact JWT.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The token does not have the `header.payload.signature` shape.
    #[error("invalid token format: expected 3 dot-separated segments, found {segments}")]
    MalformedStructure {
        /// Number of segments actually found.
        segments: usize,
    },

    /// A segment could not be base64url-decoded.
    #[error("failed to decode {segment}: invalid base64url encoding ({source})")]
    Decode {
        /// Which segment failed ("header" or "payload").
        segment: &'static str,
        /// The underlying decoder failure.
        #[source]
        source: DecodeError,
    },

    /// A segment decoded cleanly but is not a JSON object.
    #[error("failed to parse {segment} as JSON: {reason}")]
    InvalidJson {
        /// Which segment failed ("header" or "payload").
        segment: &'static str,
        /// Description of the parsing failure.
        reason: String,
    },
}

/// Failure while loading a key-set document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeySetError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("invalid {kind} document: {reason}")]
    InvalidJson {
        /// Which kind of key set was being parsed.
        kind: &'static str,
        /// Description of the parsing failure.
        reason: String,
    },
}

/// Failure while resolving an evaluation-time expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeExpressionError {
    /// The expression matches no accepted format, or lands out of range.
    #[error("invalid time expression '{expression}': {reason}")]
    Invalid {
        /// The time expression that failed to parse.
        expression: String,
        /// Description of the parsing failure.
        reason: String,
    },
}

/// Errors surfaced at the command-line boundary.
#[derive(Debug, Error)]
pub enum JwtGateError {
    /// The token could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A key-set document could not be loaded.
    #[error(transparent)]
    KeySet(#[from] KeySetError),

    /// No key in the supplied key set matches the token.
    #[error("no matching key found for kid '{kid}'")]
    KeyNotFound {
        /// The key ID from the token header (sanitized).
        kid: String,
    },

    /// The token header carries no `kid` to resolve.
    #[error("no matching key found: token header has no 'kid'")]
    MissingKid,

    /// A `--at` time expression could not be resolved.
    #[error(transparent)]
    TimeExpression(#[from] TimeExpressionError),

    /// No token was provided via any input method.
    #[error("no token provided: pass a token as an argument, via --token-env, or through stdin")]
    NoTokenProvided,

    /// The specified environment variable is not set.
    #[error("environment variable '{name}' is not set")]
    EnvVarNotFound {
        /// Name of the missing environment variable.
        name: String,
    },

    /// The environment variable name itself is unusable.
    #[error("invalid environment variable name '{name}'")]
    InvalidEnvVarName {
        /// The rejected name.
        name: String,
    },

    /// Reading an input source (file or stdin) failed.
    #[error("failed to read {source_name}: {reason}")]
    InputError {
        /// Human-readable description of the source.
        source_name: String,
        /// Description of the read failure.
        reason: String,
    },
}

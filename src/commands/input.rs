//! Input resolution shared by the subcommands.
//!
//! A token may come from a positional argument, an environment variable,
//! or stdin, in that order of precedence. Key-set documents come from a
//! file or an environment variable.

use std::io::{IsTerminal, Read};
use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::{KeySetInput, TokenInput};
use jwt_gate::core::keys::{CertificateSet, JsonWebKeySet, KeySource};
use jwt_gate::error::JwtGateError;

/// Upper bound on bytes read from stdin or a key-set file (1 MB).
const MAX_INPUT_SIZE: u64 = 1_048_576;

/// Resolve the token from the argument, environment, or stdin.
///
/// Surrounding whitespace (such as a trailing newline from a pipe) is
/// trimmed. An empty result is treated as no token at all.
///
/// # Errors
///
/// Returns [`JwtGateError::NoTokenProvided`] when every source is empty,
/// or an environment/read error for the source that was selected.
pub fn read_token(input: &TokenInput) -> Result<Zeroizing<String>, JwtGateError> {
    let raw = if let Some(token) = &input.token {
        token.clone()
    } else if let Some(name) = &input.token_env {
        read_env(name)?
    } else if std::io::stdin().is_terminal() {
        return Err(JwtGateError::NoTokenProvided);
    } else {
        read_stdin()?
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(JwtGateError::NoTokenProvided);
    }
    Ok(Zeroizing::new(trimmed.to_string()))
}

/// Load the key set selected on the command line.
///
/// # Errors
///
/// Returns a read error if the source cannot be read, or
/// [`JwtGateError::KeySet`] if the document does not parse.
pub fn read_key_source(input: &KeySetInput) -> Result<KeySource, JwtGateError> {
    if let Some(path) = &input.certs {
        Ok(KeySource::Certificates(CertificateSet::from_json(&read_file(path)?)?))
    } else if let Some(name) = &input.certs_env {
        Ok(KeySource::Certificates(CertificateSet::from_json(&read_env(name)?)?))
    } else if let Some(path) = &input.jwks {
        Ok(KeySource::Jwks(JsonWebKeySet::from_json(&read_file(path)?)?))
    } else if let Some(name) = &input.jwks_env {
        Ok(KeySource::Jwks(JsonWebKeySet::from_json(&read_env(name)?)?))
    } else {
        // clap's argument group guarantees one source is present.
        Err(JwtGateError::InputError {
            source_name: "key set".to_string(),
            reason: "no key-set source given".to_string(),
        })
    }
}

/// Read an environment variable after validating its name.
fn read_env(name: &str) -> Result<Zeroizing<String>, JwtGateError> {
    validate_env_var_name(name)?;
    std::env::var(name)
        .map(Zeroizing::new)
        .map_err(|_| JwtGateError::EnvVarNotFound {
            name: name.to_string(),
        })
}

/// Reject names that can never refer to an environment variable.
fn validate_env_var_name(name: &str) -> Result<(), JwtGateError> {
    if name.is_empty() || name.contains('=') || name.contains('\0') {
        return Err(JwtGateError::InvalidEnvVarName {
            name: name.replace('\0', "\u{FFFD}"),
        });
    }
    Ok(())
}

fn read_stdin() -> Result<Zeroizing<String>, JwtGateError> {
    read_bounded(std::io::stdin().lock(), "stdin")
}

fn read_file(path: &Path) -> Result<Zeroizing<String>, JwtGateError> {
    let file = std::fs::File::open(path).map_err(|e| JwtGateError::InputError {
        source_name: format!("'{}'", path.display()),
        reason: e.to_string(),
    })?;
    read_bounded(file, &format!("'{}'", path.display()))
}

/// Read at most [`MAX_INPUT_SIZE`] bytes of UTF-8 text.
fn read_bounded(reader: impl Read, source_name: &str) -> Result<Zeroizing<String>, JwtGateError> {
    let error = |reason: String| JwtGateError::InputError {
        source_name: source_name.to_string(),
        reason,
    };

    let mut buffer = Zeroizing::new(String::new());
    reader
        .take(MAX_INPUT_SIZE + 1)
        .read_to_string(&mut buffer)
        .map_err(|e| error(e.to_string()))?;

    if buffer.len() as u64 > MAX_INPUT_SIZE {
        return Err(error(format!(
            "input exceeds maximum size of {MAX_INPUT_SIZE} bytes"
        )));
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_env_var_name() {
        assert!(validate_env_var_name("JWT_TOKEN").is_ok());
        for bad in ["", "BAD=NAME", "NUL\0NAME"] {
            assert!(matches!(
                validate_env_var_name(bad),
                Err(JwtGateError::InvalidEnvVarName { .. })
            ));
        }
    }

    #[test]
    fn test_read_token_prefers_argument_and_trims() {
        let input = TokenInput {
            token: Some(Zeroizing::new("  a.b.c\n".to_string())),
            token_env: Some("IGNORED_BECAUSE_ARG_WINS".to_string()),
        };
        assert_eq!(read_token(&input).unwrap().as_str(), "a.b.c");
    }

    #[test]
    fn test_read_token_blank_argument_is_no_token() {
        let input = TokenInput {
            token: Some(Zeroizing::new("   ".to_string())),
            token_env: None,
        };
        assert!(matches!(read_token(&input), Err(JwtGateError::NoTokenProvided)));
    }

    #[test]
    fn test_read_token_missing_env_var() {
        let input = TokenInput {
            token: None,
            token_env: Some("JWT_GATE_SURELY_UNSET_VARIABLE".to_string()),
        };
        assert!(matches!(
            read_token(&input),
            Err(JwtGateError::EnvVarNotFound { name }) if name == "JWT_GATE_SURELY_UNSET_VARIABLE"
        ));
    }

    #[test]
    fn test_read_bounded_rejects_oversized_input() {
        let big = vec![b'x'; MAX_INPUT_SIZE as usize + 1];
        let err = read_bounded(big.as_slice(), "stdin").unwrap_err();
        assert!(err.to_string().contains("maximum size"));
    }

    #[test]
    fn test_read_bounded_rejects_non_utf8() {
        let err = read_bounded(&[0xff, 0xfe][..], "stdin").unwrap_err();
        assert!(matches!(err, JwtGateError::InputError { .. }));
    }

    #[test]
    fn test_read_key_source_missing_file() {
        let input = KeySetInput {
            certs: Some("/nonexistent/jwt-gate/certs.json".into()),
            certs_env: None,
            jwks: None,
            jwks_env: None,
        };
        let err = read_key_source(&input).unwrap_err();
        assert!(matches!(err, JwtGateError::InputError { .. }));
        assert!(err.to_string().contains("certs.json"));
    }
}

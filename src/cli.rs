//! CLI argument definitions for jwt-gate.
//!
//! Uses `clap` derive macros to define the command-line interface.
//! Each subcommand has its own argument struct for type-safe parsing.
//!
//! # Security
//!
//! Argument structs that can carry a token implement a custom `Debug`
//! that redacts it, preventing accidental leakage through debug
//! formatting, error chains, or logging.

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use zeroize::Zeroizing;

use jwt_gate::core::variables::{DEFAULT_CERT_PREFIX, DEFAULT_JWKS_PREFIX};

/// Extract claims and resolve verification keys for JSON Web Tokens
/// (JWTs) at an API gateway, offline and without trusting the token.
#[derive(Debug, Parser)]
#[command(name = "jwt-gate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode and inspect a JWT without verifying its signature.
    Decode(DecodeArgs),

    /// Extract gateway claims (issuer, expiry, time-to-live, app claims).
    Claims(ClaimsArgs),

    /// Resolve the verification key for a JWT's `kid`.
    Resolve(ResolveArgs),

    /// Flatten a certificate set or JWKS into gateway variables.
    Keyset(KeysetArgs),
}

/// Where to read the token from.
#[derive(clap::Args)]
pub struct TokenInput {
    /// The JWT token. If omitted, reads from stdin.
    #[arg(value_parser = parse_zeroizing_string)]
    pub token: Option<Zeroizing<String>>,

    /// Read the token from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub token_env: Option<String>,
}

impl fmt::Debug for TokenInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenInput")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_env", &self.token_env)
            .finish()
    }
}

/// Which key set to load, and from where.
#[derive(Debug, clap::Args)]
#[group(required = true, multiple = false)]
pub struct KeySetInput {
    /// Path to a certificate-set JSON document (`{"<kid>": "<PEM>"}`).
    #[arg(long, value_name = "FILE")]
    pub certs: Option<PathBuf>,

    /// Read the certificate-set JSON from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub certs_env: Option<String>,

    /// Path to a JWKS JSON document (`{"keys": [...]}`).
    #[arg(long, value_name = "FILE")]
    pub jwks: Option<PathBuf>,

    /// Read the JWKS JSON from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub jwks_env: Option<String>,
}

/// How to render results.
#[derive(Debug, clap::Args)]
pub struct OutputArgs {
    /// Output raw JSON without colors (machine-readable).
    #[arg(long, conflicts_with = "vars")]
    pub json: bool,

    /// Output gateway variable assignments, one `name=value` per line.
    #[arg(long)]
    pub vars: bool,
}

/// Arguments for the `decode` subcommand.
#[derive(Debug, clap::Args)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub input: TokenInput,

    /// Output raw JSON without colors (machine-readable).
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `claims` subcommand.
#[derive(Debug, clap::Args)]
pub struct ClaimsArgs {
    #[command(flatten)]
    pub input: TokenInput,

    /// Evaluate expiry at a different time than now.
    ///
    /// Accepts relative expressions like "+7d", "-1h", "30m" or
    /// absolute timestamps in ISO 8601 or Unix epoch format.
    #[arg(long, value_name = "EXPR", allow_hyphen_values = true)]
    pub at: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `resolve` subcommand.
#[derive(Debug, clap::Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub input: TokenInput,

    #[command(flatten)]
    pub keys: KeySetInput,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `keyset` subcommand.
#[derive(Debug, clap::Args)]
pub struct KeysetArgs {
    #[command(flatten)]
    pub keys: KeySetInput,

    /// Variable name prefix (defaults to "cert" or "jwks" by key-set kind).
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,
}

impl KeysetArgs {
    /// The prefix to use, falling back to the per-kind default.
    pub fn prefix_or_default(&self) -> &str {
        match &self.prefix {
            Some(prefix) => prefix,
            None if self.keys.certs.is_some() || self.keys.certs_env.is_some() => {
                DEFAULT_CERT_PREFIX
            }
            None => DEFAULT_JWKS_PREFIX,
        }
    }
}

/// Parse a string into a `Zeroizing<String>` for sensitive CLI arguments.
fn parse_zeroizing_string(s: &str) -> Result<Zeroizing<String>, std::convert::Infallible> {
    Ok(Zeroizing::new(s.to_string()))
}

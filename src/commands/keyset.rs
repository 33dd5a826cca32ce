//! Handler for the `keyset` subcommand.
//!
//! Flattens a certificate set or JWKS document into per-`kid` gateway
//! variable assignments, one `name=value` per line.

use anyhow::Result;
use tracing::debug;

use crate::cli::KeysetArgs;
use crate::commands::input::read_key_source;
use jwt_gate::core::keys::KeySource;
use jwt_gate::core::variables;

/// Execute the `keyset` subcommand with the given arguments.
pub fn execute(args: &KeysetArgs) -> Result<()> {
    let source = read_key_source(&args.keys)?;
    let prefix = args.prefix_or_default();

    let assignments = match &source {
        KeySource::Certificates(certs) => variables::certificate_variables(certs, prefix),
        KeySource::Jwks(jwks) => variables::jwks_variables(jwks, prefix),
    };
    debug!(count = assignments.len(), prefix, "flattened key set");

    for assignment in &assignments {
        println!("{}", variables::format_assignment(assignment));
    }

    Ok(())
}

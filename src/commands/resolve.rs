//! Handler for the `resolve` subcommand.
//!
//! Looks up the verification key for a token's `kid` in a certificate
//! set or a JWKS document. A token that matches no key is a failure at
//! this boundary so that scripts can reject it by exit code.

use anyhow::Result;

use crate::cli::ResolveArgs;
use crate::commands::input::{read_key_source, read_token};
use crate::display::{self, json_printer};
use jwt_gate::core::keys::{self, ResolvedKey};
use jwt_gate::core::{decoder, variables};
use jwt_gate::error::JwtGateError;

/// Execute the `resolve` subcommand with the given arguments.
pub fn execute(args: &ResolveArgs) -> Result<()> {
    let token = read_token(&args.input)?;
    let parsed = decoder::parse_token(&token)?;
    let source = read_key_source(&args.keys)?;

    let Some(resolved) = keys::resolve(&parsed.header, &source) else {
        return Err(match parsed.header.kid() {
            Some(kid) => JwtGateError::KeyNotFound {
                kid: keys::sanitize_kid(kid),
            },
            None => JwtGateError::MissingKid,
        }
        .into());
    };

    if args.output.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else if args.output.vars {
        for assignment in variables::resolved_key_variables(&resolved) {
            println!("{}", variables::format_assignment(&assignment));
        }
    } else {
        let use_color = display::should_use_color();
        match &resolved {
            ResolvedKey::Certificate { certificate } => {
                display::print_section("Certificate", use_color);
                println!("{}", certificate.trim_end());
            }
            ResolvedKey::Rsa(_) => {
                display::print_section("RSA Key", use_color);
                json_printer::print_json(&serde_json::to_value(&resolved)?, use_color);
            }
        }
    }

    Ok(())
}

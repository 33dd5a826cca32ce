//! Handler for the `decode` subcommand.
//!
//! Decodes and pretty-prints a JWT's header and payload without
//! verifying its signature. Supports reading the token from a CLI
//! argument, environment variable, or stdin.

use anyhow::Result;
use chrono::Utc;
use serde_json::{Value, json};

use crate::cli::DecodeArgs;
use crate::commands::input::read_token;
use crate::display::{self, json_printer, token_status};
use jwt_gate::core::{claims, decoder};

/// Execute the `decode` subcommand with the given arguments.
pub fn execute(args: &DecodeArgs) -> Result<()> {
    let token = read_token(&args.input)?;
    let parsed = decoder::parse_token(&token)?;

    let header = Value::Object(parsed.header.as_map().clone());
    let payload = Value::Object(parsed.payload.as_map().clone());

    if args.json {
        let output = json!({
            "header": header,
            "payload": payload,
            "signature": parsed.signature,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let use_color = display::should_use_color();
    let now = Utc::now();
    let claims = claims::extract(&parsed.payload, now);

    display::print_section("Header", use_color);
    json_printer::print_json(&header, use_color);
    println!();
    display::print_section("Payload", use_color);
    json_printer::print_json(&payload, use_color);
    println!();
    display::print_section("Signature", use_color);
    println!("{}", parsed.signature);
    println!();
    display::print_section("Token Status", use_color);
    token_status::display_token_status(&parsed.payload, &claims, now, use_color);

    Ok(())
}

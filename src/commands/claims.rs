//! Handler for the `claims` subcommand.
//!
//! Extracts the gateway claim set from a token, optionally evaluated at
//! a different instant, and prints it as a table, JSON, or gateway
//! variable assignments.

use anyhow::Result;
use chrono::Utc;
use tracing::debug;

use crate::cli::ClaimsArgs;
use crate::commands::input::read_token;
use crate::display::{self, json_printer, token_status};
use jwt_gate::core::{claims, decoder, time_travel, variables};

/// Execute the `claims` subcommand with the given arguments.
pub fn execute(args: &ClaimsArgs) -> Result<()> {
    let token = read_token(&args.input)?;
    let parsed = decoder::parse_token(&token)?;

    let now = match &args.at {
        Some(expression) => {
            let target = time_travel::parse_time_expression(expression)?;
            debug!(expression = %target.expression, at = %target.timestamp, "evaluating at custom time");
            target.timestamp
        }
        None => Utc::now(),
    };

    let result = claims::extract(&parsed.payload, now);

    if args.output.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if args.output.vars {
        for assignment in variables::claims_variables(&result) {
            println!("{}", variables::format_assignment(&assignment));
        }
    } else {
        let use_color = display::should_use_color();
        display::print_section("Claims", use_color);
        json_printer::print_json(&serde_json::to_value(&result)?, use_color);
        println!();
        display::print_section("Token Status", use_color);
        token_status::display_token_status(&parsed.payload, &result, now, use_color);
    }

    Ok(())
}

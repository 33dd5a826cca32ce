//! Token status display for temporal claims.
//!
//! Renders human-readable status information for a token's expiry
//! (from the extracted claims) and its `iat`/`nbf` timestamps, with
//! color coding:
//! - Expired tokens: red "EXPIRED (X ago)"
//! - Valid tokens: green "VALID (expires in X)"
//! - Tokens without `exp`: yellow "NO EXPIRY"

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde_json::Value;

use jwt_gate::core::claims::ClaimsResult;
use jwt_gate::core::decoder::DecodedPayload;

/// Display the temporal status of a token.
pub fn display_token_status(
    payload: &DecodedPayload,
    claims: &ClaimsResult,
    now: DateTime<Utc>,
    use_color: bool,
) {
    for line in render_token_status(payload, claims, now, use_color) {
        println!("{line}");
    }
}

/// Build the status lines without printing them.
pub fn render_token_status(
    payload: &DecodedPayload,
    claims: &ClaimsResult,
    now: DateTime<Utc>,
    use_color: bool,
) -> Vec<String> {
    let mut lines = Vec::new();

    let status = match (claims.expired, claims.ttl_millis) {
        (Some(true), Some(ttl)) => paint(
            format!("EXPIRED ({} ago)", humanize_millis(ttl.unsigned_abs())),
            use_color,
            |s| s.red().bold().to_string(),
        ),
        (Some(false), Some(ttl)) => paint(
            format!("VALID (expires in {})", humanize_millis(ttl.unsigned_abs())),
            use_color,
            |s| s.green().bold().to_string(),
        ),
        _ => paint("NO EXPIRY".to_string(), use_color, |s| {
            s.yellow().bold().to_string()
        }),
    };
    lines.push(format!("  Status:     {status}"));

    if let Some(exp) = claims.expiration {
        lines.push(format!("  Expires at: {}", format_epoch(exp)));
    }
    if let Some(iat) = payload.claim("iat").and_then(Value::as_i64) {
        lines.push(format!("  Issued at:  {}", format_epoch(iat)));
    }
    if let Some(nbf) = payload.claim("nbf").and_then(Value::as_i64) {
        let note = if nbf > now.timestamp() {
            " (not yet valid)"
        } else {
            ""
        };
        lines.push(format!("  Not before: {}{note}", format_epoch(nbf)));
    }
    lines.push(format!("  Evaluated:  {}", now.format("%Y-%m-%d %H:%M:%S UTC")));

    lines
}

fn paint(text: String, use_color: bool, style: impl Fn(&str) -> String) -> String {
    if use_color { style(&text) } else { text }
}

/// Format epoch seconds as a UTC timestamp, or the raw number if out of range.
fn format_epoch(seconds: i64) -> String {
    DateTime::from_timestamp(seconds, 0)
        .map(|dt| format!("{} ({seconds})", dt.format("%Y-%m-%d %H:%M:%S UTC")))
        .unwrap_or_else(|| seconds.to_string())
}

/// Render a millisecond span as its two most significant units.
fn humanize_millis(millis: u64) -> String {
    const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

    let mut remaining = millis / 1000;
    if remaining == 0 {
        return "0s".to_string();
    }

    let mut parts = Vec::new();
    for (size, suffix) in UNITS {
        if remaining >= size {
            parts.push(format!("{}{suffix}", remaining / size));
            remaining %= size;
        }
        if parts.len() == 2 {
            break;
        }
    }
    parts.join(" ")
}

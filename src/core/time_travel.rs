//! Evaluation-time expressions.
//!
//! Claims are evaluated against "now" by default. A time expression
//! moves that instant, either relative to the base time ("+7d", "-1h",
//! "30m") or to an absolute point (ISO 8601 or Unix epoch seconds).

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::TimeExpressionError;

/// A parsed time target for claim evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTarget {
    /// The resolved absolute timestamp.
    pub timestamp: DateTime<Utc>,
    /// The original expression provided by the user.
    pub expression: String,
}

/// Parse a time expression relative to the current time.
///
/// See [`parse_time_expression_at`] for the accepted formats.
///
/// # Errors
///
/// Returns an error if the expression doesn't match any known format.
pub fn parse_time_expression(expression: &str) -> Result<TimeTarget, TimeExpressionError> {
    parse_time_expression_at(expression, Utc::now())
}

/// Parse a time expression into an absolute timestamp.
///
/// Supports the following formats:
/// - `now`: the base time itself
/// - Relative: `+7d`, `-1h`, `30m`, `+1y`, `-5s`, `+2w`; a signed bare
///   number counts seconds
/// - Absolute ISO 8601: `2024-01-15T14:30:00Z`
/// - Absolute Unix epoch: `1705312200`
///
/// # Errors
///
/// Returns [`TimeExpressionError::Invalid`] if the expression
/// doesn't match any known format or the result is out of range.
pub fn parse_time_expression_at(
    expression: &str,
    base: DateTime<Utc>,
) -> Result<TimeTarget, TimeExpressionError> {
    let trimmed = expression.trim();
    let invalid = |reason: &str| TimeExpressionError::Invalid {
        expression: expression.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("expression is empty"));
    }

    let timestamp = if trimmed.eq_ignore_ascii_case("now") {
        base
    } else if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let seconds: i64 = trimmed
            .parse()
            .map_err(|_| invalid("epoch seconds out of range"))?;
        DateTime::from_timestamp(seconds, 0).ok_or_else(|| invalid("epoch seconds out of range"))?
    } else if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        parsed.with_timezone(&Utc)
    } else {
        let offset = parse_relative(trimmed).map_err(|reason| invalid(&reason))?;
        base.checked_add_signed(offset)
            .ok_or_else(|| invalid("resulting time is out of range"))?
    };

    Ok(TimeTarget {
        timestamp,
        expression: expression.to_string(),
    })
}

/// Parse `[+|-]<N>[unit]` into a signed offset.
fn parse_relative(expression: &str) -> Result<TimeDelta, String> {
    let (negative, rest) = match expression.as_bytes()[0] {
        b'+' => (false, &expression[1..]),
        b'-' => (true, &expression[1..]),
        _ => (false, expression),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (digits, unit) = rest.split_at(digits_end);

    if digits.is_empty() {
        return Err("expected a number, e.g. '+7d' or '-1h'".to_string());
    }
    let amount: i64 = digits
        .parse()
        .map_err(|_| "amount is too large".to_string())?;

    let unit_seconds: i64 = match unit.to_ascii_lowercase().as_str() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        "w" => 7 * 86_400,
        "y" => 365 * 86_400,
        other => return Err(format!("unknown unit '{other}'")),
    };

    let seconds = amount
        .checked_mul(unit_seconds)
        .ok_or_else(|| "amount is too large".to_string())?;
    let delta = TimeDelta::try_seconds(seconds).ok_or_else(|| "amount is too large".to_string())?;

    Ok(if negative { -delta } else { delta })
}

//! Base64url segment decoding.
//!
//! JWT segments arrive from untrusted callers, so this decoder is
//! deliberately strict about its alphabet and lenient only about
//! padding: trailing `=` is optional, and bits left over after the
//! last full byte are dropped.

use crate::error::DecodeError;

/// Standard base64 numerals; a character's index is its 6-bit value.
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const PADDING: char = '=';

/// Map a single character to its 6-bit numeral value.
///
/// `-` and `_` are the URL-safe spellings of `+` and `/`.
fn numeral(c: char) -> Option<u32> {
    match c {
        '-' => Some(62),
        '_' => Some(63),
        c if c.is_ascii() => ALPHABET
            .iter()
            .position(|&b| b == c as u8)
            .map(|p| p as u32),
        _ => None,
    }
}

/// Decode a base64url segment into raw bytes.
///
/// Any trailing `=` padding is stripped first. Each remaining character
/// contributes six bits to a bit stream that is cut into bytes left to
/// right; a final group of fewer than eight bits is discarded.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidCharacter`] for the first character that
/// is not a base64 numeral, including `=` anywhere but the end.
pub fn decode(segment: &str) -> Result<Vec<u8>, DecodeError> {
    let data = segment.trim_end_matches(PADDING);

    let mut out = Vec::with_capacity(data.len() * 3 / 4);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for (position, character) in data.chars().enumerate() {
        let value =
            numeral(character).ok_or(DecodeError::InvalidCharacter { character, position })?;

        buffer = (buffer << 6) | value;
        bits += 6;

        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }

    Ok(out)
}

/// Decode a base64url segment and interpret the bytes as UTF-8 text.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidCharacter`] as [`decode`] does, or
/// [`DecodeError::InvalidUtf8`] if the decoded bytes are not text.
pub fn decode_to_string(segment: &str) -> Result<String, DecodeError> {
    String::from_utf8(decode(segment)?).map_err(|_| DecodeError::InvalidUtf8)
}

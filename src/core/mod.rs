//! Core business logic for JWT operations.
//!
//! This module contains the domain logic separated from CLI concerns.
//! Everything here is pure and synchronous: it operates on strings and
//! JSON values already in memory and never performs I/O.

pub mod base64url;
pub mod claims;
pub mod decoder;
pub mod keys;
pub mod time_travel;
pub mod variables;

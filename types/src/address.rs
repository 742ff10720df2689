//! Actor address type with `0x` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;

/// An EVM-style actor address, always `0x` followed by 40 hex digits.
///
/// Addresses are normalized to lowercase on construction so that two spellings
/// of the same address compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorAddress(String);

impl ActorAddress {
    /// The standard prefix for all actor addresses.
    pub const PREFIX: &'static str = "0x";

    /// Total string length: the prefix plus 40 hex digits.
    pub const LEN: usize = 42;

    /// Parse an address from untrusted input, validating shape and charset.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s: String = raw.into();
        if s.len() != Self::LEN || !s.starts_with(Self::PREFIX) {
            return Err(TypeError::InvalidAddress(s));
        }
        if !s[Self::PREFIX.len()..].bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidAddress(s));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Create an address from a string already known to be valid.
    ///
    /// # Panics
    /// Panics if the string is not a well-formed address. Use [`ActorAddress::parse`]
    /// for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        Self::parse(raw).expect("well-formed actor address")
    }

    /// The normalized `0x…` form as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActorAddress {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

//! Trace and span identifiers.
//!
//! Both identifiers follow the W3C trace-context encoding: fixed-width,
//! lowercase hexadecimal, and never all zeroes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while parsing a hex identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdParseError {
    /// The input length does not match the identifier width.
    #[error("expected {expected} hex characters, got {actual}")]
    Length {
        /// Required number of hex characters.
        expected: usize,
        /// Number of characters received.
        actual: usize,
    },
    /// The input contains characters other than lowercase hex digits.
    #[error("identifier must be lowercase hex")]
    NotHex,
    /// The identifier is all zeroes, which W3C reserves as invalid.
    #[error("identifier must not be all zeroes")]
    AllZero,
}

fn is_lower_hex(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

fn decode_fixed<const N: usize>(value: &str) -> Result<[u8; N], IdParseError> {
    if value.len() != N * 2 {
        return Err(IdParseError::Length {
            expected: N * 2,
            actual: value.len(),
        });
    }
    if !is_lower_hex(value) {
        return Err(IdParseError::NotHex);
    }
    let mut bytes = [0_u8; N];
    hex::decode_to_slice(value, &mut bytes).map_err(|_| IdParseError::NotHex)?;
    if bytes.iter().all(|b| *b == 0) {
        return Err(IdParseError::AllZero);
    }
    Ok(bytes)
}

/// 16-byte identifier shared by every span of one logical request.
///
/// # Examples
/// ```
/// use trace_context::TraceId;
///
/// let id: TraceId = "4bf92f3577b34da6a3ce929d0e0e4736".parse().expect("valid id");
/// assert_eq!(id.to_string(), "4bf92f3577b34da6a3ce929d0e0e4736");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId([u8; 16]);

impl TraceId {
    /// Generate a new random trace identifier.
    #[must_use]
    pub fn generate() -> Self {
        loop {
            let value: u128 = rand::random();
            if value != 0 {
                return Self(value.to_be_bytes());
            }
        }
    }

    /// Raw identifier bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for TraceId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(Self)
    }
}

/// 8-byte identifier of a single span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanId([u8; 8]);

impl SpanId {
    /// Generate a new random span identifier.
    #[must_use]
    pub fn generate() -> Self {
        loop {
            let value: u64 = rand::random();
            if value != 0 {
                return Self(value.to_be_bytes());
            }
        }
    }

    /// Raw identifier bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for SpanId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(Self)
    }
}

//! Postal code accepted by the resolver.
//!
//! The resolver only checks the length. Digit checks belong to the edge, and
//! the directory answers anything else with "not found".

/// Number of bytes in a CEP.
pub const POSTAL_CODE_LEN: usize = 8;

/// Errors raised while validating a postal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PostalCodeError {
    /// The code is not exactly [`POSTAL_CODE_LEN`] bytes long.
    #[error("postal code must be {POSTAL_CODE_LEN} bytes, got {actual}")]
    InvalidLength {
        /// Length of the rejected input in bytes.
        actual: usize,
    },
}

/// A CEP of the expected length.
///
/// # Examples
/// ```
/// use resolver::domain::PostalCode;
///
/// assert!(PostalCode::parse("01310100").is_ok());
/// assert!(PostalCode::parse("0131010").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCode(String);

impl PostalCode {
    /// Validate the byte length of `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`PostalCodeError::InvalidLength`] unless `raw` is exactly
    /// eight bytes.
    pub fn parse(raw: &str) -> Result<Self, PostalCodeError> {
        if raw.len() != POSTAL_CODE_LEN {
            return Err(PostalCodeError::InvalidLength { actual: raw.len() });
        }
        Ok(Self(raw.to_owned()))
    }

    /// Borrow the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

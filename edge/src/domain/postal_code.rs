//! CEP validation performed before delegating to the resolver.

/// Number of digits in a CEP.
pub const POSTAL_CODE_LEN: usize = 8;

/// Errors raised while validating a CEP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PostalCodeError {
    /// The code is not exactly eight bytes long.
    #[error("postal code must be {POSTAL_CODE_LEN} bytes, got {actual}")]
    InvalidLength {
        /// Length of the rejected input in bytes.
        actual: usize,
    },
    /// A byte is not an ASCII digit.
    #[error("postal code must contain only ASCII digits")]
    NonDigit,
}

/// Eight ASCII digits, e.g. `01310100`.
///
/// # Examples
/// ```
/// use edge::domain::PostalCode;
///
/// assert!(PostalCode::parse("01310100").is_ok());
/// assert!(PostalCode::parse("0131010a").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCode(String);

impl PostalCode {
    /// Validate `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`PostalCodeError`] unless `raw` is exactly eight ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, PostalCodeError> {
        if raw.len() != POSTAL_CODE_LEN {
            return Err(PostalCodeError::InvalidLength { actual: raw.len() });
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PostalCodeError::NonDigit);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Borrow the digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//! Locality names returned by the postal directory.

use std::fmt;

/// Errors raised when a directory answer carries no usable locality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocalityError {
    /// The locality name is blank.
    #[error("locality must not be empty")]
    Empty,
}

/// Non-empty locality name used to query the weather provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locality(String);

impl Locality {
    /// Validate and wrap a locality name.
    ///
    /// # Errors
    ///
    /// Returns [`LocalityError::Empty`] for an empty or blank name.
    pub fn new(raw: impl Into<String>) -> Result<Self, LocalityError> {
        let name = raw.into();
        if name.trim().is_empty() {
            return Err(LocalityError::Empty);
        }
        Ok(Self(name))
    }

    /// Borrow the locality name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

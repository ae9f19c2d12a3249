//! Edge domain: CEP validation and the port to the weather resolver.

pub mod error;
pub mod ports;
mod postal_code;

pub use error::{DomainError, ErrorCode};
pub use postal_code::{POSTAL_CODE_LEN, PostalCode, PostalCodeError};

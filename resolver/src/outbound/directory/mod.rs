//! Postal directory adapter.
//!
//! Implements [`LocalityDirectory`](crate::domain::ports::LocalityDirectory)
//! against a ViaCEP-compatible `GET /ws/{cep}/json/` endpoint.

mod dto;
mod http_directory;

pub use http_directory::{DEFAULT_DIRECTORY_TIMEOUT, HttpLocalityDirectory};

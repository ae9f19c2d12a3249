//! Weather resolver service (`service-b`).
//!
//! Resolves a CEP to a locality through a postal directory, fetches the
//! current temperature for that locality and answers in Celsius, Fahrenheit
//! and Kelvin.

pub mod domain;
pub mod inbound;
pub mod outbound;

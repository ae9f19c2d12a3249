//! Outbound adapters.

pub mod resolver_client;

//! Environment-driven edge configuration.

use std::net::SocketAddr;

use mockable::Env;
use reqwest::Url;

const LISTEN_ADDR_ENV: &str = "EDGE_LISTEN_ADDR";
const RESOLVER_URL_ENV: &str = "SERVICE_B_URL";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_RESOLVER_URL: &str = "http://service-b:8081";

/// Settings needed to start the edge.
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) resolver_url: Url,
    pub(crate) otlp_endpoint: String,
}

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The resolver URL does not parse.
    #[error("invalid URL in {name}='{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// The resolver URL uses a scheme other than http or https.
    #[error("unsupported scheme in {name}='{value}'; expected http or https")]
    UnsupportedScheme { name: &'static str, value: String },
    /// The listen address does not parse.
    #[error("invalid socket address in {name}='{value}': {source}")]
    InvalidAddr {
        name: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

impl EdgeConfig {
    /// Read the edge settings from `env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the resolver URL or the listen address is
    /// invalid.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: socket_addr(env)?,
            resolver_url: resolver_url(env)?,
            otlp_endpoint: trace_context::collector_endpoint(env),
        })
    }
}

fn value_or<E: Env>(env: &E, name: &str, default: &str) -> String {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn resolver_url<E: Env>(env: &E) -> Result<Url, ConfigError> {
    let name = RESOLVER_URL_ENV;
    let value = value_or(env, name, DEFAULT_RESOLVER_URL);
    let url = Url::parse(&value).map_err(|source| ConfigError::InvalidUrl {
        name,
        value: value.clone(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme { name, value });
    }
    Ok(url)
}

fn socket_addr<E: Env>(env: &E) -> Result<SocketAddr, ConfigError> {
    let name = LISTEN_ADDR_ENV;
    let value = value_or(env, name, DEFAULT_LISTEN_ADDR);
    value
        .parse()
        .map_err(|source| ConfigError::InvalidAddr { name, value, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;
    use std::collections::HashMap;

    fn mock_env(pairs: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = EdgeConfig::from_env(&mock_env(&[])).expect("defaults are valid");
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().expect("addr"));
        assert_eq!(config.resolver_url.as_str(), "http://service-b:8081/");
        assert_eq!(config.otlp_endpoint, "otel-collector:4318");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = EdgeConfig::from_env(&mock_env(&[
            ("EDGE_LISTEN_ADDR", "127.0.0.1:18080"),
            ("SERVICE_B_URL", " https://resolver.internal:9000 "),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "collector:4318"),
        ]))
        .expect("valid configuration");
        assert_eq!(config.bind_addr.port(), 18080);
        assert_eq!(config.resolver_url.host_str(), Some("resolver.internal"));
        assert_eq!(config.resolver_url.port(), Some(9000));
        assert_eq!(config.otlp_endpoint, "collector:4318");
    }

    #[test]
    fn blank_resolver_url_uses_the_default() {
        let config =
            EdgeConfig::from_env(&mock_env(&[("SERVICE_B_URL", "   ")])).expect("valid");
        assert_eq!(config.resolver_url.host_str(), Some("service-b"));
    }

    #[rstest]
    #[case::relative("SERVICE_B_URL", "service-b:8081")]
    #[case::ftp("SERVICE_B_URL", "ftp://service-b")]
    #[case::bad_addr("EDGE_LISTEN_ADDR", "localhost")]
    fn invalid_values_fail_startup(#[case] name: &str, #[case] value: &str) {
        let error = EdgeConfig::from_env(&mock_env(&[(name, value)]))
            .expect_err("configuration should be rejected");
        assert!(error.to_string().contains(name), "error names {name}: {error}");
    }
}

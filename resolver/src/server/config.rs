//! Environment-driven resolver configuration.

use std::net::SocketAddr;

use mockable::Env;
use reqwest::Url;
use tracing::warn;

const LISTEN_ADDR_ENV: &str = "RESOLVER_LISTEN_ADDR";
const DIRECTORY_URL_ENV: &str = "DIRECTORY_API_URL";
const WEATHER_URL_ENV: &str = "WEATHER_API_URL";
const WEATHER_API_KEY_ENV: &str = "WEATHER_API_KEY";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8081";
const DEFAULT_DIRECTORY_URL: &str = "https://viacep.com.br";
const DEFAULT_WEATHER_URL: &str = "https://api.weatherapi.com";
const PLACEHOLDER_API_KEY: &str = "test_key";

/// Settings needed to start the resolver.
#[derive(Clone)]
pub struct ResolverConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) directory_url: Url,
    pub(crate) weather_url: Url,
    pub(crate) weather_api_key: String,
    pub(crate) otlp_endpoint: String,
}

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A URL variable does not parse.
    #[error("invalid URL in {name}='{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// A URL variable uses a scheme other than http or https.
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

impl std::fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("bind_addr", &self.bind_addr)
            .field("directory_url", &self.directory_url.as_str())
            .field("weather_url", &self.weather_url.as_str())
            .field("otlp_endpoint", &self.otlp_endpoint)
            .finish_non_exhaustive()
    }
}

impl ResolverConfig {
    /// Read the resolver settings from `env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a URL or the listen address is invalid.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, ConfigError> {
        let weather_api_key = non_empty(env, WEATHER_API_KEY_ENV).unwrap_or_else(|| {
            warn!(
                variable = WEATHER_API_KEY_ENV,
                "weather API key not set; using placeholder key"
            );
            PLACEHOLDER_API_KEY.to_owned()
        });
        Ok(Self {
            bind_addr: socket_addr(env, LISTEN_ADDR_ENV, DEFAULT_LISTEN_ADDR)?,
            directory_url: http_url(env, DIRECTORY_URL_ENV, DEFAULT_DIRECTORY_URL)?,
            weather_url: http_url(env, WEATHER_URL_ENV, DEFAULT_WEATHER_URL)?,
            weather_api_key,
            otlp_endpoint: trace_context::collector_endpoint(env),
        })
    }
}

fn non_empty<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name).filter(|value| !value.trim().is_empty())
}

fn http_url<E: Env>(env: &E, name: &'static str, default: &str) -> Result<Url, ConfigError> {
    let value = non_empty(env, name).unwrap_or_else(|| default.to_owned());
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

fn socket_addr<E: Env>(
    env: &E,
    name: &'static str,
    default: &str,
) -> Result<SocketAddr, ConfigError> {
    let value = non_empty(env, name).unwrap_or_else(|| default.to_owned());
    value
        .parse()
        .map_err(|source| ConfigError::InvalidAddr { name, value, source })
}

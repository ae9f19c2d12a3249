//! Resolution of the OTLP collector endpoint.

use mockable::Env;

/// Environment variable naming the collector.
pub const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Collector used when the variable is unset or empty.
pub const DEFAULT_OTLP_ENDPOINT: &str = "http://otel-collector:4318";

/// Read the collector endpoint and reduce it to `host:port`.
///
/// # Examples
/// ```
/// use mockable::MockEnv;
/// use trace_context::collector_endpoint;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| Some("https://collector:4318".to_owned()));
/// assert_eq!(collector_endpoint(&env), "collector:4318");
/// ```
#[must_use]
pub fn collector_endpoint<E: Env>(env: &E) -> String {
    let configured = env
        .string(OTLP_ENDPOINT_ENV)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_OTLP_ENDPOINT.to_owned());
    strip_scheme(configured.trim()).to_owned()
}

/// Remove a leading `http://` or `https://` when a host follows it.
///
/// A bare scheme is returned unchanged.
#[must_use]
pub fn strip_scheme(endpoint: &str) -> &str {
    ["https://", "http://"]
        .iter()
        .find_map(|scheme| endpoint.strip_prefix(scheme))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    fn env_with(value: Option<&'static str>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| match key {
                OTLP_ENDPOINT_ENV => value.map(str::to_owned),
                _ => None,
            });
        env
    }

    #[rstest]
    #[case::http("http://collector:4318", "collector:4318")]
    #[case::https("https://collector:4318", "collector:4318")]
    #[case::no_scheme("collector:4318", "collector:4318")]
    #[case::bare_http("http://", "http://")]
    #[case::bare_https("https://", "https://")]
    fn strips_only_a_scheme_followed_by_a_host(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_scheme(input), expected);
    }

    #[rstest]
    #[case::unset(None, "otel-collector:4318")]
    #[case::empty(Some(""), "otel-collector:4318")]
    #[case::configured(Some("http://localhost:4318"), "localhost:4318")]
    fn resolves_endpoint_from_environment(
        #[case] value: Option<&'static str>,
        #[case] expected: &str,
    ) {
        assert_eq!(collector_endpoint(&env_with(value)), expected);
    }
}

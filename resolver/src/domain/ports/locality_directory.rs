//! Driven port resolving a postal code to its locality.

use async_trait::async_trait;
use trace_context::TraceContext;

use super::define_port_error;
use crate::domain::{Locality, PostalCode};

define_port_error! {
    /// Errors surfaced while querying the postal directory.
    pub enum LocalityDirectoryError {
        /// The directory reports the code as unknown or returned no locality.
        NotFound { code: String } =>
            "postal code {code} not found",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "directory transport failed: {message}",
        /// The directory did not answer in time.
        Timeout { message: String } =>
            "directory timeout: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "directory response decode failed: {message}",
        /// The adapter could not build the request.
        InvalidRequest { message: String } =>
            "directory request invalid: {message}",
    }
}

/// Port for looking up the locality of a postal code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocalityDirectory: Send + Sync {
    /// Resolve `code`, propagating `trace` to the directory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolver::domain::PostalCode;
    /// use resolver::domain::ports::{FixtureLocalityDirectory, LocalityDirectory};
    /// use trace_context::TraceContext;
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
    /// let code = PostalCode::parse("01310100").expect("valid code");
    /// let locality = FixtureLocalityDirectory
    ///     .lookup_locality(&code, &TraceContext::new_root())
    ///     .await
    ///     .expect("fixture always resolves");
    /// assert_eq!(locality.as_str(), "São Paulo");
    /// # });
    /// ```
    async fn lookup_locality(
        &self,
        code: &PostalCode,
        trace: &TraceContext,
    ) -> Result<Locality, LocalityDirectoryError>;
}

/// Fixture directory that resolves every code to São Paulo.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureLocalityDirectory;

#[async_trait]
impl LocalityDirectory for FixtureLocalityDirectory {
    async fn lookup_locality(
        &self,
        _code: &PostalCode,
        _trace: &TraceContext,
    ) -> Result<Locality, LocalityDirectoryError> {
        Locality::new("São Paulo").map_err(|err| LocalityDirectoryError::decode(err.to_string()))
    }
}

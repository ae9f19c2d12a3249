//! Reqwest-backed postal directory adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use trace_context::{TRACEPARENT_HEADER, TraceContext};
use tracing::debug;

use super::dto::DirectoryResponseDto;
use crate::domain::ports::{LocalityDirectory, LocalityDirectoryError};
use crate::domain::{Locality, PostalCode};

/// Per-request timeout for directory lookups.
pub const DEFAULT_DIRECTORY_TIMEOUT: Duration = Duration::from_secs(5);

/// Directory adapter issuing `GET {base}/ws/{cep}/json/`.
#[derive(Debug, Clone)]
pub struct HttpLocalityDirectory {
    client: Client,
    base_url: Url,
}

impl HttpLocalityDirectory {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn lookup_url(&self, code: &PostalCode) -> Result<Url, LocalityDirectoryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                LocalityDirectoryError::invalid_request("directory base URL cannot carry a path")
            })?
            .pop_if_empty()
            .extend(["ws", code.as_str(), "json", ""]);
        Ok(url)
    }
}

#[async_trait]
impl LocalityDirectory for HttpLocalityDirectory {
    async fn lookup_locality(
        &self,
        code: &PostalCode,
        trace: &TraceContext,
    ) -> Result<Locality, LocalityDirectoryError> {
        let url = self.lookup_url(code)?;
        let response = self
            .client
            .get(url)
            .header(TRACEPARENT_HEADER, trace.to_traceparent())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            // The body decides the outcome; ViaCEP answers bad codes with 400 HTML.
            debug!(status = status.as_u16(), "directory answered with non-success status");
        }
        parse_locality(code, body.as_ref())
    }
}

fn parse_locality(code: &PostalCode, body: &[u8]) -> Result<Locality, LocalityDirectoryError> {
    let decoded: DirectoryResponseDto = serde_json::from_slice(body).map_err(|error| {
        LocalityDirectoryError::decode(format!("invalid directory JSON payload: {error}"))
    })?;
    decoded
        .into_locality()
        .ok_or_else(|| LocalityDirectoryError::not_found(code.as_str()))
}

fn map_transport_error(error: reqwest::Error) -> LocalityDirectoryError {
    if error.is_timeout() {
        LocalityDirectoryError::timeout(error.to_string())
    } else {
        LocalityDirectoryError::transport(error.to_string())
    }
}

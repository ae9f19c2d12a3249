//! Driven port delegating a validated CEP to the resolver service.
//!
//! The reply body is opaque: the edge relays it byte for byte and never
//! decodes it.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use trace_context::TraceContext;

use crate::domain::PostalCode;

/// Errors surfaced while calling the resolver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeatherResolverError {
    /// Connection, DNS or protocol failure before a response arrived.
    #[error("resolver transport failed: {message}")]
    Transport {
        /// Underlying cause.
        message: String,
    },
    /// No response within the timeout.
    #[error("resolver timeout: {message}")]
    Timeout {
        /// Underlying cause.
        message: String,
    },
    /// The body stream failed after the status was received.
    #[error("resolver body failed: {message}")]
    Body {
        /// Underlying cause.
        message: String,
    },
    /// The adapter could not build the request.
    #[error("resolver request invalid: {message}")]
    InvalidRequest {
        /// Underlying cause.
        message: String,
    },
}

impl WeatherResolverError {
    /// Build [`Self::Transport`].
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build [`Self::Timeout`].
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Build [`Self::Body`].
    #[must_use]
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body {
            message: message.into(),
        }
    }

    /// Build [`Self::InvalidRequest`].
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

/// Byte stream of a relayed response body.
pub type ReplyBody = BoxStream<'static, Result<Bytes, WeatherResolverError>>;

/// Status and body returned by the resolver, whatever the status.
pub struct ResolverReply {
    status: u16,
    body: ReplyBody,
}

impl ResolverReply {
    /// Wrap a status code and a body stream.
    #[must_use]
    pub fn new<S>(status: u16, body: S) -> Self
    where
        S: Stream<Item = Result<Bytes, WeatherResolverError>> + Send + 'static,
    {
        Self {
            status,
            body: body.boxed(),
        }
    }

    /// Reply whose body is already in memory.
    ///
    /// # Examples
    /// ```
    /// use edge::domain::ports::ResolverReply;
    ///
    /// let reply = ResolverReply::from_bytes(404, r#"{"message":"can not find zipcode"}"#);
    /// assert_eq!(reply.status(), 404);
    /// ```
    #[must_use]
    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        Self::new(status, stream::once(std::future::ready(Ok(body.into()))))
    }

    /// HTTP status chosen by the resolver.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Split into status and body.
    #[must_use]
    pub fn into_parts(self) -> (u16, ReplyBody) {
        (self.status, self.body)
    }
}

impl fmt::Debug for ResolverReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverReply")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Port for delegating a CEP to the resolver.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherResolver: Send + Sync {
    /// Send `code` to the resolver, propagating `trace`.
    ///
    /// Any HTTP status is a successful reply; only transport failures are
    /// errors.
    async fn resolve(
        &self,
        code: &PostalCode,
        trace: &TraceContext,
    ) -> Result<ResolverReply, WeatherResolverError>;
}

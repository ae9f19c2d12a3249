//! Streaming decode of the `/cep` request body.
//!
//! Only the bytes up to the end of the first JSON value are read.

use actix_web::error::PayloadError;
use actix_web::web::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use serde::de::DeserializeOwned;

/// Largest prefix buffered while the first JSON value is incomplete.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Why no JSON value could be taken from a request body.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    /// Reading the body failed.
    #[error("request body could not be read: {0}")]
    Stream(#[from] PayloadError),
    /// The first value is not valid JSON for the expected shape.
    #[error("request body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Nothing but whitespace was sent.
    #[error("request body is empty")]
    Empty,
    /// No complete value arrived within the buffer limit.
    #[error("first JSON value exceeds {limit} bytes")]
    TooLarge {
        /// Buffer limit in bytes.
        limit: usize,
    },
}

/// Read `chunks` until the first JSON value is complete and decode it.
///
/// # Errors
///
/// Returns [`BodyError`] for stream failures, malformed or blank bodies, and
/// values still open after `limit` bytes.
pub async fn read_first_value<T, S>(mut chunks: S, limit: usize) -> Result<T, BodyError>
where
    T: DeserializeOwned,
    S: Stream<Item = Result<Bytes, PayloadError>> + Unpin,
{
    let mut buffer = BytesMut::new();
    while let Some(chunk) = chunks.next().await {
        buffer.extend_from_slice(&chunk?);
        match leading_value::<T>(&buffer) {
            Some(Ok(value)) => return Ok(value),
            Some(Err(error)) if !error.is_eof() => return Err(error.into()),
            Some(Err(_)) | None if buffer.len() > limit => {
                return Err(BodyError::TooLarge { limit });
            }
            Some(Err(_)) | None => {}
        }
    }
    leading_value::<T>(&buffer)
        .ok_or(BodyError::Empty)?
        .map_err(BodyError::from)
}

fn leading_value<T: DeserializeOwned>(buffer: &[u8]) -> Option<Result<T, serde_json::Error>> {
    serde_json::Deserializer::from_slice(buffer)
        .into_iter::<T>()
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Code {
        cep: String,
    }

    fn parts(
        chunks: Vec<&'static str>,
    ) -> impl Stream<Item = Result<Bytes, PayloadError>> + Unpin {
        stream::iter(
            chunks
                .into_iter()
                .map(|chunk| Ok(Bytes::from_static(chunk.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[actix_web::test]
    async fn joins_a_value_split_across_chunks() {
        let code: Code = read_first_value(parts(vec![r#"{"cep":"0131"#, r#"0100"} tail"#]), 64)
            .await
            .expect("value");
        assert_eq!(code.cep, "01310100");
    }

    #[actix_web::test]
    async fn blank_body_is_empty() {
        let outcome = read_first_value::<Code, _>(parts(vec![" ", "\t"]), 64).await;
        assert!(matches!(outcome, Err(BodyError::Empty)));
    }

    #[actix_web::test]
    async fn syntax_errors_fail_before_the_limit() {
        let outcome = read_first_value::<Code, _>(parts(vec!["{cep}"]), 64).await;
        assert!(matches!(outcome, Err(BodyError::Malformed(_))));
    }

    #[actix_web::test]
    async fn open_values_fail_past_the_limit() {
        let outcome =
            read_first_value::<Code, _>(parts(vec![r#"{"cep":"#, "\"0131010000000"]), 8).await;
        assert!(matches!(outcome, Err(BodyError::TooLarge { limit: 8 })));
    }
}

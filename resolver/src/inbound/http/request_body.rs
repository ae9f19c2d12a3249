//! Incremental decoding of JSON request bodies.
//!
//! Bodies are read chunk by chunk until the first JSON value is complete.
//! Anything after that value is never read, so a large trailing payload does
//! not have to fit in memory.

use actix_web::error::PayloadError;
use actix_web::web::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use serde::de::DeserializeOwned;

/// Largest prefix buffered while waiting for the first JSON value to end.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Reasons a request body did not yield a JSON value.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    /// The connection failed while the body was being read.
    #[error("request body could not be read: {0}")]
    Stream(#[from] PayloadError),
    /// The first value is not valid JSON for the expected shape.
    #[error("request body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The body ended before any JSON value started.
    #[error("request body is empty")]
    Empty,
    /// The first value did not end within the buffer limit.
    #[error("first JSON value exceeds {limit} bytes")]
    TooLarge {
        /// Buffer limit in bytes.
        limit: usize,
    },
}

/// Decode the first JSON value from `chunks`, reading no further than needed.
///
/// # Errors
///
/// Returns [`BodyError`] when the stream fails, the value is malformed, the
/// body is blank, or `limit` bytes arrive without a complete value.
pub async fn read_first_value<T, S>(mut chunks: S, limit: usize) -> Result<T, BodyError>
where
    T: DeserializeOwned,
    S: Stream<Item = Result<Bytes, PayloadError>> + Unpin,
{
    let mut buffer = BytesMut::new();
    while let Some(chunk) = chunks.next().await {
        buffer.extend_from_slice(&chunk?);
        if let Some(value) = complete_value(&buffer)? {
            return Ok(value);
        }
        if buffer.len() > limit {
            return Err(BodyError::TooLarge { limit });
        }
    }
    first_value::<T>(&buffer)
        .ok_or(BodyError::Empty)?
        .map_err(BodyError::from)
}

fn first_value<T: DeserializeOwned>(buffer: &[u8]) -> Option<Result<T, serde_json::Error>> {
    serde_json::Deserializer::from_slice(buffer)
        .into_iter::<T>()
        .next()
}

// `None` means more bytes are needed.
fn complete_value<T: DeserializeOwned>(buffer: &[u8]) -> Result<Option<T>, BodyError> {
    match first_value(buffer) {
        Some(Ok(value)) => Ok(Some(value)),
        Some(Err(error)) if !error.is_eof() => Err(error.into()),
        Some(Err(_)) | None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    fn chunked(parts: &[&'static str]) -> impl Stream<Item = Result<Bytes, PayloadError>> + Unpin {
        stream::iter(
            parts
                .iter()
                .map(|part| Ok(Bytes::from_static(part.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[rstest]
    #[case::single_chunk(&[r#"{"name":"a"}"#])]
    #[case::split_value(&[r#"{"na"#, r#"me":"#, r#""a"}"#])]
    #[case::leading_whitespace(&["  \n", r#"{"name":"a"}"#])]
    #[case::trailing_garbage(&[r#"{"name":"a"} not json"#])]
    #[actix_web::test]
    async fn decodes_the_first_value(#[case] parts: &[&'static str]) {
        let value: Named = read_first_value(chunked(parts), MAX_BODY_BYTES)
            .await
            .expect("first value");
        assert_eq!(value, Named { name: "a".to_owned() });
    }

    #[actix_web::test]
    async fn stops_reading_once_the_value_is_complete() {
        let parts = stream::iter(vec![
            Ok(Bytes::from_static(br#"{"name":"a"}"#)),
            Err(PayloadError::Incomplete(None)),
        ]);
        let value: Named = read_first_value(parts, MAX_BODY_BYTES)
            .await
            .expect("value before the failing chunk");
        assert_eq!(value.name, "a");
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::blank(&["   ", "\n"])]
    #[actix_web::test]
    async fn blank_bodies_are_empty(#[case] parts: &[&'static str]) {
        let outcome = read_first_value::<Named, _>(chunked(parts), MAX_BODY_BYTES).await;
        assert!(matches!(outcome, Err(BodyError::Empty)));
    }

    #[rstest]
    #[case::not_json(&["cep=01310100"])]
    #[case::truncated(&[r#"{"name":"#])]
    #[case::wrong_shape(&[r#"["a"]"#])]
    #[actix_web::test]
    async fn malformed_bodies_are_rejected(#[case] parts: &[&'static str]) {
        let outcome = read_first_value::<Named, _>(chunked(parts), MAX_BODY_BYTES).await;
        assert!(matches!(outcome, Err(BodyError::Malformed(_))));
    }

    #[actix_web::test]
    async fn unterminated_values_stop_at_the_limit() {
        let outcome =
            read_first_value::<Named, _>(chunked(&[r#"{"name":""#, "aaaaaaaaaaaaaaaa"]), 16)
                .await;
        assert!(matches!(outcome, Err(BodyError::TooLarge { limit: 16 })));
    }
}

//! Request body sent to the resolver.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub(super) struct WeatherRequestDto<'a> {
    pub(super) cep: &'a str,
}

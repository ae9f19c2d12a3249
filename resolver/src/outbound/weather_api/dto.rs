//! DTOs for current-conditions responses.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct CurrentWeatherDto {
    pub(super) current: CurrentConditionsDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct CurrentConditionsDto {
    pub(super) temp_c: f64,
}

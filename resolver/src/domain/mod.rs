//! Domain model and use-case for resolving a CEP to the current weather.
//!
//! Nothing in here knows about HTTP. Inbound adapters map [`DomainError`] to
//! responses and outbound adapters implement the traits in [`ports`].

pub mod error;
mod locality;
pub mod ports;
mod postal_code;
mod temperature;
mod weather_lookup;

pub use error::{DomainError, ErrorCode};
pub use locality::{Locality, LocalityError};
pub use postal_code::{POSTAL_CODE_LEN, PostalCode, PostalCodeError};
pub use temperature::{TemperatureReading, celsius_to_fahrenheit, celsius_to_kelvin};
pub use weather_lookup::{GET_TEMPERATURE_SPAN, LOOKUP_CEP_SPAN, WeatherLookupService};

//! Domain ports for outbound lookups.
//!
//! Each trait is mocked with `mockall` in unit tests and has a fixture
//! implementation for wiring handlers without network access.

mod locality_directory;
mod macros;
mod weather_provider;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use locality_directory::MockLocalityDirectory;
pub use locality_directory::{
    FixtureLocalityDirectory, LocalityDirectory, LocalityDirectoryError,
};
#[cfg(test)]
pub use weather_provider::MockWeatherProvider;
pub use weather_provider::{FixtureWeatherProvider, WeatherProvider, WeatherProviderError};

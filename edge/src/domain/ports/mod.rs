//! Domain ports for the edge.

mod weather_resolver;

#[cfg(test)]
pub use weather_resolver::MockWeatherResolver;
pub use weather_resolver::{ReplyBody, ResolverReply, WeatherResolver, WeatherResolverError};

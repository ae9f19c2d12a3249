//! Celsius conversions and the reading returned to clients.

use super::Locality;

const FAHRENHEIT_SCALE: f64 = 1.8;
const FAHRENHEIT_OFFSET: f64 = 32.0;
// Whole-degree offset; clients compare against 273, not 273.15.
const KELVIN_OFFSET: f64 = 273.0;

/// Convert Celsius to Fahrenheit.
///
/// # Examples
/// ```
/// use resolver::domain::celsius_to_fahrenheit;
///
/// assert_eq!(celsius_to_fahrenheit(25.0), 77.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "temperature scales are floating point")]
pub const fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * FAHRENHEIT_SCALE + FAHRENHEIT_OFFSET
}

/// Convert Celsius to Kelvin using a fixed offset of 273.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "temperature scales are floating point")]
pub const fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Current temperature for a locality in three scales.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureReading {
    locality: Locality,
    celsius: f64,
    fahrenheit: f64,
    kelvin: f64,
}

impl TemperatureReading {
    /// Build a reading from a Celsius value. No rounding is applied.
    #[must_use]
    pub fn from_celsius(locality: Locality, celsius: f64) -> Self {
        Self {
            locality,
            celsius,
            fahrenheit: celsius_to_fahrenheit(celsius),
            kelvin: celsius_to_kelvin(celsius),
        }
    }

    /// Locality the reading belongs to.
    #[must_use]
    pub const fn locality(&self) -> &Locality {
        &self.locality
    }

    /// Temperature in degrees Celsius.
    #[must_use]
    pub const fn celsius(&self) -> f64 {
        self.celsius
    }

    /// Temperature in degrees Fahrenheit.
    #[must_use]
    pub const fn fahrenheit(&self) -> f64 {
        self.fahrenheit
    }

    /// Temperature in Kelvin.
    #[must_use]
    pub const fn kelvin(&self) -> f64 {
        self.kelvin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::freezing(0.0, 32.0, 273.0)]
    #[case::warm(25.0, 77.0, 298.0)]
    #[case::crossover(-40.0, -40.0, 233.0)]
    #[case::boiling(100.0, 212.0, 373.0)]
    #[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
    fn converts_with_fixed_formulas(
        #[case] celsius: f64,
        #[case] fahrenheit: f64,
        #[case] kelvin: f64,
    ) {
        assert!((celsius_to_fahrenheit(celsius) - fahrenheit).abs() < 1e-9);
        assert!((celsius_to_kelvin(celsius) - kelvin).abs() < 1e-9);
    }

    #[test]
    #[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
    fn reading_derives_all_scales_from_celsius() {
        let locality = Locality::new("Curitiba").expect("valid locality");
        let reading = TemperatureReading::from_celsius(locality.clone(), 18.5);
        assert_eq!(reading.locality(), &locality);
        assert!((reading.celsius() - 18.5).abs() < f64::EPSILON);
        assert!((reading.fahrenheit() - 65.3).abs() < 1e-9);
        assert!((reading.kelvin() - 291.5).abs() < 1e-9);
    }
}

//! Weather observation models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A weather observation at a monitored location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherObservation {
    pub id: Uuid,
    pub date: NaiveDate,
    pub location: String,
    /// Air temperature in degrees Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    pub wind_speed: f64,
    /// Compass direction label; `None` when the station reported nothing
    pub wind_direction: Option<String>,
}

impl WeatherObservation {
    pub fn new(
        date: NaiveDate,
        location: impl Into<String>,
        temperature: f64,
        humidity: f64,
        wind_speed: f64,
        wind_direction: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            location: location.into(),
            temperature,
            humidity,
            wind_speed,
            wind_direction,
        }
    }
}

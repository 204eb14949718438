//! Calendar view models
//!
//! Derived per-day composites. These are constructed for each query and
//! discarded with the response; the store never persists them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CoalTemperature, FireIncident, FirePrediction, WeatherObservation};
use crate::types::{DayStatus, RiskLevel};

/// Fire outcome overlay for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FireSummary {
    pub has_fire: bool,
    pub severity: u32,
}

impl From<&FireIncident> for FireSummary {
    fn from(incident: &FireIncident) -> Self {
        Self {
            has_fire: incident.has_fire,
            severity: incident.severity,
        }
    }
}

/// Forecast overlay for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskSummary {
    pub probability: f64,
    pub risk_level: RiskLevel,
}

impl From<&FirePrediction> for RiskSummary {
    fn from(prediction: &FirePrediction) -> Self {
        Self {
            probability: prediction.fire_probability,
            risk_level: prediction.risk_level,
        }
    }
}

/// Weather overlay for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSummary {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: Option<String>,
}

impl From<&WeatherObservation> for WeatherSummary {
    fn from(observation: &WeatherObservation) -> Self {
        Self {
            temperature: observation.temperature,
            humidity: observation.humidity,
            wind_speed: observation.wind_speed,
            wind_direction: observation.wind_direction.clone(),
        }
    }
}

/// Stockpile temperature overlay for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoalSummary {
    pub temperature: f64,
}

impl From<&CoalTemperature> for CoalSummary {
    fn from(reading: &CoalTemperature) -> Self {
        Self {
            temperature: reading.temperature,
        }
    }
}

/// Composite view of one calendar day across the whole site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub fire: Option<FireSummary>,
    pub prediction: Option<RiskSummary>,
    pub weather: Option<WeatherSummary>,
    pub coal_temp: Option<CoalSummary>,
    pub status: DayStatus,
}

impl CalendarDay {
    /// Blank view for a day with no data
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            fire: None,
            prediction: None,
            weather: None,
            coal_temp: None,
            status: DayStatus::Unknown,
        }
    }

    /// Recompute the status from the current overlays.
    ///
    /// A fire record always outranks a prediction: an inspected day is
    /// `fire` or `safe` no matter what was forecast for it.
    pub fn derive_status(&mut self) {
        self.status = match (&self.fire, &self.prediction) {
            (Some(fire), _) => {
                if fire.has_fire {
                    DayStatus::Fire
                } else {
                    DayStatus::Safe
                }
            }
            (None, Some(prediction)) => match prediction.risk_level {
                RiskLevel::High | RiskLevel::Medium => DayStatus::Risk,
                RiskLevel::Low => DayStatus::Safe,
            },
            (None, None) => DayStatus::Unknown,
        };
    }
}

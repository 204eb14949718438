//! Coal stockpile temperature models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A coal stockpile temperature reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoalTemperature {
    pub id: Uuid,
    pub date: NaiveDate,
    pub location: String,
    /// Stockpile temperature in degrees Celsius
    pub temperature: f64,
}

impl CoalTemperature {
    pub fn new(date: NaiveDate, location: impl Into<String>, temperature: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            location: location.into(),
            temperature,
        }
    }
}

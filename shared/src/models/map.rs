//! Site map models

use serde::{Deserialize, Serialize};

use crate::models::{FireIncident, FirePrediction, WeatherObservation};
use crate::types::MapPoint;

/// Latest known state of one monitored location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationStatus {
    pub location: String,
    /// Resolved grid position; `None` when the location is not in the
    /// coordinate catalog
    pub coordinates: Option<MapPoint>,
    pub fire: Option<FireIncident>,
    pub prediction: Option<FirePrediction>,
    pub weather: Option<WeatherObservation>,
}

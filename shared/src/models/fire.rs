//! Fire incident and prediction models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::RiskLevel;

/// A recorded fire inspection outcome for one location and day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FireIncident {
    pub id: Uuid,
    pub date: NaiveDate,
    pub location: String,
    pub has_fire: bool,
    /// Incident severity; 0 when nothing burned
    pub severity: u32,
}

impl FireIncident {
    pub fn new(date: NaiveDate, location: impl Into<String>, has_fire: bool, severity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            location: location.into(),
            has_fire,
            severity,
        }
    }
}

/// A forecast ignition probability for one location and day
///
/// Keyed by (date, location) in the store; a later forecast run replaces
/// the probability and risk level for the same key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FirePrediction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub location: String,
    /// Probability of ignition in [0, 1]
    pub fire_probability: f64,
    pub risk_level: RiskLevel,
}

impl FirePrediction {
    /// Build a prediction; the risk level is derived from the probability
    /// through the fixed thresholds.
    pub fn new(date: NaiveDate, location: impl Into<String>, fire_probability: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            location: location.into(),
            fire_probability,
            risk_level: RiskLevel::from_probability(fire_probability),
        }
    }
}

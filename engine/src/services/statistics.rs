//! Site-wide fire statistics rollups

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use shared::{DateRange, RiskLevel};

use crate::error::{EngineError, EngineResult};
use crate::services::round_to_tenth;
use crate::store::RecordStore;

/// Flat dashboard summary of the stored series
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FireStatistics {
    /// Incidents recorded with an actual fire
    pub total_fires: u64,
    /// Days elapsed since the most recent fire; 0 when none is on record
    pub days_since_last_fire: i64,
    /// Mean weather temperature across all observations, one decimal;
    /// 0.0 for an empty series
    pub average_temperature: f64,
    /// Majority risk level among predictions dated today or later
    pub current_risk_level: Option<RiskLevel>,
}

/// Statistics rollup service
#[derive(Clone)]
pub struct StatisticsService<S> {
    store: S,
}

impl<S: RecordStore> StatisticsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Summary computed against the current UTC date.
    pub async fn summary(&self) -> EngineResult<FireStatistics> {
        self.summary_at(Utc::now().date_naive()).await
    }

    /// Summary with an explicit "today"; the clock-free core of
    /// [`summary`](Self::summary).
    pub async fn summary_at(&self, today: NaiveDate) -> EngineResult<FireStatistics> {
        let range = DateRange::unbounded();
        let incidents = self
            .store
            .fire_incidents(&range, None)
            .await
            .map_err(EngineError::Aggregation)?;
        let weather = self
            .store
            .weather(&range, None)
            .await
            .map_err(EngineError::Aggregation)?;
        let predictions = self
            .store
            .predictions(&range, None)
            .await
            .map_err(EngineError::Aggregation)?;

        let total_fires = incidents.iter().filter(|i| i.has_fire).count() as u64;

        let last_fire = incidents
            .iter()
            .filter(|i| i.has_fire)
            .map(|i| i.date)
            .max();
        let days_since_last_fire = last_fire.map_or(0, |date| (today - date).num_days());

        let average_temperature = if weather.is_empty() {
            0.0
        } else {
            let sum: f64 = weather.iter().map(|w| w.temperature).sum();
            round_to_tenth(sum / weather.len() as f64)
        };

        let current_risk_level = dominant_risk(
            predictions
                .iter()
                .filter(|p| p.date >= today)
                .map(|p| p.risk_level),
        );

        Ok(FireStatistics {
            total_fires,
            days_since_last_fire,
            average_temperature,
            current_risk_level,
        })
    }
}

/// Majority vote over risk levels; ties resolve by label, ascending.
fn dominant_risk(levels: impl Iterator<Item = RiskLevel>) -> Option<RiskLevel> {
    use std::collections::BTreeMap;

    let mut counts: BTreeMap<&'static str, (u64, RiskLevel)> = BTreeMap::new();
    for level in levels {
        counts.entry(level.label()).or_insert((0, level)).0 += 1;
    }

    // Label-ascending iteration plus strict-greater replacement makes the
    // lexicographically first label win ties.
    let mut best: Option<(u64, RiskLevel)> = None;
    for (count, level) in counts.into_values() {
        if best.map_or(true, |(best_count, _)| count > best_count) {
            best = Some((count, level));
        }
    }
    best.map(|(_, level)| level)
}

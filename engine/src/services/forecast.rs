//! Fire-risk forecasting
//!
//! [`ForecastService`] drives an injected [`RiskModel`] over the stored
//! history and upserts one prediction per location per horizon day. The
//! reference model draws uniform probabilities; a trained estimator
//! implements the same trait and slots in without touching the pipeline.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shared::{
    validate_horizon, validate_probability, CoalTemperature, DateRange, FireIncident,
    FirePrediction, WeatherObservation,
};

use crate::error::{EngineError, EngineResult};
use crate::store::RecordStore;

/// Historical series handed to a risk model
#[derive(Debug, Clone, Default)]
pub struct ForecastHistory {
    pub coal_temperatures: Vec<CoalTemperature>,
    pub weather: Vec<WeatherObservation>,
    pub incidents: Vec<FireIncident>,
}

impl ForecastHistory {
    /// Latest incident date. The horizon is anchored one day after it,
    /// never on the wall clock.
    pub fn anchor(&self) -> Option<NaiveDate> {
        self.incidents.iter().map(|i| i.date).max()
    }

    /// Distinct incident locations, sorted.
    pub fn locations(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.incidents.iter().map(|i| i.location.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }
}

/// Probability source for the forecaster
pub trait RiskModel: Send {
    /// Estimated probability of a fire at `location` on `date`, in [0, 1].
    fn fire_probability(
        &mut self,
        date: NaiveDate,
        location: &str,
        history: &ForecastHistory,
    ) -> f64;
}

/// Reference model drawing uniform probabilities.
///
/// A stand-in until a trained estimator replaces it; only the output
/// shape is contractual, not the randomness.
pub struct StochasticRiskModel {
    rng: StdRng,
}

impl StochasticRiskModel {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic model for tests and reproducible runs.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StochasticRiskModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskModel for StochasticRiskModel {
    fn fire_probability(
        &mut self,
        _date: NaiveDate,
        _location: &str,
        _history: &ForecastHistory,
    ) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Forecast generation service
pub struct ForecastService<S, M> {
    store: S,
    model: M,
}

impl<S: RecordStore, M: RiskModel> ForecastService<S, M> {
    pub fn new(store: S, model: M) -> Self {
        Self { store, model }
    }

    /// Generate and persist predictions for the next `horizon_days`.
    ///
    /// One point per distinct incident location per day, dated strictly
    /// after the latest incident on record. Keys overlapping an earlier
    /// run are overwritten, never duplicated.
    pub async fn run(&mut self, horizon_days: u32) -> EngineResult<Vec<FirePrediction>> {
        validate_horizon(horizon_days).map_err(|e| EngineError::Validation(e.to_string()))?;
        let history = self.load_history().await?;
        let points = self.generate(&history, horizon_days)?;
        for point in &points {
            self.store.upsert_prediction(point.clone()).await?;
        }
        tracing::info!(
            points = points.len(),
            horizon_days,
            "forecast run persisted"
        );
        Ok(points)
    }

    /// Produce forecast points for a history without persisting them.
    pub fn generate(
        &mut self,
        history: &ForecastHistory,
        horizon_days: u32,
    ) -> EngineResult<Vec<FirePrediction>> {
        if history.coal_temperatures.is_empty() {
            return Err(EngineError::InsufficientData("coal temperature"));
        }
        if history.weather.is_empty() {
            return Err(EngineError::InsufficientData("weather"));
        }
        let Some(anchor) = history.anchor() else {
            return Err(EngineError::InsufficientData("fire incident"));
        };

        let locations = history.locations();
        let mut points = Vec::with_capacity(horizon_days as usize * locations.len());
        for offset in 1..=i64::from(horizon_days) {
            let date = anchor + Duration::days(offset);
            for location in &locations {
                let probability = self.model.fire_probability(date, location, history);
                validate_probability(probability).map_err(|e| {
                    EngineError::Validation(format!(
                        "risk model produced probability {probability}: {e}"
                    ))
                })?;
                points.push(FirePrediction::new(date, location.clone(), probability));
            }
        }
        Ok(points)
    }

    async fn load_history(&self) -> EngineResult<ForecastHistory> {
        let range = DateRange::unbounded();
        let coal_temperatures = self
            .store
            .coal_temperatures(&range, None)
            .await
            .map_err(EngineError::Aggregation)?;
        let weather = self
            .store
            .weather(&range, None)
            .await
            .map_err(EngineError::Aggregation)?;
        let incidents = self
            .store
            .fire_incidents(&range, None)
            .await
            .map_err(EngineError::Aggregation)?;
        Ok(ForecastHistory {
            coal_temperatures,
            weather,
            incidents,
        })
    }
}

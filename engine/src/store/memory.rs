//! In-memory reference implementation of [`RecordStore`]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use shared::{CoalTemperature, DateRange, FireIncident, FirePrediction, WeatherObservation};

use super::{RecordStore, StoreError};

#[derive(Default)]
struct StoreInner {
    coal: Vec<CoalTemperature>,
    weather: Vec<WeatherObservation>,
    incidents: Vec<FireIncident>,
    predictions: BTreeMap<(NaiveDate, String), FirePrediction>,
}

/// In-memory record store.
///
/// A cheaply clonable handle over shared state, the same shape as a pooled
/// database handle. Suitable for tests and single-process embedding; not
/// durable. Predictions are keyed by (date, location), so upsert is a
/// plain keyed replace and iteration comes back date-then-location
/// ordered.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_coal_temperatures(
        &self,
        rows: Vec<CoalTemperature>,
    ) -> Result<usize, StoreError> {
        let mut inner = self.write()?;
        let count = rows.len();
        inner.coal.extend(rows);
        Ok(count)
    }

    async fn insert_weather(&self, rows: Vec<WeatherObservation>) -> Result<usize, StoreError> {
        let mut inner = self.write()?;
        let count = rows.len();
        inner.weather.extend(rows);
        Ok(count)
    }

    async fn insert_fire_incidents(&self, rows: Vec<FireIncident>) -> Result<usize, StoreError> {
        let mut inner = self.write()?;
        let count = rows.len();
        inner.incidents.extend(rows);
        Ok(count)
    }

    async fn coal_temperatures(
        &self,
        range: &DateRange,
        location: Option<&str>,
    ) -> Result<Vec<CoalTemperature>, StoreError> {
        let inner = self.read()?;
        let mut rows: Vec<CoalTemperature> = inner
            .coal
            .iter()
            .filter(|r| range.contains(r.date) && location.map_or(true, |l| r.location == l))
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }

    async fn weather(
        &self,
        range: &DateRange,
        location: Option<&str>,
    ) -> Result<Vec<WeatherObservation>, StoreError> {
        let inner = self.read()?;
        let mut rows: Vec<WeatherObservation> = inner
            .weather
            .iter()
            .filter(|r| range.contains(r.date) && location.map_or(true, |l| r.location == l))
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }

    async fn fire_incidents(
        &self,
        range: &DateRange,
        location: Option<&str>,
    ) -> Result<Vec<FireIncident>, StoreError> {
        let inner = self.read()?;
        let mut rows: Vec<FireIncident> = inner
            .incidents
            .iter()
            .filter(|r| range.contains(r.date) && location.map_or(true, |l| r.location == l))
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }

    async fn predictions(
        &self,
        range: &DateRange,
        location: Option<&str>,
    ) -> Result<Vec<FirePrediction>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .predictions
            .values()
            .filter(|p| range.contains(p.date) && location.map_or(true, |l| p.location == l))
            .cloned()
            .collect())
    }

    async fn upsert_prediction(&self, prediction: FirePrediction) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let key = (prediction.date, prediction.location.clone());
        match inner.predictions.get_mut(&key) {
            Some(existing) => {
                existing.fire_probability = prediction.fire_probability;
                existing.risk_level = prediction.risk_level;
            }
            None => {
                inner.predictions.insert(key, prediction);
            }
        }
        Ok(())
    }

    async fn distinct_locations(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.read()?;
        let mut locations: BTreeSet<String> = inner
            .incidents
            .iter()
            .map(|i| i.location.clone())
            .collect();
        locations.extend(inner.predictions.values().map(|p| p.location.clone()));
        Ok(locations.into_iter().collect())
    }

    async fn latest_fire_incident(
        &self,
        location: &str,
    ) -> Result<Option<FireIncident>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .incidents
            .iter()
            .filter(|i| i.location == location)
            .max_by_key(|i| i.date)
            .cloned())
    }

    async fn latest_prediction(
        &self,
        location: &str,
    ) -> Result<Option<FirePrediction>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .predictions
            .values()
            .filter(|p| p.location == location)
            .max_by_key(|p| p.date)
            .cloned())
    }

    async fn latest_weather(
        &self,
        location: &str,
    ) -> Result<Option<WeatherObservation>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .weather
            .iter()
            .filter(|w| w.location == location)
            .max_by_key(|w| w.date)
            .cloned())
    }
}

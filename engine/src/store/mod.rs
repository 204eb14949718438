//! Time-series record store abstraction
//!
//! The engine consumes storage through [`RecordStore`]; concrete backends
//! (a database, the in-memory reference implementation) implement it. The
//! store exposes one stable logical schema keyed by (date, location).

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use shared::{CoalTemperature, DateRange, FireIncident, FirePrediction, WeatherObservation};

/// Failure reported by a [`RecordStore`] backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage backend failed: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Core record store abstraction.
///
/// Backends must return query results ordered by date ascending and, within
/// one date, by insertion order; overlay passes and latest-row selection
/// rely on that ordering. `upsert_prediction` must be atomic relative to
/// concurrent reads: a reader never observes a half-written row, and
/// concurrent writers to one (date, location) key serialize with the last
/// completed call winning.
#[async_trait]
pub trait RecordStore: Send + Sync + Clone {
    async fn insert_coal_temperatures(
        &self,
        rows: Vec<CoalTemperature>,
    ) -> Result<usize, StoreError>;

    async fn insert_weather(&self, rows: Vec<WeatherObservation>) -> Result<usize, StoreError>;

    async fn insert_fire_incidents(&self, rows: Vec<FireIncident>) -> Result<usize, StoreError>;

    async fn coal_temperatures(
        &self,
        range: &DateRange,
        location: Option<&str>,
    ) -> Result<Vec<CoalTemperature>, StoreError>;

    async fn weather(
        &self,
        range: &DateRange,
        location: Option<&str>,
    ) -> Result<Vec<WeatherObservation>, StoreError>;

    async fn fire_incidents(
        &self,
        range: &DateRange,
        location: Option<&str>,
    ) -> Result<Vec<FireIncident>, StoreError>;

    async fn predictions(
        &self,
        range: &DateRange,
        location: Option<&str>,
    ) -> Result<Vec<FirePrediction>, StoreError>;

    /// Overwrite the prediction stored for (date, location) or insert a
    /// new row. An overwritten row keeps its original id.
    async fn upsert_prediction(&self, prediction: FirePrediction) -> Result<(), StoreError>;

    /// Sorted union of the locations seen in the incident and prediction
    /// series.
    async fn distinct_locations(&self) -> Result<Vec<String>, StoreError>;

    /// Most recent incident recorded for a location, if any.
    async fn latest_fire_incident(&self, location: &str)
        -> Result<Option<FireIncident>, StoreError>;

    /// Most recent prediction stored for a location, if any.
    async fn latest_prediction(&self, location: &str)
        -> Result<Option<FirePrediction>, StoreError>;

    /// Most recent weather observation for a location, if any.
    async fn latest_weather(&self, location: &str)
        -> Result<Option<WeatherObservation>, StoreError>;
}

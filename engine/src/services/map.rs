//! Site map overview
//!
//! Latest per-location state joined with coordinates from an explicit
//! catalog. Locations missing from the catalog come back unplaced rather
//! than randomly positioned.

use std::collections::HashMap;

use shared::{LocationStatus, MapPoint};

use crate::error::{EngineError, EngineResult};
use crate::store::RecordStore;

/// Registry of known location coordinates
#[derive(Debug, Clone, Default)]
pub struct CoordinateCatalog {
    points: HashMap<String, MapPoint>,
}

impl CoordinateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from (location, point) pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, MapPoint)>) -> Self {
        Self {
            points: pairs.into_iter().collect(),
        }
    }

    /// Load a catalog from a JSON object of location name to {x, y}.
    pub fn from_json(raw: &str) -> EngineResult<Self> {
        let points: HashMap<String, MapPoint> = serde_json::from_str(raw)
            .map_err(|e| EngineError::Validation(format!("invalid coordinate catalog: {e}")))?;
        Ok(Self { points })
    }

    pub fn register(&mut self, location: impl Into<String>, point: MapPoint) {
        self.points.insert(location.into(), point);
    }

    pub fn resolve(&self, location: &str) -> Option<MapPoint> {
        self.points.get(location).copied()
    }
}

/// Map overview service
#[derive(Clone)]
pub struct MapService<S> {
    store: S,
    catalog: CoordinateCatalog,
}

impl<S: RecordStore> MapService<S> {
    pub fn new(store: S, catalog: CoordinateCatalog) -> Self {
        Self { store, catalog }
    }

    /// Latest state of every location with incident or prediction history.
    pub async fn overview(&self) -> EngineResult<Vec<LocationStatus>> {
        let locations = self
            .store
            .distinct_locations()
            .await
            .map_err(EngineError::Aggregation)?;

        let mut rows = Vec::with_capacity(locations.len());
        for location in locations {
            let fire = self
                .store
                .latest_fire_incident(&location)
                .await
                .map_err(EngineError::Aggregation)?;
            let prediction = self
                .store
                .latest_prediction(&location)
                .await
                .map_err(EngineError::Aggregation)?;
            let weather = self
                .store
                .latest_weather(&location)
                .await
                .map_err(EngineError::Aggregation)?;
            rows.push(LocationStatus {
                coordinates: self.catalog.resolve(&location),
                location,
                fire,
                prediction,
                weather,
            });
        }
        Ok(rows)
    }
}

//! Wind rose rollups over the weather series

use std::collections::BTreeMap;

use serde::Serialize;

use shared::DateRange;

use crate::error::{EngineError, EngineResult};
use crate::services::round_to_tenth;
use crate::store::RecordStore;

/// Observation count for one compass direction
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DirectionCount {
    pub direction: String,
    pub count: u64,
}

/// Aggregated wind report
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WindRose {
    /// Counts per named direction, sorted by direction
    pub directions: Vec<DirectionCount>,
    pub average_speed: f64,
    pub max_speed: f64,
    /// Modal direction; `None` when directionless rows dominate or the
    /// series is empty
    pub dominant_direction: Option<String>,
}

/// Wind rollup service
#[derive(Clone)]
pub struct WindService<S> {
    store: S,
}

impl<S: RecordStore> WindService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Direction buckets, speed aggregates, and the modal direction.
    ///
    /// Rows without a direction stay out of the bucket table but still
    /// count toward the speed aggregates, and their group participates in
    /// the mode. On equal counts a named direction beats the null group
    /// and named ties resolve lexicographically.
    pub async fn rose(&self) -> EngineResult<WindRose> {
        let weather = self
            .store
            .weather(&DateRange::unbounded(), None)
            .await
            .map_err(EngineError::Aggregation)?;

        let mut buckets: BTreeMap<Option<&str>, u64> = BTreeMap::new();
        for observation in &weather {
            *buckets
                .entry(observation.wind_direction.as_deref())
                .or_insert(0) += 1;
        }

        // `None` sorts first, so the replacement rule below must let an
        // equally-counted named group displace it.
        let mut dominant: Option<(Option<&str>, u64)> = None;
        for (&direction, &count) in &buckets {
            let replace = match dominant {
                None => true,
                Some((best_direction, best_count)) => {
                    count > best_count
                        || (count == best_count
                            && best_direction.is_none()
                            && direction.is_some())
                }
            };
            if replace {
                dominant = Some((direction, count));
            }
        }
        let dominant_direction = dominant.and_then(|(direction, _)| direction.map(str::to_string));

        let directions = buckets
            .iter()
            .filter_map(|(direction, &count)| {
                direction.map(|d| DirectionCount {
                    direction: d.to_string(),
                    count,
                })
            })
            .collect();

        let (average_speed, max_speed) = if weather.is_empty() {
            (0.0, 0.0)
        } else {
            let sum: f64 = weather.iter().map(|w| w.wind_speed).sum();
            let max = weather
                .iter()
                .map(|w| w.wind_speed)
                .fold(f64::MIN, f64::max);
            (
                round_to_tenth(sum / weather.len() as f64),
                round_to_tenth(max),
            )
        };

        Ok(WindRose {
            directions,
            average_speed,
            max_speed,
            dominant_direction,
        })
    }
}

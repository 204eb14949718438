//! Forecast pipeline tests
//!
//! Tests for forecast generation including:
//! - Horizon coverage and anchoring on the latest incident date
//! - Probability-to-risk-level threshold mapping
//! - Upsert reconciliation across overlapping runs
//! - Empty-history preconditions

use chrono::NaiveDate;
use proptest::prelude::*;

use coalwatch_engine::error::EngineError;
use coalwatch_engine::services::forecast::ForecastHistory;
use coalwatch_engine::services::{ForecastService, RiskModel, StochasticRiskModel};
use coalwatch_engine::store::{MemoryStore, RecordStore};
use shared::{
    CoalTemperature, DateRange, FireIncident, FirePrediction, RiskLevel, WeatherObservation,
};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Model returning one fixed probability for every point.
struct FixedModel(f64);

impl RiskModel for FixedModel {
    fn fire_probability(
        &mut self,
        _date: NaiveDate,
        _location: &str,
        _history: &ForecastHistory,
    ) -> f64 {
        self.0
    }
}

/// Store seeded with one reading of each kind per incident location.
async fn seeded_store(incidents: Vec<FireIncident>) -> MemoryStore {
    let store = MemoryStore::new();
    store
        .insert_coal_temperatures(vec![CoalTemperature::new(
            date("2024-01-01"),
            "north-pile",
            42.0,
        )])
        .await
        .unwrap();
    store
        .insert_weather(vec![WeatherObservation::new(
            date("2024-01-01"),
            "north-pile",
            5.0,
            70.0,
            3.0,
            Some("N".to_string()),
        )])
        .await
        .unwrap();
    store.insert_fire_incidents(incidents).await.unwrap();
    store
}

fn history_with_incidents(incidents: Vec<FireIncident>) -> ForecastHistory {
    ForecastHistory {
        coal_temperatures: vec![CoalTemperature::new(date("2024-01-01"), "north-pile", 42.0)],
        weather: vec![WeatherObservation::new(
            date("2024-01-01"),
            "north-pile",
            5.0,
            70.0,
            3.0,
            None,
        )],
        incidents,
    }
}

// ============================================================================
// Horizon Coverage
// ============================================================================

#[tokio::test]
async fn five_day_horizon_for_a_single_location() {
    let store = seeded_store(vec![
        FireIncident::new(date("2024-01-05"), "A", false, 0),
        FireIncident::new(date("2024-01-10"), "A", true, 2),
    ])
    .await;

    let mut service = ForecastService::new(store, StochasticRiskModel::from_seed(7));
    let points = service.run(5).await.unwrap();

    assert_eq!(points.len(), 5);
    let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
    let expected: Vec<NaiveDate> = (11..=15)
        .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
        .collect();
    assert_eq!(dates, expected);
    assert!(points.iter().all(|p| p.location == "A"));
    assert!(points
        .iter()
        .all(|p| (0.0..=1.0).contains(&p.fire_probability)));
}

#[tokio::test]
async fn horizon_scales_with_distinct_incident_locations() {
    let store = seeded_store(vec![
        FireIncident::new(date("2024-01-08"), "A", false, 0),
        FireIncident::new(date("2024-01-10"), "B", true, 1),
        FireIncident::new(date("2024-01-09"), "A", true, 3),
    ])
    .await;

    let mut service = ForecastService::new(store.clone(), StochasticRiskModel::from_seed(1));
    let points = service.run(30).await.unwrap();

    assert_eq!(points.len(), 30 * 2);
    let anchor = date("2024-01-10");
    assert!(points.iter().all(|p| p.date > anchor));

    // Every point was persisted, one row per (date, location).
    let stored = store
        .predictions(&DateRange::unbounded(), None)
        .await
        .unwrap();
    assert_eq!(stored.len(), 30 * 2);
}

#[tokio::test]
async fn rerun_overwrites_overlapping_keys_instead_of_duplicating() {
    let store = seeded_store(vec![FireIncident::new(date("2024-01-10"), "A", true, 1)]).await;

    let mut first = ForecastService::new(store.clone(), FixedModel(0.2));
    first.run(5).await.unwrap();
    let mut second = ForecastService::new(store.clone(), FixedModel(0.9));
    second.run(5).await.unwrap();

    let stored = store
        .predictions(&DateRange::unbounded(), None)
        .await
        .unwrap();
    assert_eq!(stored.len(), 5);
    assert!(stored.iter().all(|p| p.fire_probability == 0.9));
    assert!(stored.iter().all(|p| p.risk_level == RiskLevel::High));
}

// ============================================================================
// Preconditions
// ============================================================================

#[tokio::test]
async fn empty_histories_are_insufficient_data() {
    let mut service = ForecastService::new(MemoryStore::new(), FixedModel(0.5));

    let mut history = history_with_incidents(vec![FireIncident::new(
        date("2024-01-10"),
        "A",
        true,
        1,
    )]);
    history.weather.clear();
    assert!(matches!(
        service.generate(&history, 5),
        Err(EngineError::InsufficientData("weather"))
    ));

    let mut history = history_with_incidents(vec![FireIncident::new(
        date("2024-01-10"),
        "A",
        true,
        1,
    )]);
    history.coal_temperatures.clear();
    assert!(matches!(
        service.generate(&history, 5),
        Err(EngineError::InsufficientData("coal temperature"))
    ));

    let history = history_with_incidents(Vec::new());
    assert!(matches!(
        service.generate(&history, 5),
        Err(EngineError::InsufficientData("fire incident"))
    ));
}

#[tokio::test]
async fn zero_day_horizon_is_a_validation_error() {
    let store = seeded_store(vec![FireIncident::new(date("2024-01-10"), "A", true, 1)]).await;
    let mut service = ForecastService::new(store, FixedModel(0.5));

    assert!(matches!(
        service.run(0).await,
        Err(EngineError::Validation(_))
    ));
}

// ============================================================================
// Threshold Mapping
// ============================================================================

#[tokio::test]
async fn threshold_boundaries_map_exactly() {
    let cases = [
        (0.75, RiskLevel::High),
        (0.5, RiskLevel::Medium),
        (0.1, RiskLevel::Low),
        // Boundaries are exclusive.
        (0.7, RiskLevel::Medium),
        (0.4, RiskLevel::Low),
    ];

    for (probability, expected) in cases {
        let mut service = ForecastService::new(MemoryStore::new(), FixedModel(probability));
        let history =
            history_with_incidents(vec![FireIncident::new(date("2024-01-10"), "A", true, 1)]);
        let points = service.generate(&history, 1).unwrap();
        assert_eq!(points[0].risk_level, expected, "probability {probability}");
    }
}

// ============================================================================
// Store Upsert Semantics
// ============================================================================

#[tokio::test]
async fn upsert_is_idempotent_and_keeps_the_original_row_id() {
    let store = MemoryStore::new();
    let first = FirePrediction::new(date("2024-02-01"), "A", 0.3);
    let original_id = first.id;

    store.upsert_prediction(first.clone()).await.unwrap();
    store.upsert_prediction(first.clone()).await.unwrap();

    let stored = store
        .predictions(&DateRange::unbounded(), None)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].fire_probability, 0.3);

    // A replacement with a fresh id keeps the stored identity.
    store
        .upsert_prediction(FirePrediction::new(date("2024-02-01"), "A", 0.8))
        .await
        .unwrap();
    let stored = store
        .predictions(&DateRange::unbounded(), None)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, original_id);
    assert_eq!(stored[0].fire_probability, 0.8);
    assert_eq!(stored[0].risk_level, RiskLevel::High);
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// The threshold mapping is total and deterministic over [0, 1].
        #[test]
        fn prop_probability_maps_to_exactly_one_label(p in 0.0f64..=1.0) {
            let level = RiskLevel::from_probability(p);
            let expected = if p > 0.7 {
                RiskLevel::High
            } else if p > 0.4 {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            };
            prop_assert_eq!(level, expected);
            // Same input, same label.
            prop_assert_eq!(level, RiskLevel::from_probability(p));
        }
    }
}

//! Ingestion integration tests
//!
//! Tests for CSV batch ingestion including:
//! - Header validation before any row is read
//! - Partial-failure tolerance in lenient mode
//! - All-or-nothing strict mode
//! - Date and boolean coercion rules

use chrono::NaiveDate;

use coalwatch_engine::error::EngineError;
use coalwatch_engine::ingest::{ingest_csv, IngestMode};
use coalwatch_engine::store::{MemoryStore, RecordStore};
use shared::{DateRange, RecordKind};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

// ============================================================================
// Lenient Mode
// ============================================================================

#[tokio::test]
async fn lenient_batch_commits_valid_rows_and_reports_skips() {
    let store = MemoryStore::new();
    let csv = "date,location,temperature\n\
               2024-01-01,north-pile,41.5\n\
               2024-01-02,north-pile,not-a-number\n\
               2024-01-03,south-pile,38.0\n";

    let report = ingest_csv(
        &store,
        RecordKind::CoalTemperature,
        csv.as_bytes(),
        IngestMode::Lenient,
    )
    .await
    .unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].line(), 3);

    let rows = store
        .coal_temperatures(&DateRange::unbounded(), None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, date("2024-01-01"));
    assert_eq!(rows[0].location, "north-pile");
    assert_eq!(rows[1].temperature, 38.0);
}

#[tokio::test]
async fn lenient_batch_skips_bad_dates() {
    let store = MemoryStore::new();
    let csv = "date,location,temperature\n\
               01/10/2024,north-pile,41.5\n\
               2024-01-10,north-pile,41.5\n";

    let report = ingest_csv(
        &store,
        RecordKind::CoalTemperature,
        csv.as_bytes(),
        IngestMode::Lenient,
    )
    .await
    .unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn datetime_rows_ingest_with_their_date_part() {
    let store = MemoryStore::new();
    let csv = "date,location,temperature\n\
               2024-03-05 14:30:00,north-pile,44.0\n";

    let report = ingest_csv(
        &store,
        RecordKind::CoalTemperature,
        csv.as_bytes(),
        IngestMode::Lenient,
    )
    .await
    .unwrap();
    assert_eq!(report.inserted, 1);

    let rows = store
        .coal_temperatures(&DateRange::unbounded(), None)
        .await
        .unwrap();
    assert_eq!(rows[0].date, date("2024-03-05"));
}

// ============================================================================
// Strict Mode
// ============================================================================

#[tokio::test]
async fn strict_batch_aborts_on_first_bad_row_and_commits_nothing() {
    let store = MemoryStore::new();
    let csv = "date,location,temperature\n\
               2024-01-01,north-pile,41.5\n\
               2024-01-02,north-pile,garbage\n\
               2024-01-03,south-pile,38.0\n";

    let result = ingest_csv(
        &store,
        RecordKind::CoalTemperature,
        csv.as_bytes(),
        IngestMode::Strict,
    )
    .await;

    assert!(matches!(result, Err(EngineError::Row(_))));
    let rows = store
        .coal_temperatures(&DateRange::unbounded(), None)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

// ============================================================================
// Header Validation
// ============================================================================

#[tokio::test]
async fn missing_required_column_rejects_the_batch() {
    let store = MemoryStore::new();
    // Weather batch without the wind_direction column.
    let csv = "date,location,temperature,humidity,wind_speed\n\
               2024-01-01,north-pile,12.0,60,3.4\n";

    let result = ingest_csv(&store, RecordKind::Weather, csv.as_bytes(), IngestMode::Lenient).await;

    assert!(matches!(result, Err(EngineError::Validation(_))));
    let rows = store.weather(&DateRange::unbounded(), None).await.unwrap();
    assert!(rows.is_empty());
}

// ============================================================================
// Field Coercion
// ============================================================================

#[tokio::test]
async fn incident_flags_follow_the_boolean_coercion_table() {
    let store = MemoryStore::new();
    let csv = "date,location,has_fire,severity\n\
               2024-01-01,north-pile,Yes,3\n\
               2024-01-02,north-pile,1,2\n\
               2024-01-03,north-pile,TRUE,1\n\
               2024-01-04,north-pile,no,0\n\
               2024-01-05,north-pile,,0\n\
               2024-01-06,north-pile,2,0\n";

    let report = ingest_csv(
        &store,
        RecordKind::FireIncident,
        csv.as_bytes(),
        IngestMode::Lenient,
    )
    .await
    .unwrap();
    assert_eq!(report.inserted, 6);

    let rows = store
        .fire_incidents(&DateRange::unbounded(), None)
        .await
        .unwrap();
    let flags: Vec<bool> = rows.iter().map(|r| r.has_fire).collect();
    assert_eq!(flags, vec![true, true, true, false, false, false]);
}

#[tokio::test]
async fn fractional_or_negative_severity_is_a_field_error() {
    let store = MemoryStore::new();
    let csv = "date,location,has_fire,severity\n\
               2024-01-01,north-pile,true,3.5\n\
               2024-01-02,north-pile,true,-1\n\
               2024-01-03,north-pile,true,4\n";

    let report = ingest_csv(
        &store,
        RecordKind::FireIncident,
        csv.as_bytes(),
        IngestMode::Lenient,
    )
    .await
    .unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped, 2);

    let rows = store
        .fire_incidents(&DateRange::unbounded(), None)
        .await
        .unwrap();
    assert_eq!(rows[0].severity, 4);
}

#[tokio::test]
async fn blank_wind_directions_normalize_to_none() {
    let store = MemoryStore::new();
    let csv = "date,location,temperature,humidity,wind_speed,wind_direction\n\
               2024-01-01,north-pile,12.0,60,3.4,NE\n\
               2024-01-02,north-pile,11.0,58,2.1,\n\
               2024-01-03,north-pile,10.5,55,1.9,N/A\n";

    ingest_csv(&store, RecordKind::Weather, csv.as_bytes(), IngestMode::Lenient)
        .await
        .unwrap();

    let rows = store.weather(&DateRange::unbounded(), None).await.unwrap();
    assert_eq!(rows[0].wind_direction.as_deref(), Some("NE"));
    assert_eq!(rows[1].wind_direction, None);
    assert_eq!(rows[2].wind_direction, None);
}

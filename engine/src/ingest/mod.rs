//! CSV ingestion: row normalization and the batch driver
//!
//! Collaborators hand a raw CSV byte stream to [`ingest_csv`]; rows are
//! normalized into typed records and committed through the store in one
//! call. A missing required column rejects the batch before any row is
//! read. Bad rows are logged and skipped in lenient mode, or abort the
//! batch in strict mode.

use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::Serialize;

use shared::{CoalTemperature, FireIncident, RecordKind, WeatherObservation};

use crate::error::{EngineError, EngineResult, RowError};
use crate::store::RecordStore;

/// Date layouts accepted in the `date` column
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How the batch driver reacts to a bad row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestMode {
    /// Log and skip bad rows; commit the rest
    #[default]
    Lenient,
    /// Abort the batch on the first bad row, committing nothing
    Strict,
}

/// One CSV row addressed by column name
pub struct RawRow<'a> {
    headers: &'a StringRecord,
    record: &'a StringRecord,
    line: u64,
}

impl<'a> RawRow<'a> {
    pub fn new(headers: &'a StringRecord, record: &'a StringRecord, line: u64) -> Self {
        Self {
            headers,
            record,
            line,
        }
    }

    /// Raw field value, trimmed.
    fn get(&self, column: &'static str) -> Result<&'a str, RowError> {
        self.headers
            .iter()
            .position(|h| h.trim() == column)
            .and_then(|idx| self.record.get(idx))
            .map(str::trim)
            .ok_or(RowError::MissingColumn {
                line: self.line,
                column,
            })
    }

    fn date(&self, column: &'static str) -> Result<NaiveDate, RowError> {
        let raw = self.get(column)?;
        parse_date(raw).ok_or_else(|| RowError::BadDate {
            line: self.line,
            value: raw.to_string(),
        })
    }

    fn number(&self, column: &'static str) -> Result<f64, RowError> {
        let raw = self.get(column)?;
        raw.parse::<f64>().map_err(|_| RowError::BadField {
            line: self.line,
            field: column,
            value: raw.to_string(),
        })
    }

    fn integer(&self, column: &'static str) -> Result<u32, RowError> {
        let raw = self.get(column)?;
        raw.parse::<u32>().map_err(|_| RowError::BadField {
            line: self.line,
            field: column,
            value: raw.to_string(),
        })
    }

    fn flag(&self, column: &'static str) -> Result<bool, RowError> {
        Ok(coerce_bool(self.get(column)?))
    }

    fn optional_text(&self, column: &'static str) -> Result<Option<String>, RowError> {
        let raw = self.get(column)?;
        if raw.is_empty() || raw.eq_ignore_ascii_case("na") || raw.eq_ignore_ascii_case("n/a") {
            Ok(None)
        } else {
            Ok(Some(raw.to_string()))
        }
    }
}

/// Parse a date from `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
            .ok()
            .map(|dt| dt.date())
    })
}

/// Coerce an incident flag string to a boolean.
///
/// Case-insensitive "true", "1", "t", and "yes" are true; every other
/// value, recognized or not, is false.
pub fn coerce_bool(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "true" | "1" | "t" | "yes"
    )
}

/// A record normalized from one raw row
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    CoalTemperature(CoalTemperature),
    Weather(WeatherObservation),
    FireIncident(FireIncident),
}

/// Normalize one raw row into the record type for `kind`.
pub fn normalize(row: &RawRow<'_>, kind: RecordKind) -> Result<Record, RowError> {
    match kind {
        RecordKind::CoalTemperature => normalize_coal_row(row).map(Record::CoalTemperature),
        RecordKind::Weather => normalize_weather_row(row).map(Record::Weather),
        RecordKind::FireIncident => normalize_incident_row(row).map(Record::FireIncident),
    }
}

pub fn normalize_coal_row(row: &RawRow<'_>) -> Result<CoalTemperature, RowError> {
    Ok(CoalTemperature::new(
        row.date("date")?,
        row.get("location")?,
        row.number("temperature")?,
    ))
}

pub fn normalize_weather_row(row: &RawRow<'_>) -> Result<WeatherObservation, RowError> {
    Ok(WeatherObservation::new(
        row.date("date")?,
        row.get("location")?,
        row.number("temperature")?,
        row.number("humidity")?,
        row.number("wind_speed")?,
        row.optional_text("wind_direction")?,
    ))
}

pub fn normalize_incident_row(row: &RawRow<'_>) -> Result<FireIncident, RowError> {
    Ok(FireIncident::new(
        row.date("date")?,
        row.get("location")?,
        row.flag("has_fire")?,
        row.integer("severity")?,
    ))
}

/// Outcome of one batch ingestion
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub inserted: usize,
    pub skipped: usize,
    /// Row-level failures, in file order
    pub errors: Vec<RowError>,
}

/// Read a CSV batch, normalize every row, and commit the valid records.
///
/// The header row is validated against the column set required for `kind`
/// before any row is read; a missing column fails the whole batch with a
/// validation error and nothing is stored.
pub async fn ingest_csv<S, R>(
    store: &S,
    kind: RecordKind,
    reader: R,
    mode: IngestMode,
) -> EngineResult<IngestReport>
where
    S: RecordStore,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| EngineError::Validation(format!("unreadable CSV header: {e}")))?
        .clone();
    ensure_columns(&headers, kind)?;

    let mut records = Vec::new();
    let mut errors = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        // Line 1 is the header row.
        let line = index as u64 + 2;
        let outcome = match result {
            Ok(record) => normalize(&RawRow::new(&headers, &record, line), kind),
            Err(e) => Err(RowError::Malformed {
                line,
                message: e.to_string(),
            }),
        };
        match outcome {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!(kind = kind.label(), %err, "skipping unparseable row");
                if mode == IngestMode::Strict {
                    return Err(err.into());
                }
                errors.push(err);
            }
        }
    }

    let inserted = commit(store, kind, records).await?;
    tracing::info!(
        kind = kind.label(),
        inserted,
        skipped = errors.len(),
        "ingest batch committed"
    );
    Ok(IngestReport {
        inserted,
        skipped: errors.len(),
        errors,
    })
}

fn ensure_columns(headers: &StringRecord, kind: RecordKind) -> EngineResult<()> {
    for column in kind.required_columns() {
        if !headers.iter().any(|h| h.trim() == *column) {
            return Err(EngineError::Validation(format!(
                "{} batch is missing required column '{column}'",
                kind.label()
            )));
        }
    }
    Ok(())
}

async fn commit<S: RecordStore>(
    store: &S,
    kind: RecordKind,
    records: Vec<Record>,
) -> EngineResult<usize> {
    match kind {
        RecordKind::CoalTemperature => {
            let rows = records
                .into_iter()
                .filter_map(|r| match r {
                    Record::CoalTemperature(row) => Some(row),
                    _ => None,
                })
                .collect();
            Ok(store.insert_coal_temperatures(rows).await?)
        }
        RecordKind::Weather => {
            let rows = records
                .into_iter()
                .filter_map(|r| match r {
                    Record::Weather(row) => Some(row),
                    _ => None,
                })
                .collect();
            Ok(store.insert_weather(rows).await?)
        }
        RecordKind::FireIncident => {
            let rows = records
                .into_iter()
                .filter_map(|r| match r {
                    Record::FireIncident(row) => Some(row),
                    _ => None,
                })
                .collect();
            Ok(store.insert_fire_incidents(rows).await?)
        }
    }
}

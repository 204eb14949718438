//! Common types used across the platform

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fire-risk level assigned to a prediction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Map a fire probability onto a risk level.
    ///
    /// Thresholds are exclusive: 0.7 maps to medium and 0.4 to low.
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.7 {
            RiskLevel::High
        } else if probability > 0.4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status a calendar day resolves to once all overlays are applied
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Fire,
    Safe,
    Risk,
    Unknown,
}

impl DayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DayStatus::Fire => "fire",
            DayStatus::Safe => "safe",
            DayStatus::Risk => "risk",
            DayStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three observation kinds accepted by ingestion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    CoalTemperature,
    Weather,
    FireIncident,
}

impl RecordKind {
    /// Columns a CSV batch of this kind must provide.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            RecordKind::CoalTemperature => &["date", "location", "temperature"],
            RecordKind::Weather => &[
                "date",
                "location",
                "temperature",
                "humidity",
                "wind_speed",
                "wind_direction",
            ],
            RecordKind::FireIncident => &["date", "location", "has_fire", "severity"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::CoalTemperature => "coal temperature",
            RecordKind::Weather => "weather",
            RecordKind::FireIncident => "fire incident",
        }
    }
}

/// Inclusive date range for store queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering a single day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Full bounds of a calendar month, or `None` when the year/month pair
    /// does not name a representable month.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self {
            start,
            end: next_month.pred_opt()?,
        })
    }

    /// Range spanning everything a store may hold.
    pub fn unbounded() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Every day in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// Grid position of a location on the site map
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

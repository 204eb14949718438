//! Calendar aggregation over the stored time series
//!
//! Joins the incident, prediction, weather, and coal-temperature series
//! into per-day composite views with a derived status label. Every day in
//! the requested range is present in the result, populated or not.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use shared::{
    validate_month, CalendarDay, CoalSummary, DateRange, FireSummary, RiskSummary, WeatherSummary,
};

use crate::error::{EngineError, EngineResult};
use crate::store::RecordStore;

/// Calendar aggregation service
#[derive(Clone)]
pub struct CalendarService<S> {
    store: S,
}

impl<S: RecordStore> CalendarService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Composite views for every day of the given month.
    ///
    /// Days with no data come back with all overlays empty and an unknown
    /// status. The month is validated before any store read.
    pub async fn month_view(
        &self,
        year: i32,
        month: u32,
    ) -> EngineResult<BTreeMap<NaiveDate, CalendarDay>> {
        validate_month(month).map_err(|e| EngineError::Validation(e.to_string()))?;
        let range = DateRange::month(year, month).ok_or_else(|| {
            EngineError::Validation(format!("invalid calendar month {year}-{month:02}"))
        })?;
        self.build_range(&range).await
    }

    /// Composite view for a single day.
    pub async fn day_view(&self, date: NaiveDate) -> EngineResult<CalendarDay> {
        let mut days = self.build_range(&DateRange::single(date)).await?;
        Ok(days
            .remove(&date)
            .unwrap_or_else(|| CalendarDay::empty(date)))
    }

    async fn build_range(
        &self,
        range: &DateRange,
    ) -> EngineResult<BTreeMap<NaiveDate, CalendarDay>> {
        let incidents = self
            .store
            .fire_incidents(range, None)
            .await
            .map_err(EngineError::Aggregation)?;
        let predictions = self
            .store
            .predictions(range, None)
            .await
            .map_err(EngineError::Aggregation)?;
        let weather = self
            .store
            .weather(range, None)
            .await
            .map_err(EngineError::Aggregation)?;
        let coal = self
            .store
            .coal_temperatures(range, None)
            .await
            .map_err(EngineError::Aggregation)?;

        let mut days: BTreeMap<NaiveDate, CalendarDay> = range
            .days()
            .map(|date| (date, CalendarDay::empty(date)))
            .collect();

        // Later rows overwrite earlier ones. Fetch order is date-ascending
        // and insertion-ordered within a date, so the overlays are
        // deterministic.
        for incident in &incidents {
            if let Some(day) = days.get_mut(&incident.date) {
                day.fire = Some(FireSummary::from(incident));
            }
        }
        for prediction in &predictions {
            if let Some(day) = days.get_mut(&prediction.date) {
                day.prediction = Some(RiskSummary::from(prediction));
            }
        }
        for observation in &weather {
            if let Some(day) = days.get_mut(&observation.date) {
                day.weather = Some(WeatherSummary::from(observation));
            }
        }
        for reading in &coal {
            if let Some(day) = days.get_mut(&reading.date) {
                day.coal_temp = Some(CoalSummary::from(reading));
            }
        }

        for day in days.values_mut() {
            day.derive_status();
        }
        Ok(days)
    }
}

//! Validation utilities for the CoalWatch platform

// ============================================================================
// Calendar Validations
// ============================================================================

/// Validate a calendar month number (1-12)
pub fn validate_month(month: u32) -> Result<(), &'static str> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err("Month must be between 1 and 12")
    }
}

// ============================================================================
// Forecast Validations
// ============================================================================

/// Validate a fire probability lies in [0, 1]
pub fn validate_probability(probability: f64) -> Result<(), &'static str> {
    if (0.0..=1.0).contains(&probability) {
        Ok(())
    } else {
        Err("Probability must be between 0 and 1")
    }
}

/// Validate a forecast horizon covers at least one day
pub fn validate_horizon(days: u32) -> Result<(), &'static str> {
    if days == 0 {
        Err("Forecast horizon must be at least one day")
    } else {
        Ok(())
    }
}

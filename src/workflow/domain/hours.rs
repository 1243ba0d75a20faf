//! Validated effort and rate scalars.

use super::WorkflowError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-negative, finite hour amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hours(f64);

impl Hours {
    /// Zero hours.
    pub const ZERO: Self = Self(0.0);

    /// Creates a validated hour amount.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidHours`] when the value is negative
    /// or not finite.
    pub fn new(value: f64) -> Result<Self, WorkflowError> {
        if !value.is_finite() || value < 0.0 {
            return Err(WorkflowError::InvalidHours(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns `true` for a strictly positive amount.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }
}

impl Default for Hours {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-negative, finite hourly rate in the client's billing currency.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourlyRate(f64);

impl HourlyRate {
    /// Creates a validated rate.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidHours`] when the value is negative
    /// or not finite.
    pub fn new(value: f64) -> Result<Self, WorkflowError> {
        if !value.is_finite() || value < 0.0 {
            return Err(WorkflowError::InvalidHours(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for HourlyRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Core domain types for the Healthlog system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Health records as accepted, exported and aggregated
//! - Record drafts as typed during form entry, prior to validation
//! - Scalar metric selectors for aggregation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Health Records
// ============================================================================

/// A systolic/diastolic pair in mmHg. Both halves are always present.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl BloodPressure {
    pub fn new(systolic: u16, diastolic: u16) -> Self {
        Self {
            systolic,
            diastolic,
        }
    }
}

/// One dated set of body and vital measurements for an individual.
///
/// Every measurement is optional: the export, import and statistics paths
/// all tolerate partial records.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Body weight in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Height in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<BloodPressure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
}

impl HealthRecord {
    /// Start an otherwise empty record on `date`
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_blood_pressure(mut self, systolic: u16, diastolic: u16) -> Self {
        self.blood_pressure = Some(BloodPressure::new(systolic, diastolic));
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Value of a scalar metric, if this record carries it
    pub fn metric(&self, field: MetricField) -> Option<f64> {
        match field {
            MetricField::Weight => self.weight,
            MetricField::Height => self.height,
            MetricField::Steps => self.steps.map(f64::from),
            MetricField::Systolic => self.blood_pressure.map(|bp| f64::from(bp.systolic)),
            MetricField::Diastolic => self.blood_pressure.map(|bp| f64::from(bp.diastolic)),
        }
    }
}

// ============================================================================
// Drafts (pre-validation input)
// ============================================================================

/// Identity and body-size fields required when registering a new record
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    #[serde(default)]
    pub name: Option<String>,
    /// Optional account name, checked only when given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// A candidate record as typed during form entry.
///
/// Systolic and diastolic are kept apart so that each can be reported
/// missing on its own.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    #[serde(default)]
    pub basic_info: BasicInfo,
    #[serde(default)]
    pub systolic: Option<f64>,
    #[serde(default)]
    pub diastolic: Option<f64>,
}

// ============================================================================
// Metric selectors
// ============================================================================

/// A scalar field of [`HealthRecord`] that can be aggregated
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Weight,
    Height,
    Steps,
    Systolic,
    Diastolic,
}

impl MetricField {
    pub const ALL: [MetricField; 5] = [
        MetricField::Weight,
        MetricField::Height,
        MetricField::Steps,
        MetricField::Systolic,
        MetricField::Diastolic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricField::Weight => "weight",
            MetricField::Height => "height",
            MetricField::Steps => "steps",
            MetricField::Systolic => "systolic",
            MetricField::Diastolic => "diastolic",
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricField {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        MetricField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::Other(format!("Unknown metric field: {}", s)))
    }
}

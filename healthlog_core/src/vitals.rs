//! Vital-sign banding.
//!
//! Each kind has a normal range nested inside a wider warning range; anything
//! outside both is danger.

use crate::BloodPressure;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Vital signs with fixed reference ranges
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    /// Heart rate in bpm
    Pulse,
    /// Systolic pressure in mmHg
    Systolic,
    /// Diastolic pressure in mmHg
    Diastolic,
}

/// Ordered from best to worst, so `max` picks the more severe band
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VitalStatus {
    Normal,
    Warning,
    Danger,
}

/// Reference ranges for one vital kind
#[derive(Clone, Debug, PartialEq)]
pub struct VitalRanges {
    pub normal: RangeInclusive<f64>,
    pub warning: RangeInclusive<f64>,
}

impl VitalKind {
    pub fn ranges(self) -> VitalRanges {
        match self {
            VitalKind::Pulse => VitalRanges {
                normal: 60.0..=100.0,
                warning: 50.0..=110.0,
            },
            VitalKind::Systolic => VitalRanges {
                normal: 90.0..=120.0,
                warning: 80.0..=140.0,
            },
            VitalKind::Diastolic => VitalRanges {
                normal: 60.0..=80.0,
                warning: 50.0..=90.0,
            },
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            VitalKind::Pulse => "bpm",
            VitalKind::Systolic | VitalKind::Diastolic => "mmHg",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VitalKind::Pulse => "pulse",
            VitalKind::Systolic => "systolic",
            VitalKind::Diastolic => "diastolic",
        }
    }
}

impl fmt::Display for VitalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VitalKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pulse" => Ok(VitalKind::Pulse),
            "systolic" => Ok(VitalKind::Systolic),
            "diastolic" => Ok(VitalKind::Diastolic),
            other => Err(crate::Error::Other(format!("Unknown vital kind: {}", other))),
        }
    }
}

impl VitalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VitalStatus::Normal => "normal",
            VitalStatus::Warning => "warning",
            VitalStatus::Danger => "danger",
        }
    }
}

impl fmt::Display for VitalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band a reading. `None` for a missing or non-finite value.
pub fn classify_vital(kind: VitalKind, value: Option<f64>) -> Option<VitalStatus> {
    let value = value.filter(|v| v.is_finite())?;
    let ranges = kind.ranges();

    let status = if ranges.normal.contains(&value) {
        VitalStatus::Normal
    } else if ranges.warning.contains(&value) {
        VitalStatus::Warning
    } else {
        VitalStatus::Danger
    };
    Some(status)
}

/// The worse of the systolic and diastolic bands
pub fn classify_blood_pressure(bp: &BloodPressure) -> VitalStatus {
    let systolic = classify_vital(VitalKind::Systolic, Some(f64::from(bp.systolic)));
    let diastolic = classify_vital(VitalKind::Diastolic, Some(f64::from(bp.diastolic)));
    systolic.max(diastolic).unwrap_or(VitalStatus::Danger)
}

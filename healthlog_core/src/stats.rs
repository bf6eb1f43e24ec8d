//! Summary statistics over record collections.
//!
//! Records that do not carry the aggregated field are left out of every
//! figure, trend included. An input with no usable values yields the
//! zero-valued shape rather than an error.

use crate::{HealthRecord, MetricField};
use chrono::NaiveDate;
use serde::Serialize;

/// One point of a single-metric trend
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TrendPoint {
    pub date: Option<NaiveDate>,
    pub value: f64,
}

/// Average (two decimals), extrema and trend of one metric
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct FieldStats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub trend: Vec<TrendPoint>,
}

/// One point of the combined blood-pressure trend
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct BloodPressureTrendPoint {
    pub date: Option<NaiveDate>,
    pub systolic: u16,
    pub diastolic: u16,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct BloodPressureStats {
    pub systolic: FieldStats,
    pub diastolic: FieldStats,
    pub trend: Vec<BloodPressureTrendPoint>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn summarize(trend: Vec<TrendPoint>) -> FieldStats {
    if trend.is_empty() {
        return FieldStats::default();
    }

    let (sum, min, max) = trend.iter().fold(
        (0.0, f64::INFINITY, f64::NEG_INFINITY),
        |(sum, min, max), point| (sum + point.value, min.min(point.value), max.max(point.value)),
    );

    FieldStats {
        average: round2(sum / trend.len() as f64),
        min,
        max,
        trend,
    }
}

/// Statistics for one metric, trend in input order
pub fn aggregate(records: &[HealthRecord], field: MetricField) -> FieldStats {
    let trend: Vec<TrendPoint> = records
        .iter()
        .filter_map(|record| {
            record.metric(field).map(|value| TrendPoint {
                date: record.date,
                value,
            })
        })
        .collect();

    let skipped = records.len() - trend.len();
    if skipped > 0 {
        tracing::debug!("Skipped {} records without {}", skipped, field);
    }

    summarize(trend)
}

/// Systolic and diastolic statistics plus a combined trend
pub fn aggregate_blood_pressure(records: &[HealthRecord]) -> BloodPressureStats {
    let trend: Vec<BloodPressureTrendPoint> = records
        .iter()
        .filter_map(|record| {
            record.blood_pressure.map(|bp| BloodPressureTrendPoint {
                date: record.date,
                systolic: bp.systolic,
                diastolic: bp.diastolic,
            })
        })
        .collect();

    let skipped = records.len() - trend.len();
    if skipped > 0 {
        tracing::debug!("Skipped {} records without blood pressure", skipped);
    }

    BloodPressureStats {
        systolic: channel(&trend, |p| p.systolic),
        diastolic: channel(&trend, |p| p.diastolic),
        trend,
    }
}

fn channel(
    trend: &[BloodPressureTrendPoint],
    pick: impl Fn(&BloodPressureTrendPoint) -> u16,
) -> FieldStats {
    summarize(
        trend
            .iter()
            .map(|point| TrendPoint {
                date: point.date,
                value: f64::from(pick(point)),
            })
            .collect(),
    )
}

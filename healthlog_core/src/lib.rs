#![forbid(unsafe_code)]

//! Core domain model and business logic for the Healthlog system.
//!
//! This crate provides:
//! - Domain types (health records, drafts, metric selectors)
//! - Field and record validation
//! - BMI and vital-sign classification
//! - CSV interchange (export/import)
//! - Summary statistics and trends
//!
//! Apart from configuration loading, nothing here performs I/O.

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod validation;
pub mod bmi;
pub mod vitals;
pub mod csv_codec;
pub mod stats;

// Re-export commonly used types
pub use error::{Error, FormatError, FormatErrorKind, Result};
pub use types::*;
pub use config::{Bounds, Config, LengthRule, ValidationRules};
pub use validation::{
    is_valid_blood_pressure, is_valid_national_id, is_valid_phone_number, is_valid_username,
    validate_measurements, validate_record, ValidationErrors,
};
pub use bmi::{classify_bmi, BmiBand, BmiReading, Locale};
pub use vitals::{classify_blood_pressure, classify_vital, VitalKind, VitalStatus};
pub use csv_codec::{
    export, export_csv, export_file_name, import_csv, try_export_csv, ExportFormat, CSV_HEADER,
};
pub use stats::{aggregate, aggregate_blood_pressure, BloodPressureStats, FieldStats, TrendPoint};

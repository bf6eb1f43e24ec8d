//! Field and record validation.
//!
//! Field validators are plain predicates. The record validators evaluate
//! every rule independently and collect one message per offending field, so
//! a form can show all problems at once.

use crate::config::{Bounds, LengthRule, ValidationRules};
use crate::{HealthRecord, RecordDraft};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

static NATIONAL_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{6})-?([0-9]{7})$").expect("Invalid national ID regex"));

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^01[016789]-?[0-9]{3,4}-?[0-9]{4}$").expect("Invalid phone number regex")
});

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("Invalid username regex"));

/// Weights applied to the first 12 digits of a national ID
const NATIONAL_ID_MULTIPLIERS: [u32; 12] = [2, 3, 4, 5, 6, 7, 8, 9, 2, 3, 4, 5];

// ============================================================================
// Field validators
// ============================================================================

/// Compute the trailing check digit for the first 12 digits of a national ID.
///
/// Returns `None` unless `first12` is exactly 12 ASCII digits.
pub fn national_id_check_digit(first12: &str) -> Option<u32> {
    if first12.len() != 12 {
        return None;
    }
    let mut sum = 0;
    for (c, weight) in first12.chars().zip(NATIONAL_ID_MULTIPLIERS) {
        sum += c.to_digit(10)? * weight;
    }
    Some((11 - sum % 11) % 10)
}

/// 13-digit national ID, optionally hyphenated after digit 6, with a valid
/// check digit.
pub fn is_valid_national_id(id: &str) -> bool {
    let Some(caps) = NATIONAL_ID_REGEX.captures(id) else {
        return false;
    };
    let digits = format!("{}{}", &caps[1], &caps[2]);
    let (body, check) = digits.split_at(12);

    match (national_id_check_digit(body), check.chars().next().and_then(|c| c.to_digit(10))) {
        (Some(expected), Some(actual)) => expected == actual,
        _ => false,
    }
}

/// Mobile number such as `010-1234-5678` or `01012345678`
pub fn is_valid_phone_number(number: &str) -> bool {
    PHONE_REGEX.is_match(number)
}

/// Blood pressure pair against the default physiological limits.
///
/// False for NaN, systolic outside 70-200, diastolic outside 40-130, or
/// systolic not above diastolic.
pub fn is_valid_blood_pressure(systolic: f64, diastolic: f64) -> bool {
    let rules = ValidationRules::default();
    blood_pressure_within(systolic, diastolic, &rules)
}

/// Blood pressure pair against a configured rule set
pub fn blood_pressure_within(systolic: f64, diastolic: f64, rules: &ValidationRules) -> bool {
    rules.systolic.contains(systolic)
        && rules.diastolic.contains(diastolic)
        && systolic > diastolic
}

/// Account name: ASCII letters, digits and `_`, length per `rule`
pub fn is_valid_username(name: &str, rule: &LengthRule) -> bool {
    let len = name.chars().count();
    len >= rule.min && len <= rule.max && USERNAME_REGEX.is_match(name)
}

// ============================================================================
// Error map
// ============================================================================

/// Field name to message. Empty means the input is acceptable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

// ============================================================================
// Record validators
// ============================================================================

fn range_message(label: &str, bounds: &Bounds, unit: &str) -> String {
    format!(
        "{} must be between {} and {} {}",
        label, bounds.min, bounds.max, unit
    )
}

fn blood_pressure_message(rules: &ValidationRules) -> String {
    format!(
        "Blood pressure must be systolic {}-{} and diastolic {}-{} mmHg, with systolic above diastolic",
        rules.systolic.min, rules.systolic.max, rules.diastolic.min, rules.diastolic.max
    )
}

/// Validate a draft before it is accepted for persistence.
///
/// Never fails; every violated rule adds its own entry.
pub fn validate_record(draft: &RecordDraft, rules: &ValidationRules) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    let info = &draft.basic_info;

    if info.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        errors.insert("name", "Name is required");
    }

    if let Some(username) = info.username.as_deref() {
        if !is_valid_username(username, &rules.username_length) {
            errors.insert(
                "username",
                format!(
                    "Username must be {} to {} letters, digits or underscores",
                    rules.username_length.min, rules.username_length.max
                ),
            );
        }
    }

    match info.phone.as_deref() {
        None | Some("") => errors.insert("phone", "Phone number is required"),
        Some(phone) if !is_valid_phone_number(phone) => {
            errors.insert("phone", "Phone number must look like 010-1234-5678")
        }
        Some(_) => {}
    }

    match info.national_id.as_deref() {
        None | Some("") => errors.insert("national_id", "National ID is required"),
        Some(id) if !is_valid_national_id(id) => {
            errors.insert("national_id", "National ID is not valid")
        }
        Some(_) => {}
    }

    match info.height {
        None => errors.insert("height", "Height is required"),
        Some(h) if !rules.height.contains(h) => {
            errors.insert("height", range_message("Height", &rules.height, "cm"))
        }
        Some(_) => {}
    }

    match info.weight {
        None => errors.insert("weight", "Weight is required"),
        Some(w) if !rules.weight.contains(w) => {
            errors.insert("weight", range_message("Weight", &rules.weight, "kg"))
        }
        Some(_) => {}
    }

    if draft.systolic.is_none() {
        errors.insert("systolic", "Systolic pressure is required");
    }
    if draft.diastolic.is_none() {
        errors.insert("diastolic", "Diastolic pressure is required");
    }
    if let (Some(systolic), Some(diastolic)) = (draft.systolic, draft.diastolic) {
        if !blood_pressure_within(systolic, diastolic, rules) {
            errors.insert("blood_pressure", blood_pressure_message(rules));
        }
    }

    if !errors.is_empty() {
        tracing::debug!("Draft rejected with {} errors: {}", errors.len(), errors);
    }
    errors
}

/// Validate the measurements an already-typed record carries.
///
/// Absent fields are accepted; present ones must respect the rule set.
/// Used to re-check records coming back from CSV import.
pub fn validate_measurements(record: &HealthRecord, rules: &ValidationRules) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if let Some(h) = record.height {
        if !rules.height.contains(h) {
            errors.insert("height", range_message("Height", &rules.height, "cm"));
        }
    }
    if let Some(w) = record.weight {
        if !rules.weight.contains(w) {
            errors.insert("weight", range_message("Weight", &rules.weight, "kg"));
        }
    }
    if let Some(bp) = record.blood_pressure {
        if !blood_pressure_within(f64::from(bp.systolic), f64::from(bp.diastolic), rules) {
            errors.insert("blood_pressure", blood_pressure_message(rules));
        }
    }

    errors
}

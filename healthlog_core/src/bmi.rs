//! Body-mass-index classification.
//!
//! Band thresholds are exclusive upper bounds checked in order against the
//! unrounded BMI; the first match wins.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// BMI band, from lowest to highest
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum BmiBand {
    SevereUnderweight,
    Underweight,
    Normal,
    Overweight,
    Obese,
    SeverelyObese,
}

/// Label language for [`BmiBand::label`]
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl FromStr for Locale {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ko" => Ok(Locale::Ko),
            other => Err(crate::Error::Other(format!("Unknown locale: {}", other))),
        }
    }
}

/// (exclusive upper bound, band). Anything at or above the last bound is
/// [`BmiBand::SeverelyObese`].
const BMI_THRESHOLDS: [(f64, BmiBand); 5] = [
    (16.5, BmiBand::SevereUnderweight),
    (18.5, BmiBand::Underweight),
    (23.0, BmiBand::Normal),
    (25.0, BmiBand::Overweight),
    (30.0, BmiBand::Obese),
];

impl BmiBand {
    /// Band for an unrounded BMI value
    pub fn from_bmi(bmi: f64) -> Self {
        BMI_THRESHOLDS
            .iter()
            .find(|(upper, _)| bmi < *upper)
            .map(|(_, band)| *band)
            .unwrap_or(BmiBand::SeverelyObese)
    }

    /// Stable identifier, matching the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            BmiBand::SevereUnderweight => "severe-underweight",
            BmiBand::Underweight => "underweight",
            BmiBand::Normal => "normal",
            BmiBand::Overweight => "overweight",
            BmiBand::Obese => "obese",
            BmiBand::SeverelyObese => "severely-obese",
        }
    }

    /// Display color (hex RGB)
    pub fn color(self) -> &'static str {
        match self {
            BmiBand::SevereUnderweight => "#5b8def",
            BmiBand::Underweight => "#4fc3f7",
            BmiBand::Normal => "#4caf50",
            BmiBand::Overweight => "#ffb300",
            BmiBand::Obese => "#fb8c00",
            BmiBand::SeverelyObese => "#e53935",
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, BmiBand::SevereUnderweight) => "Severely underweight",
            (Locale::En, BmiBand::Underweight) => "Underweight",
            (Locale::En, BmiBand::Normal) => "Normal",
            (Locale::En, BmiBand::Overweight) => "Overweight",
            (Locale::En, BmiBand::Obese) => "Obese",
            (Locale::En, BmiBand::SeverelyObese) => "Severely obese",
            (Locale::Ko, BmiBand::SevereUnderweight) => "고도 저체중",
            (Locale::Ko, BmiBand::Underweight) => "저체중",
            (Locale::Ko, BmiBand::Normal) => "정상",
            (Locale::Ko, BmiBand::Overweight) => "과체중",
            (Locale::Ko, BmiBand::Obese) => "비만",
            (Locale::Ko, BmiBand::SeverelyObese) => "고도 비만",
        }
    }
}

/// A computed BMI and its band
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BmiReading {
    /// Rounded to one decimal place
    pub bmi: f64,
    pub band: BmiBand,
}

/// BMI from weight (kg) and height (cm).
///
/// `None` when either input is absent, not positive or not finite.
pub fn classify_bmi(weight: Option<f64>, height: Option<f64>) -> Option<BmiReading> {
    let weight = weight.filter(|w| w.is_finite() && *w > 0.0)?;
    let height = height.filter(|h| h.is_finite() && *h > 0.0)?;

    let meters = height / 100.0;
    let bmi = weight / (meters * meters);

    Some(BmiReading {
        bmi: (bmi * 10.0).round() / 10.0,
        band: BmiBand::from_bmi(bmi),
    })
}

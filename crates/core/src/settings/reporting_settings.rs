//! Presentation settings for human-facing exports.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::ValidationError;

/// How the integer part of an amount is grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DigitGrouping {
    /// 12,34,56,789 (lakh/crore)
    #[default]
    Indian,
    /// 123,456,789
    Western,
}

impl FromStr for DigitGrouping {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INDIAN" => Ok(DigitGrouping::Indian),
            "WESTERN" => Ok(DigitGrouping::Western),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown digit grouping '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingSettings {
    pub currency_symbol: String,
    pub minor_units: u32,
    pub digit_grouping: DigitGrouping,
}

impl Default for ReportingSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            minor_units: DISPLAY_DECIMAL_PRECISION,
            digit_grouping: DigitGrouping::Indian,
        }
    }
}

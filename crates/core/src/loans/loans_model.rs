//! Loan domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};
use crate::money::Money;

/// Pricing model of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanType {
    /// Fixed total repayment of `principal × multiplier`.
    TotalRate,
    /// Interest accrues per day per lakh of principal.
    DailyRate,
}

impl LoanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::TotalRate => "TOTAL_RATE",
            LoanType::DailyRate => "DAILY_RATE",
        }
    }
}

impl FromStr for LoanType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "TOTAL_RATE" => Ok(LoanType::TotalRate),
            "DAILY_RATE" => Ok(LoanType::DailyRate),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown loan type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    #[default]
    Active,
    Completed,
    /// Set externally; never touched by reconciliation.
    Closed,
    /// Set externally; never touched by reconciliation.
    BadDebt,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Completed => "COMPLETED",
            LoanStatus::Closed => "CLOSED",
            LoanStatus::BadDebt => "BAD_DEBT",
        }
    }
}

impl FromStr for LoanStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(LoanStatus::Active),
            "COMPLETED" => Ok(LoanStatus::Completed),
            "CLOSED" => Ok(LoanStatus::Closed),
            "BAD_DEBT" => Ok(LoanStatus::BadDebt),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown loan status '{}'",
                other
            ))),
        }
    }
}

/// Repayment cadence: a named cadence, a bare number of days, or `CUSTOM`.
///
/// Serialized as `DAILY`, `WEEKLY`, `BIWEEKLY`, `MONTHLY`, `CUSTOM` or the day count as a string.
/// `CUSTOM` carries no day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RepaymentFrequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    EveryDays(u32),
    Custom,
}

impl RepaymentFrequency {
    pub fn days(&self) -> Option<u32> {
        match self {
            RepaymentFrequency::Daily => Some(1),
            RepaymentFrequency::Weekly => Some(7),
            RepaymentFrequency::Biweekly => Some(15),
            RepaymentFrequency::Monthly => Some(30),
            RepaymentFrequency::EveryDays(days) => Some(*days),
            RepaymentFrequency::Custom => None,
        }
    }

    /// Label used in the breakdown projection: the cadence name, or `45d` for a day count.
    pub fn cycle_label(&self) -> String {
        match self {
            RepaymentFrequency::EveryDays(days) => format!("{}d", days),
            named => named.to_string(),
        }
    }
}

impl fmt::Display for RepaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepaymentFrequency::Daily => f.write_str("DAILY"),
            RepaymentFrequency::Weekly => f.write_str("WEEKLY"),
            RepaymentFrequency::Biweekly => f.write_str("BIWEEKLY"),
            RepaymentFrequency::Monthly => f.write_str("MONTHLY"),
            RepaymentFrequency::EveryDays(days) => write!(f, "{}", days),
            RepaymentFrequency::Custom => f.write_str("CUSTOM"),
        }
    }
}

impl FromStr for RepaymentFrequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "DAILY" => Ok(RepaymentFrequency::Daily),
            "WEEKLY" => Ok(RepaymentFrequency::Weekly),
            "BIWEEKLY" => Ok(RepaymentFrequency::Biweekly),
            "MONTHLY" => Ok(RepaymentFrequency::Monthly),
            "CUSTOM" => Ok(RepaymentFrequency::Custom),
            _ => match trimmed.parse::<u32>() {
                Ok(days) if days > 0 => Ok(RepaymentFrequency::EveryDays(days)),
                _ => Err(ValidationError::InvalidInput(format!(
                    "unknown repayment frequency '{}'",
                    trimmed
                ))),
            },
        }
    }
}

impl TryFrom<String> for RepaymentFrequency {
    type Error = ValidationError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepaymentFrequency> for String {
    fn from(value: RepaymentFrequency) -> Self {
        value.to_string()
    }
}

/// Model-specific pricing parameters, resolved from a loan's optional fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingTerms {
    TotalRate { multiplier: Decimal },
    DailyRate { daily_rate_per_lakh: Decimal },
}

/// Domain model representing a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,
    pub owner_id: String,
    pub client_name: String,
    #[serde(rename = "type")]
    pub loan_type: LoanType,
    pub principal_amount: Money,
    pub start_date: NaiveDate,
    pub disbursement_date: NaiveDate,
    pub frequency: RepaymentFrequency,
    pub status: LoanStatus,
    pub total_rate_multiplier: Option<Decimal>,
    pub tenure: Option<i32>,
    pub daily_rate_per_lakh: Option<Decimal>,
    pub last_interest_generation_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl Loan {
    /// Resolves the parameters of the loan's pricing model.
    ///
    /// Fails with `InvalidState` when the parameter required by the model is missing.
    pub fn pricing_terms(&self) -> Result<PricingTerms> {
        match self.loan_type {
            LoanType::TotalRate => self
                .total_rate_multiplier
                .map(|multiplier| PricingTerms::TotalRate { multiplier })
                .ok_or_else(|| {
                    Error::InvalidState(format!(
                        "loan {} is TOTAL_RATE but has no total_rate_multiplier",
                        self.id
                    ))
                }),
            LoanType::DailyRate => self
                .daily_rate_per_lakh
                .map(|daily_rate_per_lakh| PricingTerms::DailyRate {
                    daily_rate_per_lakh,
                })
                .ok_or_else(|| {
                    Error::InvalidState(format!(
                        "loan {} is DAILY_RATE but has no daily_rate_per_lakh",
                        self.id
                    ))
                }),
        }
    }
}

/// Input model for creating a new loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    pub client_name: String,
    #[serde(rename = "type")]
    pub loan_type: LoanType,
    pub principal_amount: Money,
    pub start_date: NaiveDate,
    pub disbursement_date: NaiveDate,
    pub frequency: RepaymentFrequency,
    #[serde(default)]
    pub status: LoanStatus,
    pub total_rate_multiplier: Option<Decimal>,
    pub tenure: Option<i32>,
    pub daily_rate_per_lakh: Option<Decimal>,
}

impl NewLoan {
    /// Rejects loans whose pricing parameters could not be valuated later.
    pub fn validate(&self) -> Result<()> {
        if self.client_name.trim().is_empty() {
            return Err(ValidationError::MissingField("clientName".to_string()).into());
        }
        if !self.principal_amount.is_positive() {
            return Err(ValidationError::OutOfRange {
                field: "principalAmount",
                requirement: "greater than zero",
            }
            .into());
        }
        if let Some(tenure) = self.tenure {
            if tenure <= 0 {
                return Err(ValidationError::OutOfRange {
                    field: "tenure",
                    requirement: "greater than zero",
                }
                .into());
            }
        }
        match self.loan_type {
            LoanType::TotalRate => match self.total_rate_multiplier {
                None => Err(ValidationError::MissingField("totalRateMultiplier".to_string()).into()),
                Some(m) if m <= Decimal::ONE => Err(ValidationError::OutOfRange {
                    field: "totalRateMultiplier",
                    requirement: "greater than 1",
                }
                .into()),
                Some(_) => Ok(()),
            },
            LoanType::DailyRate => match self.daily_rate_per_lakh {
                None => Err(ValidationError::MissingField("dailyRatePerLakh".to_string()).into()),
                Some(rate) if rate <= Decimal::ZERO => Err(ValidationError::OutOfRange {
                    field: "dailyRatePerLakh",
                    requirement: "greater than zero",
                }
                .into()),
                Some(_) => Ok(()),
            },
        }
    }
}

/// Partial update of a loan. Absent fields are left untouched;
/// `lastInterestGenerationDate: null` clears the date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanUpdate {
    pub status: Option<LoanStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub last_interest_generation_date: Option<Option<NaiveDate>>,
}

impl LoanUpdate {
    pub fn apply_to(&self, loan: &mut Loan) {
        if let Some(status) = self.status {
            loan.status = status;
        }
        if let Some(date) = self.last_interest_generation_date {
            loan.last_interest_generation_date = date;
        }
    }
}

/// Optional filter for listing loans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanFilter {
    pub status: Option<LoanStatus>,
}

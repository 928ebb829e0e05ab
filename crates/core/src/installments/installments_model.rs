//! Installment domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{Result, ValidationError};
use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentKind {
    Regular,
    InterestOnly,
    PrincipalSettlement,
}

impl InstallmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallmentKind::Regular => "REGULAR",
            InstallmentKind::InterestOnly => "INTEREST_ONLY",
            InstallmentKind::PrincipalSettlement => "PRINCIPAL_SETTLEMENT",
        }
    }
}

impl FromStr for InstallmentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "REGULAR" => Ok(InstallmentKind::Regular),
            "INTEREST_ONLY" => Ok(InstallmentKind::InterestOnly),
            "PRINCIPAL_SETTLEMENT" => Ok(InstallmentKind::PrincipalSettlement),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown installment type '{}'",
                other
            ))),
        }
    }
}

/// Stored installment status.
///
/// A stored `Pending`/`Overdue` value may lag behind the calendar. Use
/// [`Installment::effective_status`] for anything user-facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl InstallmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallmentStatus::Pending => "PENDING",
            InstallmentStatus::Paid => "PAID",
            InstallmentStatus::Overdue => "OVERDUE",
        }
    }
}

impl FromStr for InstallmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(InstallmentStatus::Pending),
            "PAID" => Ok(InstallmentStatus::Paid),
            "OVERDUE" => Ok(InstallmentStatus::Overdue),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown installment status '{}'",
                other
            ))),
        }
    }
}

/// Domain model representing one scheduled obligation against a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: String,
    pub owner_id: String,
    pub loan_id: String,
    pub client_name: String,
    pub due_date: NaiveDate,
    pub expected_amount: Money,
    pub paid_amount: Money,
    pub penalty: Money,
    #[serde(rename = "type")]
    pub kind: InstallmentKind,
    pub status: InstallmentStatus,
    pub paid_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl Installment {
    /// `expected − paid`; may be negative for an overpaid installment.
    pub fn remaining(&self) -> Money {
        self.expected_amount - self.paid_amount
    }

    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    /// Date comparison is authoritative; the stored `Overdue` flag is not consulted.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_paid() && self.due_date < today
    }

    pub fn effective_status(&self, today: NaiveDate) -> InstallmentStatus {
        if self.is_paid() {
            InstallmentStatus::Paid
        } else if self.due_date < today {
            InstallmentStatus::Overdue
        } else {
            InstallmentStatus::Pending
        }
    }
}

/// Input model for scheduling a new installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstallment {
    pub loan_id: String,
    pub client_name: String,
    pub due_date: NaiveDate,
    pub expected_amount: Money,
    #[serde(default)]
    pub paid_amount: Money,
    #[serde(default)]
    pub penalty: Money,
    #[serde(rename = "type")]
    pub kind: InstallmentKind,
    #[serde(default)]
    pub status: InstallmentStatus,
}

impl NewInstallment {
    pub fn validate(&self) -> Result<()> {
        if !self.expected_amount.is_positive() {
            return Err(ValidationError::OutOfRange {
                field: "expectedAmount",
                requirement: "greater than zero",
            }
            .into());
        }
        if self.paid_amount.is_negative() {
            return Err(ValidationError::OutOfRange {
                field: "paidAmount",
                requirement: "zero or more",
            }
            .into());
        }
        if self.penalty.is_negative() {
            return Err(ValidationError::OutOfRange {
                field: "penalty",
                requirement: "zero or more",
            }
            .into());
        }
        Ok(())
    }
}

/// Partial update of an installment, e.g. recording or reverting a payment.
///
/// Absent fields are left untouched. `paidDate: null` clears the paid date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentUpdate {
    pub paid_amount: Option<Money>,
    pub penalty: Option<Money>,
    pub status: Option<InstallmentStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub paid_date: Option<Option<NaiveDate>>,
}

impl InstallmentUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.paid_amount.is_some_and(|amount| amount.is_negative()) {
            return Err(ValidationError::OutOfRange {
                field: "paidAmount",
                requirement: "zero or more",
            }
            .into());
        }
        if self.penalty.is_some_and(|amount| amount.is_negative()) {
            return Err(ValidationError::OutOfRange {
                field: "penalty",
                requirement: "zero or more",
            }
            .into());
        }
        Ok(())
    }

    pub fn apply_to(&self, installment: &mut Installment) {
        if let Some(paid_amount) = self.paid_amount {
            installment.paid_amount = paid_amount;
        }
        if let Some(penalty) = self.penalty {
            installment.penalty = penalty;
        }
        if let Some(status) = self.status {
            installment.status = status;
        }
        if let Some(paid_date) = self.paid_date {
            installment.paid_date = paid_date;
        }
    }
}

/// Optional filter for listing installments.
///
/// `status` is matched against the effective (date-derived) status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallmentFilter {
    pub loan_id: Option<String>,
    pub status: Option<InstallmentStatus>,
}

impl InstallmentFilter {
    pub fn for_loan(loan_id: &str) -> Self {
        Self {
            loan_id: Some(loan_id.to_string()),
            status: None,
        }
    }
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::loans::Loan;
use crate::money::Money;
use crate::portfolio::valuation::{LoanValuation, ValuationFailure};

/// One row of the investment-breakdown projection, rebuilt on every resync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentBreakdownRow {
    pub owner_id: String,
    pub loan_id: String,
    pub person: String,
    pub start_date: NaiveDate,
    pub cycle: String,
    pub capital: Money,
    pub interest_percentage: Decimal,
    pub received: Money,
    pub market_principal: Money,
    pub market_interest: Money,
    pub total_market_value: Money,
}

impl InvestmentBreakdownRow {
    pub fn from_valuation(loan: &Loan, valuation: LoanValuation) -> Self {
        Self {
            owner_id: loan.owner_id.clone(),
            loan_id: loan.id.clone(),
            person: loan.client_name.clone(),
            start_date: loan.start_date,
            cycle: loan.frequency.cycle_label(),
            capital: loan.principal_amount,
            interest_percentage: valuation.interest_percentage,
            received: valuation.received,
            market_principal: valuation.market_principal,
            market_interest: valuation.market_interest,
            total_market_value: valuation.total_market_value,
        }
    }
}

/// Outcome of a projection resync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResyncReport {
    pub written: usize,
    pub loan_count: usize,
    pub skipped: Vec<ValuationFailure>,
}

impl ResyncReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.written == self.loan_count
    }

    /// Row count on a clean run, `PartialFailure` when any loan was skipped.
    pub fn into_result(self) -> Result<usize> {
        if self.skipped.is_empty() {
            Ok(self.written)
        } else {
            Err(Error::PartialFailure {
                written: self.written,
                skipped: self.skipped.len(),
            })
        }
    }
}

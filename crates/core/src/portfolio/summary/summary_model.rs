use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::portfolio::valuation::ValuationFailure;

/// Dashboard-level metrics for one owner's lending book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub as_of: Option<NaiveDate>,
    pub total_loans: usize,
    pub active_loans: usize,
    pub total_disbursed: Money,
    pub market_amount: Money,
    pub market_principal: Money,
    pub market_interest: Money,
    pub total_interest_expected: Money,
    pub total_inflow: Money,
    pub total_outflow: Money,
    /// Ledger balance, floored at zero.
    pub cash_in_hand: Money,
    /// Sum of installment payments; reported independently of the ledger.
    pub total_collected: Money,
    pub overdue_count: usize,
    pub overdue_amount: Money,
    /// Loans left out of the market figures because they could not be valuated.
    pub skipped_loans: Vec<ValuationFailure>,
}

impl FinancialSummary {
    pub fn is_partial(&self) -> bool {
        !self.skipped_loans.is_empty()
    }
}

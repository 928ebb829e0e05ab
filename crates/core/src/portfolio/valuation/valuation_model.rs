use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Principal/interest breakdown of one loan's outstanding obligation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanValuation {
    pub loan_id: String,
    pub interest_percentage: Decimal,
    pub received: Money,
    pub market_principal: Money,
    pub market_interest: Money,
    pub total_market_value: Money,
    /// Interest expected over the loan's whole life, independent of payments.
    pub total_interest_expected: Money,
}

/// A loan that a portfolio-wide operation skipped because it could not be valuated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationFailure {
    pub loan_id: String,
    pub reason: String,
}

//! Per-loan valuation.
//!
//! Pure functions over already-fetched records; no I/O and no shared state.

use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::valuation_model::{LoanValuation, ValuationFailure};
use crate::constants::DAILY_RATE_PRINCIPAL_UNIT;
use crate::errors::{Error, Result};
use crate::installments::{Installment, InstallmentKind};
use crate::loans::{Loan, LoanStatus, PricingTerms};
use crate::money::Money;
use crate::utils::RejectedRecord;

/// Valuates one loan against its installments.
///
/// Installments belonging to other loans are ignored, so callers may pass an
/// unfiltered slice. Fails with `InvalidState` when the loan lacks the parameter
/// its pricing model needs, or when a TOTAL_RATE loan's total repayment is not positive.
pub fn valuate_loan<'a, I>(loan: &Loan, installments: I) -> Result<LoanValuation>
where
    I: IntoIterator<Item = &'a Installment>,
{
    let terms = loan.pricing_terms()?;
    let own: Vec<&Installment> = installments
        .into_iter()
        .filter(|i| i.loan_id == loan.id)
        .collect();

    let received: Money = own.iter().map(|i| i.paid_amount).sum();
    let unpaid_remaining: Money = own
        .iter()
        .filter(|i| !i.is_paid())
        .map(|i| i.remaining())
        .sum();
    let principal = loan.principal_amount;

    let (interest_percentage, market_principal, market_interest, total_interest_expected) =
        match terms {
            PricingTerms::TotalRate { multiplier } => {
                let total_repay = principal
                    .amount()
                    .checked_mul(multiplier)
                    .ok_or_else(|| {
                        Error::InvalidState(format!("loan {}: total repayment overflows", loan.id))
                    })?;
                if total_repay <= Decimal::ZERO {
                    return Err(Error::InvalidState(format!(
                        "loan {}: total repayment {} is not positive (multiplier {})",
                        loan.id, total_repay, multiplier
                    )));
                }
                let total_interest = Money::new(total_repay) - principal;
                let interest_percentage = (multiplier - Decimal::ONE) * Decimal::ONE_HUNDRED;

                // A completed loan is fully realized even if an installment still shows a balance.
                let (market_principal, market_interest) = if loan.status == LoanStatus::Completed {
                    (Money::ZERO, Money::ZERO)
                } else {
                    // Split the summed balance once so that both parts add back up exactly.
                    let market_principal = unpaid_remaining
                        .checked_mul_div(principal.amount(), total_repay)
                        .ok_or_else(|| {
                            Error::InvalidState(format!(
                                "loan {}: principal share overflows",
                                loan.id
                            ))
                        })?;
                    (market_principal, unpaid_remaining - market_principal)
                };
                (
                    interest_percentage,
                    market_principal,
                    market_interest,
                    total_interest,
                )
            }
            PricingTerms::DailyRate {
                daily_rate_per_lakh,
            } => {
                let market_principal = if loan.status == LoanStatus::Active {
                    principal
                } else {
                    Money::ZERO
                };
                let total_interest_expected: Money = own
                    .iter()
                    .filter(|i| i.kind == InstallmentKind::InterestOnly)
                    .map(|i| i.expected_amount)
                    .sum();
                (
                    daily_rate_per_lakh,
                    market_principal,
                    unpaid_remaining,
                    total_interest_expected,
                )
            }
        };

    debug!(
        "Valuated loan {} ({}): principal {} interest {} received {}",
        loan.id,
        loan.loan_type.as_str(),
        market_principal,
        market_interest,
        received
    );

    Ok(LoanValuation {
        loan_id: loan.id.clone(),
        interest_percentage,
        received,
        market_principal,
        market_interest,
        total_market_value: market_principal + market_interest,
        total_interest_expected,
    })
}

/// Interest a DAILY_RATE loan accrues over `days`: `principal / 1,00,000 × rate × days`.
pub fn daily_rate_interest(principal: Money, daily_rate_per_lakh: Decimal, days: u32) -> Result<Money> {
    daily_rate_per_lakh
        .checked_mul(Decimal::from(days))
        .and_then(|per_lakh| {
            principal.checked_mul_div(per_lakh, Decimal::from(DAILY_RATE_PRINCIPAL_UNIT))
        })
        .ok_or_else(|| {
            Error::InvalidState(format!(
                "daily interest overflows for principal {} at rate {}",
                principal, daily_rate_per_lakh
            ))
        })
}

/// Indexes installments by their loan id.
pub fn group_installments_by_loan(installments: &[Installment]) -> HashMap<&str, Vec<&Installment>> {
    let mut grouped: HashMap<&str, Vec<&Installment>> = HashMap::new();
    for installment in installments {
        grouped
            .entry(installment.loan_id.as_str())
            .or_default()
            .push(installment);
    }
    grouped
}

/// Loans that cannot be valuated because their own row, or one of their
/// installment rows, failed to decode. One entry per loan; the first reason wins.
pub fn unreadable_loans(
    rejected_loans: &[RejectedRecord],
    rejected_installments: &[RejectedRecord],
) -> BTreeMap<String, ValuationFailure> {
    let mut unreadable = BTreeMap::new();
    for record in rejected_loans {
        unreadable
            .entry(record.loan_id.clone())
            .or_insert_with(|| ValuationFailure {
                loan_id: record.loan_id.clone(),
                reason: record.reason.clone(),
            });
    }
    for record in rejected_installments {
        unreadable
            .entry(record.loan_id.clone())
            .or_insert_with(|| ValuationFailure {
                loan_id: record.loan_id.clone(),
                reason: format!("installment {} unreadable: {}", record.id, record.reason),
            });
    }
    unreadable
}

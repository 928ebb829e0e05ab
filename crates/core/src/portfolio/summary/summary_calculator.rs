use log::warn;
use std::collections::BTreeMap;

use super::summary_model::FinancialSummary;
use crate::installments::Installment;
use crate::loans::{Loan, LoanStatus};
use crate::money::Money;
use crate::portfolio::valuation::{group_installments_by_loan, valuate_loan, ValuationFailure};
use crate::transactions::{Transaction, TransactionType};
use chrono::NaiveDate;

/// Folds an owner's loans, installments and ledger into a [`FinancialSummary`].
///
/// A loan that fails valuation still counts towards `total_loans`, `active_loans`
/// and `total_disbursed`; it only drops out of the market figures and is listed in
/// `skipped_loans`. Overdue figures use the due date, never the stored status.
pub fn summarize(
    loans: &[Loan],
    installments: &[Installment],
    transactions: &[Transaction],
    as_of: NaiveDate,
) -> FinancialSummary {
    summarize_with_skips(loans, installments, transactions, as_of, BTreeMap::new())
}

/// Like [`summarize`], but treats the loans in `unreadable` as failed valuations.
///
/// An entry whose loan is missing from `loans` stands for a loan row that could
/// not be decoded; it is counted in `total_loans` and listed in `skipped_loans`.
pub fn summarize_with_skips(
    loans: &[Loan],
    installments: &[Installment],
    transactions: &[Transaction],
    as_of: NaiveDate,
    mut unreadable: BTreeMap<String, ValuationFailure>,
) -> FinancialSummary {
    let mut summary = FinancialSummary {
        as_of: Some(as_of),
        total_loans: loans.len(),
        ..FinancialSummary::default()
    };

    let by_loan = group_installments_by_loan(installments);
    for loan in loans {
        if loan.status == LoanStatus::Active {
            summary.active_loans += 1;
        }
        summary.total_disbursed += loan.principal_amount;

        if let Some(failure) = unreadable.remove(&loan.id) {
            warn!("Leaving loan {} out of the summary: {}", loan.id, failure.reason);
            summary.skipped_loans.push(failure);
            continue;
        }
        let own = by_loan.get(loan.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
        match valuate_loan(loan, own.iter().copied()) {
            Ok(valuation) => {
                summary.market_principal += valuation.market_principal;
                summary.market_interest += valuation.market_interest;
                summary.market_amount += valuation.total_market_value;
                summary.total_interest_expected += valuation.total_interest_expected;
            }
            Err(err) => {
                warn!("Leaving loan {} out of the summary: {}", loan.id, err);
                summary.skipped_loans.push(ValuationFailure {
                    loan_id: loan.id.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    for (loan_id, failure) in unreadable {
        warn!("Leaving loan {} out of the summary: {}", loan_id, failure.reason);
        summary.total_loans += 1;
        summary.skipped_loans.push(failure);
    }

    for installment in installments {
        summary.total_collected += installment.paid_amount;
        if installment.is_overdue(as_of) {
            summary.overdue_count += 1;
            summary.overdue_amount += installment.remaining();
        }
    }

    for txn in transactions {
        match txn.transaction_type {
            TransactionType::Credit => summary.total_inflow += txn.amount,
            TransactionType::Debit => summary.total_outflow += txn.amount,
        }
    }
    summary.cash_in_hand = transactions
        .iter()
        .map(Transaction::signed_amount)
        .sum::<Money>()
        .non_negative();

    summary
}

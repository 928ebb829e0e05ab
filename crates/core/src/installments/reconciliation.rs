//! Loan-status cascade rules.
//!
//! The cascade is always derived from the full installment set of a loan as it is
//! read at cascade time. No "all paid" flag is cached anywhere.

use super::installments_model::Installment;
use crate::loans::LoanStatus;

/// Decides whether a loan's status must change given all of its installments.
///
/// Returns `None` when no write is needed, which makes re-running the cascade
/// over unchanged installments a no-op.
///
/// * every installment `PAID` and loan `ACTIVE` → `COMPLETED`
/// * some installment not `PAID` and loan `COMPLETED` → `ACTIVE`
///
/// A loan without installments is left alone, and `CLOSED`/`BAD_DEBT` are never touched.
pub fn reconcile_loan_status<'a, I>(current: LoanStatus, installments: I) -> Option<LoanStatus>
where
    I: IntoIterator<Item = &'a Installment>,
{
    let mut seen_any = false;
    let mut all_paid = true;
    for installment in installments {
        seen_any = true;
        if !installment.is_paid() {
            all_paid = false;
            break;
        }
    }

    if !seen_any {
        return None;
    }

    match (current, all_paid) {
        (LoanStatus::Active, true) => Some(LoanStatus::Completed),
        (LoanStatus::Completed, false) => Some(LoanStatus::Active),
        _ => None,
    }
}

use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::breakdown_model::{InvestmentBreakdownRow, ResyncReport};
use super::breakdown_traits::{BreakdownRepositoryTrait, BreakdownServiceTrait};
use crate::errors::{Error, Result};
use crate::installments::InstallmentRepositoryTrait;
use crate::loans::LoanRepositoryTrait;
use crate::portfolio::valuation::{
    group_installments_by_loan, unreadable_loans, valuate_loan, ValuationFailure,
};
use crate::utils::KeyedLocks;

pub struct BreakdownService {
    loan_repository: Arc<dyn LoanRepositoryTrait>,
    installment_repository: Arc<dyn InstallmentRepositoryTrait>,
    breakdown_repository: Arc<dyn BreakdownRepositoryTrait>,
    owner_locks: KeyedLocks,
}

impl BreakdownService {
    pub fn new(
        loan_repository: Arc<dyn LoanRepositoryTrait>,
        installment_repository: Arc<dyn InstallmentRepositoryTrait>,
        breakdown_repository: Arc<dyn BreakdownRepositoryTrait>,
    ) -> Self {
        Self {
            loan_repository,
            installment_repository,
            breakdown_repository,
            owner_locks: KeyedLocks::new(),
        }
    }

    fn build_rows(&self, owner_id: &str) -> Result<(Vec<InvestmentBreakdownRow>, ResyncReport)> {
        let loans = self.loan_repository.scan_for_valuation(owner_id)?;
        let installments = self.installment_repository.scan_for_valuation(owner_id)?;
        let mut unreadable = unreadable_loans(&loans.rejected, &installments.rejected);
        let by_loan = group_installments_by_loan(&installments.records);

        let mut rows = Vec::with_capacity(loans.records.len());
        let mut skipped = Vec::new();
        for loan in &loans.records {
            if let Some(failure) = unreadable.remove(&loan.id) {
                warn!("Skipping loan {} in breakdown resync: {}", loan.id, failure.reason);
                skipped.push(failure);
                continue;
            }
            let own = by_loan.get(loan.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            match valuate_loan(loan, own.iter().copied()) {
                Ok(valuation) => rows.push(InvestmentBreakdownRow::from_valuation(loan, valuation)),
                Err(err) => {
                    warn!("Skipping loan {} in breakdown resync: {}", loan.id, err);
                    skipped.push(ValuationFailure {
                        loan_id: loan.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        // Rows that never decoded into a loan. Anything else left belongs to no loan row.
        for (loan_id, failure) in unreadable {
            if loans.rejected.iter().any(|record| record.loan_id == loan_id) {
                warn!("Skipping loan {} in breakdown resync: {}", loan_id, failure.reason);
                skipped.push(failure);
            } else {
                debug!("Ignoring unreadable installment of unknown loan {}", loan_id);
            }
        }

        let report = ResyncReport {
            written: 0,
            loan_count: loans.row_count(),
            skipped,
        };
        Ok((rows, report))
    }
}

#[async_trait]
impl BreakdownServiceTrait for BreakdownService {
    async fn resync_breakdown(
        &self,
        owner_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ResyncReport> {
        let _guard = self.owner_locks.lock(owner_id).await;
        if cancel.is_cancelled() {
            return Err(Error::Cancelled(format!("breakdown resync for {}", owner_id)));
        }

        let (rows, mut report) = self.build_rows(owner_id)?;
        debug!(
            "Prepared {} breakdown rows for owner {} ({} skipped)",
            rows.len(),
            owner_id,
            report.skipped.len()
        );

        // Last point at which the stored projection is still intact.
        if cancel.is_cancelled() {
            return Err(Error::Cancelled(format!("breakdown resync for {}", owner_id)));
        }

        report.written = self
            .breakdown_repository
            .replace_breakdown_rows(owner_id, rows)
            .await?;
        info!(
            "Breakdown resync for owner {}: {} of {} loans written, {} skipped",
            owner_id,
            report.written,
            report.loan_count,
            report.skipped.len()
        );
        Ok(report)
    }

    fn get_breakdown(&self, owner_id: &str) -> Result<Vec<InvestmentBreakdownRow>> {
        let mut rows = self.breakdown_repository.list(owner_id)?;
        rows.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then_with(|| a.loan_id.cmp(&b.loan_id))
        });
        Ok(rows)
    }
}

use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

use super::summary_calculator::summarize_with_skips;
use super::summary_model::FinancialSummary;
use super::summary_traits::SummaryServiceTrait;
use crate::errors::Result;
use crate::installments::InstallmentRepositoryTrait;
use crate::loans::LoanRepositoryTrait;
use crate::portfolio::valuation::unreadable_loans;
use crate::transactions::{TransactionFilter, TransactionRepositoryTrait};
use crate::utils::time_utils::business_date_today;

pub struct SummaryService {
    loan_repository: Arc<dyn LoanRepositoryTrait>,
    installment_repository: Arc<dyn InstallmentRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
}

impl SummaryService {
    pub fn new(
        loan_repository: Arc<dyn LoanRepositoryTrait>,
        installment_repository: Arc<dyn InstallmentRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    ) -> Self {
        Self {
            loan_repository,
            installment_repository,
            transaction_repository,
        }
    }
}

impl SummaryServiceTrait for SummaryService {
    fn get_financial_summary(&self, owner_id: &str) -> Result<FinancialSummary> {
        self.get_financial_summary_as_of(owner_id, business_date_today())
    }

    fn get_financial_summary_as_of(&self, owner_id: &str, as_of: NaiveDate) -> Result<FinancialSummary> {
        let loans = self.loan_repository.scan_for_valuation(owner_id)?;
        let installments = self.installment_repository.scan_for_valuation(owner_id)?;
        let transactions = self
            .transaction_repository
            .list(owner_id, &TransactionFilter::default())?;
        debug!(
            "Summarizing owner {}: {} loans, {} installments, {} transactions ({} unreadable rows)",
            owner_id,
            loans.row_count(),
            installments.row_count(),
            transactions.len(),
            loans.rejected.len() + installments.rejected.len()
        );

        let mut unreadable = unreadable_loans(&loans.rejected, &installments.rejected);
        unreadable.retain(|loan_id, _| {
            loans.records.iter().any(|loan| &loan.id == loan_id)
                || loans.rejected.iter().any(|record| &record.loan_id == loan_id)
        });
        Ok(summarize_with_skips(
            &loans.records,
            &installments.records,
            &transactions,
            as_of,
            unreadable,
        ))
    }
}

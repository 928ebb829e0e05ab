use async_trait::async_trait;

use crate::errors::Result;
use crate::loans::loans_model::{Loan, LoanFilter, LoanStatus, LoanUpdate, NewLoan};
use crate::utils::ScannedRecords;

/// Trait for loan repository operations.
///
/// Every list query is scoped to one owner. `get_by_id` looks a loan up by primary key
/// only, so that callers can tell a missing loan from one owned by someone else.
#[async_trait]
pub trait LoanRepositoryTrait: Send + Sync {
    fn get_by_id(&self, loan_id: &str) -> Result<Option<Loan>>;
    fn list(&self, owner_id: &str, filter: &LoanFilter) -> Result<Vec<Loan>>;

    /// Lists every loan of the owner for a portfolio-wide computation. A row that
    /// cannot be decoded is set aside in `rejected` instead of failing the read.
    fn scan_for_valuation(&self, owner_id: &str) -> Result<ScannedRecords<Loan>> {
        Ok(ScannedRecords::complete(
            self.list(owner_id, &LoanFilter::default())?,
        ))
    }

    async fn create(&self, owner_id: &str, new_loan: NewLoan) -> Result<Loan>;
    async fn update(&self, loan: Loan) -> Result<Loan>;
    async fn update_status(&self, loan_id: &str, status: LoanStatus) -> Result<Loan>;
    async fn delete(&self, loan_id: &str) -> Result<usize>;
}

/// Trait for loan service operations
#[async_trait]
pub trait LoanServiceTrait: Send + Sync {
    fn get_loan(&self, owner_id: &str, loan_id: &str) -> Result<Loan>;
    fn list_loans(&self, owner_id: &str, filter: &LoanFilter) -> Result<Vec<Loan>>;
    async fn create_loan(&self, owner_id: &str, new_loan: NewLoan) -> Result<Loan>;
    async fn update_loan(&self, owner_id: &str, loan_id: &str, update: LoanUpdate) -> Result<Loan>;
    async fn delete_loan(&self, owner_id: &str, loan_id: &str) -> Result<()>;
}

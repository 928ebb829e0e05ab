use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::loans_model::{Loan, LoanFilter, LoanUpdate, NewLoan};
use super::loans_traits::{LoanRepositoryTrait, LoanServiceTrait};
use crate::errors::{Error, Result};

const ENTITY: &str = "Loan";

/// Service for owner-scoped loan records.
pub struct LoanService {
    repository: Arc<dyn LoanRepositoryTrait>,
}

impl LoanService {
    pub fn new(repository: Arc<dyn LoanRepositoryTrait>) -> Self {
        Self { repository }
    }
}

/// Loads a loan and checks that it belongs to `owner_id`.
pub(crate) fn load_owned_loan(
    repository: &dyn LoanRepositoryTrait,
    owner_id: &str,
    loan_id: &str,
) -> Result<Loan> {
    match repository.get_by_id(loan_id)? {
        Some(loan) if loan.owner_id == owner_id => Ok(loan),
        Some(_) => Err(Error::forbidden(ENTITY, loan_id)),
        None => Err(Error::not_found(ENTITY, loan_id)),
    }
}

#[async_trait]
impl LoanServiceTrait for LoanService {
    fn get_loan(&self, owner_id: &str, loan_id: &str) -> Result<Loan> {
        load_owned_loan(self.repository.as_ref(), owner_id, loan_id)
    }

    fn list_loans(&self, owner_id: &str, filter: &LoanFilter) -> Result<Vec<Loan>> {
        self.repository.list(owner_id, filter)
    }

    async fn create_loan(&self, owner_id: &str, new_loan: NewLoan) -> Result<Loan> {
        new_loan.validate()?;
        let loan = self.repository.create(owner_id, new_loan).await?;
        info!(
            "Created {} loan {} for client '{}'",
            loan.loan_type.as_str(),
            loan.id,
            loan.client_name
        );
        Ok(loan)
    }

    async fn update_loan(&self, owner_id: &str, loan_id: &str, update: LoanUpdate) -> Result<Loan> {
        let mut loan = load_owned_loan(self.repository.as_ref(), owner_id, loan_id)?;
        debug!("Updating loan {} with {:?}", loan_id, update);
        update.apply_to(&mut loan);
        self.repository.update(loan).await
    }

    async fn delete_loan(&self, owner_id: &str, loan_id: &str) -> Result<()> {
        load_owned_loan(self.repository.as_ref(), owner_id, loan_id)?;
        self.repository.delete(loan_id).await?;
        Ok(())
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::installments_model::{Installment, InstallmentFilter, InstallmentUpdate, NewInstallment};
use super::installments_traits::{InstallmentRepositoryTrait, InstallmentServiceTrait};
use super::reconciliation::reconcile_loan_status;
use crate::errors::{DatabaseError, Error, Result};
use crate::loans::{load_owned_loan, LoanRepositoryTrait, LoanStatus};
use crate::utils::KeyedLocks;

const ENTITY: &str = "Installment";

/// Installment reconciliation: partial updates plus the parent-loan status cascade.
///
/// Cascades for the same loan are serialized so that concurrent payments against
/// different installments of one loan always end on the status derived from the
/// latest installment set.
pub struct InstallmentService {
    installment_repository: Arc<dyn InstallmentRepositoryTrait>,
    loan_repository: Arc<dyn LoanRepositoryTrait>,
    loan_locks: KeyedLocks,
}

impl InstallmentService {
    pub fn new(
        installment_repository: Arc<dyn InstallmentRepositoryTrait>,
        loan_repository: Arc<dyn LoanRepositoryTrait>,
    ) -> Self {
        Self {
            installment_repository,
            loan_repository,
            loan_locks: KeyedLocks::new(),
        }
    }

    fn load_owned_installment(&self, owner_id: &str, installment_id: &str) -> Result<Installment> {
        match self.installment_repository.find_by_id(installment_id)? {
            Some(installment) if installment.owner_id == owner_id => Ok(installment),
            Some(installment) => {
                warn!(
                    "Installment {} exists but belongs to owner {}, not {}",
                    installment_id, installment.owner_id, owner_id
                );
                Err(Error::forbidden(ENTITY, installment_id))
            }
            None => Err(Error::not_found(ENTITY, installment_id)),
        }
    }

    /// Recomputes one loan's status from its installments as they are stored now.
    async fn cascade_loan_status(&self, owner_id: &str, loan_id: &str) -> Result<Option<LoanStatus>> {
        let _guard = self.loan_locks.lock(loan_id).await;

        let Some(loan) = self.loan_repository.get_by_id(loan_id)? else {
            warn!("Skipping status cascade: loan {} no longer exists", loan_id);
            return Ok(None);
        };
        if loan.owner_id != owner_id {
            return Err(Error::forbidden("Loan", loan_id));
        }

        let installments = self.installment_repository.list(owner_id, Some(loan_id))?;
        let Some(next_status) = reconcile_loan_status(loan.status, &installments) else {
            debug!(
                "Loan {} stays {} ({} installments)",
                loan_id,
                loan.status.as_str(),
                installments.len()
            );
            return Ok(None);
        };

        self.loan_repository.update_status(loan_id, next_status).await?;
        info!(
            "Loan {} moved from {} to {}",
            loan_id,
            loan.status.as_str(),
            next_status.as_str()
        );
        Ok(Some(next_status))
    }
}

#[async_trait]
impl InstallmentServiceTrait for InstallmentService {
    fn get_installment(&self, owner_id: &str, installment_id: &str) -> Result<Installment> {
        self.load_owned_installment(owner_id, installment_id)
    }

    fn list_installments(
        &self,
        owner_id: &str,
        filter: &InstallmentFilter,
        today: NaiveDate,
    ) -> Result<Vec<Installment>> {
        let installments = self
            .installment_repository
            .list(owner_id, filter.loan_id.as_deref())?;
        Ok(match filter.status {
            Some(status) => installments
                .into_iter()
                .filter(|i| i.effective_status(today) == status)
                .collect(),
            None => installments,
        })
    }

    async fn create_installments(
        &self,
        owner_id: &str,
        new_installments: Vec<NewInstallment>,
    ) -> Result<Vec<Installment>> {
        for new_installment in &new_installments {
            new_installment.validate()?;
        }

        let loan_ids: BTreeSet<String> = new_installments
            .iter()
            .map(|i| i.loan_id.clone())
            .collect();
        for loan_id in &loan_ids {
            load_owned_loan(self.loan_repository.as_ref(), owner_id, loan_id)?;
        }

        let created = self
            .installment_repository
            .create_many(owner_id, new_installments)
            .await?;
        debug!("Created {} installments for owner {}", created.len(), owner_id);

        for loan_id in &loan_ids {
            self.cascade_loan_status(owner_id, loan_id).await?;
        }
        Ok(created)
    }

    async fn apply_installment_update(
        &self,
        owner_id: &str,
        installment_id: &str,
        patch: InstallmentUpdate,
    ) -> Result<Installment> {
        patch.validate()?;
        let mut installment = self.load_owned_installment(owner_id, installment_id)?;
        debug!("Updating installment {} with {:?}", installment_id, patch);

        patch.apply_to(&mut installment);
        let updated = self.installment_repository.upsert(installment).await?;

        self.cascade_loan_status(owner_id, &updated.loan_id).await?;
        Ok(updated)
    }

    async fn delete_installment(&self, owner_id: &str, installment_id: &str) -> Result<()> {
        let installment = self.load_owned_installment(owner_id, installment_id)?;
        self.installment_repository.delete(installment_id).await?;
        self.cascade_loan_status(owner_id, &installment.loan_id).await?;
        Ok(())
    }

    async fn sync_all_loan_statuses(&self, owner_id: &str) -> Result<usize> {
        let loans = self.loan_repository.scan_for_valuation(owner_id)?;
        for record in &loans.rejected {
            warn!("Skipping status sync of unreadable loan {}: {}", record.id, record.reason);
        }
        let mut updated_count = 0;
        for loan in &loans.records {
            match self.cascade_loan_status(owner_id, &loan.id).await {
                Ok(Some(_)) => updated_count += 1,
                Ok(None) => {}
                Err(Error::Database(DatabaseError::CorruptRecord(reason))) => {
                    warn!("Skipping status sync of loan {}: {}", loan.id, reason);
                }
                Err(err) => return Err(err),
            }
        }
        info!(
            "Synced loan statuses for owner {}: {} of {} loans updated",
            owner_id,
            updated_count,
            loans.row_count()
        );
        Ok(updated_count)
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;
use crate::utils::ScannedRecords;
use crate::installments::installments_model::{
    Installment, InstallmentFilter, InstallmentUpdate, NewInstallment,
};

/// Trait for installment repository operations
#[async_trait]
pub trait InstallmentRepositoryTrait: Send + Sync {
    /// Looks an installment up by primary key, regardless of owner.
    fn find_by_id(&self, installment_id: &str) -> Result<Option<Installment>>;

    /// Lists an owner's installments ordered by due date, optionally for one loan.
    fn list(&self, owner_id: &str, loan_id: Option<&str>) -> Result<Vec<Installment>>;

    /// Every installment of the owner, with undecodable rows set aside.
    fn scan_for_valuation(&self, owner_id: &str) -> Result<ScannedRecords<Installment>> {
        Ok(ScannedRecords::complete(self.list(owner_id, None)?))
    }

    async fn create_many(
        &self,
        owner_id: &str,
        new_installments: Vec<NewInstallment>,
    ) -> Result<Vec<Installment>>;

    /// Inserts or replaces the full installment record.
    async fn upsert(&self, installment: Installment) -> Result<Installment>;

    async fn delete(&self, installment_id: &str) -> Result<usize>;
}

/// Trait for installment service operations
#[async_trait]
pub trait InstallmentServiceTrait: Send + Sync {
    fn get_installment(&self, owner_id: &str, installment_id: &str) -> Result<Installment>;

    fn list_installments(
        &self,
        owner_id: &str,
        filter: &InstallmentFilter,
        today: NaiveDate,
    ) -> Result<Vec<Installment>>;

    async fn create_installments(
        &self,
        owner_id: &str,
        new_installments: Vec<NewInstallment>,
    ) -> Result<Vec<Installment>>;

    /// Applies a partial update, persists it, then cascades the parent loan's status.
    async fn apply_installment_update(
        &self,
        owner_id: &str,
        installment_id: &str,
        patch: InstallmentUpdate,
    ) -> Result<Installment>;

    async fn delete_installment(&self, owner_id: &str, installment_id: &str) -> Result<()>;

    /// Runs the status cascade over every loan of the owner. Returns how many loans changed.
    async fn sync_all_loan_statuses(&self, owner_id: &str) -> Result<usize>;
}

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::breakdown_model::{InvestmentBreakdownRow, ResyncReport};
use crate::errors::Result;

/// Storage for the breakdown projection.
#[async_trait]
pub trait BreakdownRepositoryTrait: Send + Sync {
    fn list(&self, owner_id: &str) -> Result<Vec<InvestmentBreakdownRow>>;

    async fn delete_rows(&self, owner_id: &str) -> Result<usize>;

    async fn insert_rows(&self, owner_id: &str, rows: Vec<InvestmentBreakdownRow>) -> Result<usize>;

    /// Replaces the owner's projection with `rows`.
    ///
    /// The default is a two-phase delete then insert: if the insert fails the owner
    /// is left with no rows until the next successful resync. Implementations that
    /// can run both phases in one transaction should override it.
    async fn replace_breakdown_rows(
        &self,
        owner_id: &str,
        rows: Vec<InvestmentBreakdownRow>,
    ) -> Result<usize> {
        self.delete_rows(owner_id).await?;
        self.insert_rows(owner_id, rows).await
    }
}

#[async_trait]
pub trait BreakdownServiceTrait: Send + Sync {
    /// Recomputes every row for the owner and replaces the stored projection.
    ///
    /// Loans that fail valuation are skipped and listed in the report. Cancelling
    /// `cancel` before the replace leaves the stored projection untouched.
    async fn resync_breakdown(
        &self,
        owner_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ResyncReport>;

    /// Stored rows, newest start date first.
    fn get_breakdown(&self, owner_id: &str) -> Result<Vec<InvestmentBreakdownRow>>;
}

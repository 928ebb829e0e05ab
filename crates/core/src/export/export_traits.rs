use async_trait::async_trait;
use chrono::NaiveDate;

use super::export_model::{ExportReport, SheetTable};
use crate::errors::Result;

/// Destination for human-facing sheets. Implementations own retries and layout.
#[async_trait]
pub trait ExportSinkTrait: Send + Sync {
    async fn write_sheet(&self, table: &SheetTable) -> Result<()>;
}

#[async_trait]
pub trait ExportServiceTrait: Send + Sync {
    /// Writes the owner's loans, installments, ledger and breakdown projection.
    ///
    /// A sheet that fails is recorded in the report; the remaining sheets are
    /// still attempted.
    async fn export_owner(&self, owner_id: &str, today: NaiveDate) -> Result<ExportReport>;
}

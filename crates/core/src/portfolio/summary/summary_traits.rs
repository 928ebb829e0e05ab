use chrono::NaiveDate;

use super::summary_model::FinancialSummary;
use crate::errors::Result;

pub trait SummaryServiceTrait: Send + Sync {
    /// Summary as of the current business date.
    fn get_financial_summary(&self, owner_id: &str) -> Result<FinancialSummary>;

    fn get_financial_summary_as_of(&self, owner_id: &str, as_of: NaiveDate) -> Result<FinancialSummary>;
}

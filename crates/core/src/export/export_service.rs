use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, error, info};
use std::sync::Arc;

use super::export_model::{ExportReport, SheetFailure, SheetTable};
use super::export_traits::{ExportServiceTrait, ExportSinkTrait};
use crate::constants::{BREAKDOWN_SHEET, INSTALLMENTS_SHEET, LOANS_SHEET, TRANSACTIONS_SHEET};
use crate::errors::Result;
use crate::installments::InstallmentRepositoryTrait;
use crate::loans::{Loan, LoanFilter, LoanRepositoryTrait, PricingTerms};
use crate::money::{format_currency, Money};
use crate::portfolio::breakdown::BreakdownRepositoryTrait;
use crate::portfolio::valuation::daily_rate_interest;
use crate::settings::ReportingSettings;
use crate::transactions::{TransactionFilter, TransactionRepositoryTrait};

const LOAN_HEADER: &[&str] = &[
    "ID",
    "Client",
    "Type",
    "Principal",
    "Start Date",
    "Disbursement Date",
    "Frequency",
    "Status",
    "Rate",
    "Cycle Interest",
];

const INSTALLMENT_HEADER: &[&str] = &[
    "ID",
    "Loan ID",
    "Client",
    "Due Date",
    "Expected",
    "Paid",
    "Penalty",
    "Type",
    "Status",
    "Paid Date",
];

const TRANSACTION_HEADER: &[&str] = &["Date", "Type", "Category", "Description", "Amount"];

const BREAKDOWN_HEADER: &[&str] = &[
    "Person",
    "Start Date",
    "Cycle",
    "Capital",
    "Interest %",
    "Received",
    "Market Principal",
    "Market Interest",
    "Total Market Value",
];

/// Builds currency-formatted sheets from stored records and hands them to a sink.
pub struct ExportService {
    loan_repository: Arc<dyn LoanRepositoryTrait>,
    installment_repository: Arc<dyn InstallmentRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    breakdown_repository: Arc<dyn BreakdownRepositoryTrait>,
    sink: Arc<dyn ExportSinkTrait>,
    settings: ReportingSettings,
}

impl ExportService {
    pub fn new(
        loan_repository: Arc<dyn LoanRepositoryTrait>,
        installment_repository: Arc<dyn InstallmentRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        breakdown_repository: Arc<dyn BreakdownRepositoryTrait>,
        sink: Arc<dyn ExportSinkTrait>,
        settings: ReportingSettings,
    ) -> Self {
        Self {
            loan_repository,
            installment_repository,
            transaction_repository,
            breakdown_repository,
            sink,
            settings,
        }
    }

    fn money(&self, amount: Money) -> String {
        format_currency(amount, &self.settings)
    }

    fn loan_row(&self, loan: &Loan) -> Vec<String> {
        let (rate, cycle_interest) = match loan.pricing_terms() {
            Ok(PricingTerms::TotalRate { multiplier }) => (format!("{}x", multiplier), String::new()),
            Ok(PricingTerms::DailyRate {
                daily_rate_per_lakh,
            }) => {
                let per_cycle = loan
                    .frequency
                    .days()
                    .and_then(|days| {
                        daily_rate_interest(loan.principal_amount, daily_rate_per_lakh, days).ok()
                    })
                    .map(|amount| self.money(amount))
                    .unwrap_or_default();
                (format!("{} per lakh/day", daily_rate_per_lakh), per_cycle)
            }
            Err(_) => (String::new(), String::new()),
        };
        vec![
            loan.id.clone(),
            loan.client_name.clone(),
            loan.loan_type.as_str().to_string(),
            self.money(loan.principal_amount),
            loan.start_date.to_string(),
            loan.disbursement_date.to_string(),
            loan.frequency.to_string(),
            loan.status.as_str().to_string(),
            rate,
            cycle_interest,
        ]
    }

    fn loans_sheet(&self, owner_id: &str) -> Result<SheetTable> {
        let loans = self.loan_repository.list(owner_id, &LoanFilter::default())?;
        let data = loans.iter().map(|loan| self.loan_row(loan)).collect();
        Ok(SheetTable::new(LOANS_SHEET, LOAN_HEADER, data))
    }

    fn installments_sheet(&self, owner_id: &str, today: NaiveDate) -> Result<SheetTable> {
        let installments = self.installment_repository.list(owner_id, None)?;
        let data = installments
            .iter()
            .map(|i| {
                vec![
                    i.id.clone(),
                    i.loan_id.clone(),
                    i.client_name.clone(),
                    i.due_date.to_string(),
                    self.money(i.expected_amount),
                    self.money(i.paid_amount),
                    self.money(i.penalty),
                    i.kind.as_str().to_string(),
                    i.effective_status(today).as_str().to_string(),
                    i.paid_date.map(|d| d.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        Ok(SheetTable::new(INSTALLMENTS_SHEET, INSTALLMENT_HEADER, data))
    }

    fn transactions_sheet(&self, owner_id: &str) -> Result<SheetTable> {
        let transactions = self
            .transaction_repository
            .list(owner_id, &TransactionFilter::default())?;
        let data = transactions
            .iter()
            .map(|t| {
                vec![
                    t.date.format("%Y-%m-%d %H:%M").to_string(),
                    t.transaction_type.as_str().to_string(),
                    t.category.clone(),
                    t.description.clone(),
                    self.money(t.amount),
                ]
            })
            .collect();
        Ok(SheetTable::new(TRANSACTIONS_SHEET, TRANSACTION_HEADER, data))
    }

    fn breakdown_sheet(&self, owner_id: &str) -> Result<SheetTable> {
        let mut rows = self.breakdown_repository.list(owner_id)?;
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.person.clone(),
                    r.start_date.to_string(),
                    r.cycle.clone(),
                    self.money(r.capital),
                    format!("{}%", r.interest_percentage.normalize()),
                    self.money(r.received),
                    self.money(r.market_principal),
                    self.money(r.market_interest),
                    self.money(r.total_market_value),
                ]
            })
            .collect();
        Ok(SheetTable::new(BREAKDOWN_SHEET, BREAKDOWN_HEADER, data))
    }
}

#[async_trait]
impl ExportServiceTrait for ExportService {
    async fn export_owner(&self, owner_id: &str, today: NaiveDate) -> Result<ExportReport> {
        let sheets = [
            (LOANS_SHEET, self.loans_sheet(owner_id)),
            (INSTALLMENTS_SHEET, self.installments_sheet(owner_id, today)),
            (TRANSACTIONS_SHEET, self.transactions_sheet(owner_id)),
            (BREAKDOWN_SHEET, self.breakdown_sheet(owner_id)),
        ];

        let mut report = ExportReport::default();
        for (name, built) in sheets {
            let outcome = match built {
                Ok(table) => {
                    debug!("Writing sheet '{}' ({} rows)", name, table.rows.len());
                    self.sink.write_sheet(&table).await
                }
                Err(err) => Err(err),
            };
            match outcome {
                Ok(()) => report.sheets_written.push(name.to_string()),
                Err(err) => {
                    error!("Export of sheet '{}' for owner {} failed: {}", name, owner_id, err);
                    report.failures.push(SheetFailure {
                        sheet: name.to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            "Exported {} sheets for owner {} ({} failed)",
            report.sheets_written.len(),
            owner_id,
            report.failures.len()
        );
        Ok(report)
    }
}

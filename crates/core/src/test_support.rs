//! Fixtures and an in-memory storage collaborator shared by the unit tests.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::errors::{DatabaseError, Error, Result};
use crate::installments::{
    Installment, InstallmentKind, InstallmentRepositoryTrait, InstallmentStatus, NewInstallment,
};
use crate::loans::{
    Loan, LoanFilter, LoanRepositoryTrait, LoanStatus, LoanType, NewLoan, RepaymentFrequency,
};
use crate::money::Money;
use crate::portfolio::breakdown::{BreakdownRepositoryTrait, InvestmentBreakdownRow};
use crate::transactions::{
    NewTransaction, Transaction, TransactionFilter, TransactionRepositoryTrait, TransactionType,
};
use crate::utils::{RejectedRecord, ScannedRecords};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn midnight(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(0, 0, 0).unwrap()
}

pub fn total_rate_loan(id: &str, owner: &str, principal: Decimal, multiplier: Decimal) -> Loan {
    Loan {
        id: id.to_string(),
        owner_id: owner.to_string(),
        client_name: format!("Client {}", id),
        loan_type: LoanType::TotalRate,
        principal_amount: Money::new(principal),
        start_date: date(2024, 1, 1),
        disbursement_date: date(2024, 1, 1),
        frequency: RepaymentFrequency::Weekly,
        status: LoanStatus::Active,
        total_rate_multiplier: Some(multiplier),
        tenure: Some(10),
        daily_rate_per_lakh: None,
        last_interest_generation_date: None,
        created_at: midnight(date(2024, 1, 1)),
    }
}

pub fn daily_rate_loan(id: &str, owner: &str, principal: Decimal, rate: Decimal) -> Loan {
    Loan {
        loan_type: LoanType::DailyRate,
        total_rate_multiplier: None,
        tenure: None,
        daily_rate_per_lakh: Some(rate),
        ..total_rate_loan(id, owner, principal, Decimal::ONE)
    }
}

pub fn installment(
    id: &str,
    owner: &str,
    loan_id: &str,
    due_date: NaiveDate,
    expected: Decimal,
) -> Installment {
    Installment {
        id: id.to_string(),
        owner_id: owner.to_string(),
        loan_id: loan_id.to_string(),
        client_name: format!("Client {}", loan_id),
        due_date,
        expected_amount: Money::new(expected),
        paid_amount: Money::ZERO,
        penalty: Money::ZERO,
        kind: InstallmentKind::Regular,
        status: InstallmentStatus::Pending,
        paid_date: None,
        created_at: midnight(date(2024, 1, 1)),
    }
}

/// A transaction dated `day_offset` days after 2024-01-01.
pub fn transaction(
    id: &str,
    owner: &str,
    transaction_type: TransactionType,
    amount: Decimal,
    day_offset: i64,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        owner_id: owner.to_string(),
        amount: Money::new(amount),
        transaction_type,
        category: "General".to_string(),
        description: String::new(),
        date: midnight(date(2024, 1, 1)) + Duration::days(day_offset),
        related_entity_id: None,
    }
}

/// In-memory implementation of every repository trait.
#[derive(Default)]
pub struct InMemoryStore {
    loans: RwLock<BTreeMap<String, Loan>>,
    installments: RwLock<BTreeMap<String, Installment>>,
    transactions: RwLock<BTreeMap<String, Transaction>>,
    breakdown: RwLock<Vec<InvestmentBreakdownRow>>,
    next_id: AtomicUsize,
    fail_breakdown_insert: AtomicBool,
    status_writes: AtomicUsize,
    rejected_loans: RwLock<Vec<(String, RejectedRecord)>>,
    rejected_installments: RwLock<Vec<(String, RejectedRecord)>>,
}

impl InMemoryStore {
    fn next_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    pub fn insert_loan(&self, loan: Loan) {
        self.loans.write().unwrap().insert(loan.id.clone(), loan);
    }

    pub fn insert_installment(&self, installment: Installment) {
        self.installments
            .write()
            .unwrap()
            .insert(installment.id.clone(), installment);
    }

    pub fn insert_transaction(&self, transaction: Transaction) {
        self.transactions
            .write()
            .unwrap()
            .insert(transaction.id.clone(), transaction);
    }

    pub fn loan_status(&self, loan_id: &str) -> LoanStatus {
        self.loans.read().unwrap()[loan_id].status
    }

    pub fn stored_breakdown(&self, owner_id: &str) -> Vec<InvestmentBreakdownRow> {
        let mut rows: Vec<_> = self
            .breakdown
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.loan_id.cmp(&b.loan_id));
        rows
    }

    pub fn seed_breakdown(&self, rows: Vec<InvestmentBreakdownRow>) {
        self.breakdown.write().unwrap().extend(rows);
    }

    /// Makes every following breakdown insert fail as the database would.
    pub fn fail_breakdown_inserts(&self) {
        self.fail_breakdown_insert.store(true, Ordering::SeqCst);
    }

    /// Records a stored loan row that fails to decode.
    pub fn reject_loan_row(&self, owner_id: &str, loan_id: &str, reason: &str) {
        let record = RejectedRecord {
            id: loan_id.to_string(),
            loan_id: loan_id.to_string(),
            reason: reason.to_string(),
        };
        self.rejected_loans
            .write()
            .unwrap()
            .push((owner_id.to_string(), record));
    }

    /// Records a stored installment row that fails to decode.
    pub fn reject_installment_row(&self, owner_id: &str, installment_id: &str, loan_id: &str, reason: &str) {
        let record = RejectedRecord {
            id: installment_id.to_string(),
            loan_id: loan_id.to_string(),
            reason: reason.to_string(),
        };
        self.rejected_installments
            .write()
            .unwrap()
            .push((owner_id.to_string(), record));
    }

    fn rejected_for(rows: &RwLock<Vec<(String, RejectedRecord)>>, owner_id: &str) -> Vec<RejectedRecord> {
        rows.read()
            .unwrap()
            .iter()
            .filter(|(owner, _)| owner == owner_id)
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Number of loan-status writes seen so far.
    pub fn status_writes(&self) -> usize {
        self.status_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoanRepositoryTrait for InMemoryStore {
    fn get_by_id(&self, loan_id: &str) -> Result<Option<Loan>> {
        Ok(self.loans.read().unwrap().get(loan_id).cloned())
    }

    fn list(&self, owner_id: &str, filter: &LoanFilter) -> Result<Vec<Loan>> {
        let mut loans: Vec<Loan> = self
            .loans
            .read()
            .unwrap()
            .values()
            .filter(|l| l.owner_id == owner_id)
            .filter(|l| filter.status.map_or(true, |s| l.status == s))
            .cloned()
            .collect();
        loans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(loans)
    }

    fn scan_for_valuation(&self, owner_id: &str) -> Result<ScannedRecords<Loan>> {
        Ok(ScannedRecords {
            records: LoanRepositoryTrait::list(self, owner_id, &LoanFilter::default())?,
            rejected: Self::rejected_for(&self.rejected_loans, owner_id),
        })
    }

    async fn create(&self, owner_id: &str, new_loan: NewLoan) -> Result<Loan> {
        let loan = Loan {
            id: self.next_id("loan"),
            owner_id: owner_id.to_string(),
            client_name: new_loan.client_name,
            loan_type: new_loan.loan_type,
            principal_amount: new_loan.principal_amount,
            start_date: new_loan.start_date,
            disbursement_date: new_loan.disbursement_date,
            frequency: new_loan.frequency,
            status: new_loan.status,
            total_rate_multiplier: new_loan.total_rate_multiplier,
            tenure: new_loan.tenure,
            daily_rate_per_lakh: new_loan.daily_rate_per_lakh,
            last_interest_generation_date: None,
            created_at: midnight(date(2024, 1, 1)),
        };
        self.insert_loan(loan.clone());
        Ok(loan)
    }

    async fn update(&self, loan: Loan) -> Result<Loan> {
        self.insert_loan(loan.clone());
        Ok(loan)
    }

    async fn update_status(&self, loan_id: &str, status: LoanStatus) -> Result<Loan> {
        self.status_writes.fetch_add(1, Ordering::SeqCst);
        let mut loans = self.loans.write().unwrap();
        let loan = loans
            .get_mut(loan_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(loan_id.to_string())))?;
        loan.status = status;
        Ok(loan.clone())
    }

    async fn delete(&self, loan_id: &str) -> Result<usize> {
        Ok(self.loans.write().unwrap().remove(loan_id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl InstallmentRepositoryTrait for InMemoryStore {
    fn find_by_id(&self, installment_id: &str) -> Result<Option<Installment>> {
        Ok(self.installments.read().unwrap().get(installment_id).cloned())
    }

    fn list(&self, owner_id: &str, loan_id: Option<&str>) -> Result<Vec<Installment>> {
        let mut installments: Vec<Installment> = self
            .installments
            .read()
            .unwrap()
            .values()
            .filter(|i| i.owner_id == owner_id)
            .filter(|i| loan_id.map_or(true, |id| i.loan_id == id))
            .cloned()
            .collect();
        installments.sort_by_key(|i| i.due_date);
        Ok(installments)
    }

    fn scan_for_valuation(&self, owner_id: &str) -> Result<ScannedRecords<Installment>> {
        Ok(ScannedRecords {
            records: InstallmentRepositoryTrait::list(self, owner_id, None)?,
            rejected: Self::rejected_for(&self.rejected_installments, owner_id),
        })
    }

    async fn create_many(
        &self,
        owner_id: &str,
        new_installments: Vec<NewInstallment>,
    ) -> Result<Vec<Installment>> {
        let created: Vec<Installment> = new_installments
            .into_iter()
            .map(|n| Installment {
                id: self.next_id("inst"),
                owner_id: owner_id.to_string(),
                loan_id: n.loan_id,
                client_name: n.client_name,
                due_date: n.due_date,
                expected_amount: n.expected_amount,
                paid_amount: n.paid_amount,
                penalty: n.penalty,
                kind: n.kind,
                status: n.status,
                paid_date: None,
                created_at: midnight(date(2024, 1, 1)),
            })
            .collect();
        for installment in &created {
            self.insert_installment(installment.clone());
        }
        Ok(created)
    }

    async fn upsert(&self, installment: Installment) -> Result<Installment> {
        self.insert_installment(installment.clone());
        Ok(installment)
    }

    async fn delete(&self, installment_id: &str) -> Result<usize> {
        Ok(self
            .installments
            .write()
            .unwrap()
            .remove(installment_id)
            .map_or(0, |_| 1))
    }
}

#[async_trait]
impl TransactionRepositoryTrait for InMemoryStore {
    fn find_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        Ok(self.transactions.read().unwrap().get(transaction_id).cloned())
    }

    fn list(&self, owner_id: &str, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .read()
            .unwrap()
            .values()
            .filter(|t| t.owner_id == owner_id)
            .filter(|t| filter.transaction_type.map_or(true, |ty| t.transaction_type == ty))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    async fn create(&self, owner_id: &str, new_transaction: NewTransaction) -> Result<Transaction> {
        let transaction = Transaction {
            id: self.next_id("txn"),
            owner_id: owner_id.to_string(),
            amount: new_transaction.amount,
            transaction_type: new_transaction.transaction_type,
            category: new_transaction.category,
            description: new_transaction.description,
            date: new_transaction
                .date
                .unwrap_or_else(|| midnight(date(2024, 1, 1))),
            related_entity_id: new_transaction.related_entity_id,
        };
        self.insert_transaction(transaction.clone());
        Ok(transaction)
    }

    async fn delete(&self, transaction_id: &str) -> Result<usize> {
        Ok(self
            .transactions
            .write()
            .unwrap()
            .remove(transaction_id)
            .map_or(0, |_| 1))
    }
}

#[async_trait]
impl BreakdownRepositoryTrait for InMemoryStore {
    fn list(&self, owner_id: &str) -> Result<Vec<InvestmentBreakdownRow>> {
        Ok(self.stored_breakdown(owner_id))
    }

    async fn delete_rows(&self, owner_id: &str) -> Result<usize> {
        let mut rows = self.breakdown.write().unwrap();
        let before = rows.len();
        rows.retain(|r| r.owner_id != owner_id);
        Ok(before - rows.len())
    }

    async fn insert_rows(&self, _owner_id: &str, rows: Vec<InvestmentBreakdownRow>) -> Result<usize> {
        if self.fail_breakdown_insert.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "disk I/O error".to_string(),
            )));
        }
        let count = rows.len();
        self.breakdown.write().unwrap().extend(rows);
        Ok(count)
    }
}

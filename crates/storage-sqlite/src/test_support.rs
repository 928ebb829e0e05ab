//! Temp-file database fixtures for the repository tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tempfile::TempDir;

use crate::db::{create_pool, init, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::installments::InstallmentRepository;
use crate::loans::LoanRepository;
use lendbook_core::installments::{InstallmentKind, InstallmentStatus, NewInstallment};
use lendbook_core::loans::{LoanStatus, LoanType, NewLoan, RepaymentFrequency};
use lendbook_core::Money;

pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    // Dropping the directory removes the database file.
    _dir: TempDir,
}

impl TestDb {
    pub fn loans(&self) -> LoanRepository {
        LoanRepository::new(Arc::clone(&self.pool), self.writer.clone())
    }

    pub fn installments(&self) -> InstallmentRepository {
        InstallmentRepository::new(Arc::clone(&self.pool), self.writer.clone())
    }
}

/// Must be called from inside a tokio runtime; the writer actor is a tokio task.
pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let configured = dir.path().join("lendbook.db").to_string_lossy().to_string();
    let db_path = init(&configured).expect("Failed to init database");
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer(&pool).expect("Failed to spawn writer");
    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_total_rate_loan(client: &str, principal: Decimal, multiplier: Decimal) -> NewLoan {
    NewLoan {
        client_name: client.to_string(),
        loan_type: LoanType::TotalRate,
        principal_amount: Money::new(principal),
        start_date: date(2024, 1, 1),
        disbursement_date: date(2024, 1, 1),
        frequency: RepaymentFrequency::Weekly,
        status: LoanStatus::Active,
        total_rate_multiplier: Some(multiplier),
        tenure: Some(10),
        daily_rate_per_lakh: None,
    }
}

pub fn new_daily_rate_loan(client: &str, principal: Decimal, rate: Decimal) -> NewLoan {
    NewLoan {
        loan_type: LoanType::DailyRate,
        frequency: RepaymentFrequency::EveryDays(45),
        total_rate_multiplier: None,
        tenure: None,
        daily_rate_per_lakh: Some(rate),
        ..new_total_rate_loan(client, principal, Decimal::ONE)
    }
}

pub fn new_installment(loan_id: &str, due_date: NaiveDate, expected: Decimal) -> NewInstallment {
    NewInstallment {
        loan_id: loan_id.to_string(),
        client_name: "Client".to_string(),
        due_date,
        expected_amount: Money::new(expected),
        paid_amount: Money::ZERO,
        penalty: Money::ZERO,
        kind: InstallmentKind::Regular,
        status: InstallmentStatus::Pending,
    }
}

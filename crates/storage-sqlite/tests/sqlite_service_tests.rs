//! Services wired to the SQLite repositories end to end.

use chrono::NaiveDate;
use diesel::RunQueryDsl;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use lendbook_core::installments::{
    InstallmentKind, InstallmentService, InstallmentServiceTrait, InstallmentStatus,
    InstallmentUpdate, NewInstallment,
};
use lendbook_core::loans::{
    LoanRepositoryTrait, LoanStatus, LoanType, NewLoan, RepaymentFrequency,
};
use lendbook_core::portfolio::breakdown::{BreakdownService, BreakdownServiceTrait};
use lendbook_core::portfolio::summary::{SummaryService, SummaryServiceTrait};
use lendbook_core::transactions::{NewTransaction, TransactionRepositoryTrait, TransactionType};
use lendbook_core::Money;
use lendbook_storage_sqlite::{
    create_pool, get_connection, init, run_migrations, spawn_writer, BreakdownRepository, DbPool,
    InstallmentRepository, LoanRepository, TransactionRepository,
};

struct Harness {
    loans: Arc<LoanRepository>,
    installments: Arc<InstallmentRepository>,
    transactions: Arc<TransactionRepository>,
    breakdown: Arc<BreakdownRepository>,
    pool: Arc<DbPool>,
    _dir: TempDir,
}

fn harness() -> Harness {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let configured = dir.path().join("lendbook.db").to_string_lossy().to_string();
    let db_path = init(&configured).expect("Failed to init database");
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer(&pool).expect("Failed to spawn writer");

    Harness {
        loans: Arc::new(LoanRepository::new(pool.clone(), writer.clone())),
        installments: Arc::new(InstallmentRepository::new(pool.clone(), writer.clone())),
        transactions: Arc::new(TransactionRepository::new(pool.clone(), writer.clone())),
        breakdown: Arc::new(BreakdownRepository::new(pool.clone(), writer)),
        pool,
        _dir: dir,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn total_rate_loan(client: &str) -> NewLoan {
    NewLoan {
        client_name: client.to_string(),
        loan_type: LoanType::TotalRate,
        principal_amount: Money::new(dec!(100000)),
        start_date: date(2024, 1, 1),
        disbursement_date: date(2024, 1, 1),
        frequency: RepaymentFrequency::Weekly,
        status: LoanStatus::Active,
        total_rate_multiplier: Some(dec!(1.2)),
        tenure: Some(10),
        daily_rate_per_lakh: None,
    }
}

fn scheduled(loan_id: &str, due_date: NaiveDate) -> NewInstallment {
    NewInstallment {
        loan_id: loan_id.to_string(),
        client_name: "Ravi".to_string(),
        due_date,
        expected_amount: Money::new(dec!(12000)),
        paid_amount: Money::ZERO,
        penalty: Money::ZERO,
        kind: InstallmentKind::Regular,
        status: InstallmentStatus::Pending,
    }
}

/// Writes a raw column value behind the repositories' back.
fn corrupt(h: &Harness, sql: &str) {
    let mut conn = get_connection(&h.pool).unwrap();
    diesel::sql_query(sql).execute(&mut *conn).unwrap();
}

fn payment(amount: Money) -> InstallmentUpdate {
    InstallmentUpdate {
        paid_amount: Some(amount),
        status: Some(InstallmentStatus::Paid),
        paid_date: Some(Some(date(2024, 1, 8))),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_paying_every_installment_completes_loan_and_revert_reactivates() {
    let h = harness();
    let service = InstallmentService::new(h.installments.clone(), h.loans.clone());
    let loan = h.loans.create("owner-1", total_rate_loan("Ravi")).await.unwrap();
    let created = service
        .create_installments(
            "owner-1",
            vec![
                scheduled(&loan.id, date(2024, 1, 8)),
                scheduled(&loan.id, date(2024, 1, 15)),
            ],
        )
        .await
        .unwrap();

    service
        .apply_installment_update("owner-1", &created[0].id, payment(Money::new(dec!(12000))))
        .await
        .unwrap();
    let status = h.loans.get_by_id(&loan.id).unwrap().unwrap().status;
    assert_eq!(status, LoanStatus::Active);

    service
        .apply_installment_update("owner-1", &created[1].id, payment(Money::new(dec!(12000))))
        .await
        .unwrap();
    let status = h.loans.get_by_id(&loan.id).unwrap().unwrap().status;
    assert_eq!(status, LoanStatus::Completed);

    let revert = InstallmentUpdate {
        paid_amount: Some(Money::ZERO),
        status: Some(InstallmentStatus::Pending),
        paid_date: Some(None),
        ..Default::default()
    };
    let reverted = service
        .apply_installment_update("owner-1", &created[1].id, revert)
        .await
        .unwrap();
    assert_eq!(reverted.paid_date, None);
    let status = h.loans.get_by_id(&loan.id).unwrap().unwrap().status;
    assert_eq!(status, LoanStatus::Active);
}

#[tokio::test]
async fn test_resync_writes_total_rate_split() {
    let h = harness();
    let loan = h.loans.create("owner-1", total_rate_loan("Ravi")).await.unwrap();
    let service = InstallmentService::new(h.installments.clone(), h.loans.clone());
    service
        .create_installments("owner-1", vec![scheduled(&loan.id, date(2024, 1, 8))])
        .await
        .unwrap();

    let breakdown = BreakdownService::new(h.loans.clone(), h.installments.clone(), h.breakdown.clone());
    let report = breakdown
        .resync_breakdown("owner-1", &CancellationToken::new())
        .await
        .unwrap();
    assert!(report.is_complete());
    assert_eq!(report.written, 1);

    let rows = breakdown.get_breakdown("owner-1").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].person, "Ravi");
    assert_eq!(rows[0].cycle, "WEEKLY");
    assert_eq!(rows[0].interest_percentage, dec!(20));
    assert_eq!(rows[0].market_principal, Money::new(dec!(10000)));
    assert_eq!(rows[0].market_interest, Money::new(dec!(2000)));
    assert_eq!(rows[0].total_market_value, Money::new(dec!(12000)));
}

#[tokio::test]
async fn test_summary_reads_ledger_from_sqlite() {
    let h = harness();
    for (kind, value) in [
        (TransactionType::Credit, dec!(10000)),
        (TransactionType::Debit, dec!(3000)),
        (TransactionType::Debit, dec!(8000)),
    ] {
        h.transactions
            .create(
                "owner-1",
                NewTransaction {
                    amount: Money::new(value),
                    transaction_type: kind,
                    category: "Capital".to_string(),
                    description: String::new(),
                    date: Some(date(2024, 2, 1).and_hms_opt(9, 0, 0).unwrap()),
                    related_entity_id: None,
                },
            )
            .await
            .unwrap();
    }

    let summary = SummaryService::new(h.loans.clone(), h.installments.clone(), h.transactions.clone())
        .get_financial_summary_as_of("owner-1", date(2024, 2, 2))
        .unwrap();
    assert_eq!(summary.total_inflow, Money::new(dec!(10000)));
    assert_eq!(summary.total_outflow, Money::new(dec!(11000)));
    assert_eq!(summary.cash_in_hand, Money::ZERO);
    assert_eq!(summary.total_loans, 0);
}

#[tokio::test]
async fn test_malformed_stored_multiplier_is_skipped_by_resync_and_summary() {
    let h = harness();
    let mut ids = Vec::new();
    for client in ["Ravi", "Meena", "Arjun"] {
        ids.push(h.loans.create("owner-1", total_rate_loan(client)).await.unwrap().id);
    }
    corrupt(
        &h,
        &format!(
            "UPDATE loans SET total_rate_multiplier = 'invalid' WHERE id = '{}'",
            ids[1]
        ),
    );

    let breakdown = BreakdownService::new(h.loans.clone(), h.installments.clone(), h.breakdown.clone());
    let report = breakdown
        .resync_breakdown("owner-1", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.loan_count, 3);
    assert_eq!(report.written, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].loan_id, ids[1]);
    assert_eq!(breakdown.get_breakdown("owner-1").unwrap().len(), 2);

    let summary = SummaryService::new(h.loans.clone(), h.installments.clone(), h.transactions.clone())
        .get_financial_summary_as_of("owner-1", date(2024, 2, 2))
        .unwrap();
    assert_eq!(summary.total_loans, 3);
    assert_eq!(summary.skipped_loans.len(), 1);
    assert_eq!(summary.skipped_loans[0].loan_id, ids[1]);
}

#[tokio::test]
async fn test_malformed_stored_installment_skips_only_its_loan() {
    let h = harness();
    let service = InstallmentService::new(h.installments.clone(), h.loans.clone());
    let good = h.loans.create("owner-1", total_rate_loan("Ravi")).await.unwrap();
    let bad = h.loans.create("owner-1", total_rate_loan("Meena")).await.unwrap();
    service
        .create_installments("owner-1", vec![scheduled(&good.id, date(2024, 1, 8))])
        .await
        .unwrap();
    let broken = service
        .create_installments("owner-1", vec![scheduled(&bad.id, date(2024, 1, 8))])
        .await
        .unwrap();
    corrupt(
        &h,
        &format!(
            "UPDATE installments SET expected_amount = 'twelve' WHERE id = '{}'",
            broken[0].id
        ),
    );

    let report = BreakdownService::new(h.loans.clone(), h.installments.clone(), h.breakdown.clone())
        .resync_breakdown("owner-1", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.written, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].loan_id, bad.id);
}

#[tokio::test]
async fn test_custom_frequency_round_trips() {
    let h = harness();
    let mut new_loan = total_rate_loan("Ravi");
    new_loan.frequency = RepaymentFrequency::Custom;
    let loan = h.loans.create("owner-1", new_loan).await.unwrap();

    let stored = h.loans.get_by_id(&loan.id).unwrap().unwrap();
    assert_eq!(stored.frequency, RepaymentFrequency::Custom);
    assert_eq!(stored.frequency.cycle_label(), "CUSTOM");
}

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use log::warn;
use std::sync::Arc;
use uuid::Uuid;

use super::model::LoanDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::loans;
use crate::schema::loans::dsl::*;
use lendbook_core::errors::{DatabaseError, Error, Result};
use lendbook_core::loans::{Loan, LoanFilter, LoanRepositoryTrait, LoanStatus, NewLoan};
use lendbook_core::utils::{RejectedRecord, ScannedRecords};

pub struct LoanRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl LoanRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        LoanRepository { pool, writer }
    }
}

fn load_loan(conn: &mut SqliteConnection, loan_id: &str) -> Result<Loan> {
    let loan_db = loans
        .find(loan_id)
        .select(LoanDB::as_select())
        .first::<LoanDB>(conn)
        .map_err(StorageError::from)?;
    Loan::try_from(loan_db)
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    fn get_by_id(&self, loan_id: &str) -> Result<Option<Loan>> {
        let mut conn = get_connection(&self.pool)?;
        let loan_db = loans
            .find(loan_id)
            .select(LoanDB::as_select())
            .first::<LoanDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        loan_db.map(Loan::try_from).transpose()
    }

    fn list(&self, input_owner_id: &str, filter: &LoanFilter) -> Result<Vec<Loan>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = loans
            .filter(owner_id.eq(input_owner_id))
            .order((created_at.desc(), id.asc()))
            .select(LoanDB::as_select())
            .into_boxed();
        if let Some(status_filter) = filter.status {
            query = query.filter(status.eq(status_filter.as_str()));
        }

        let loans_db = query.load::<LoanDB>(&mut conn).map_err(StorageError::from)?;
        loans_db.into_iter().map(Loan::try_from).collect()
    }

    fn scan_for_valuation(&self, input_owner_id: &str) -> Result<ScannedRecords<Loan>> {
        let mut conn = get_connection(&self.pool)?;
        let loans_db = loans
            .filter(owner_id.eq(input_owner_id))
            .order((created_at.desc(), id.asc()))
            .select(LoanDB::as_select())
            .load::<LoanDB>(&mut conn)
            .map_err(StorageError::from)?;

        let mut scanned = ScannedRecords::complete(Vec::with_capacity(loans_db.len()));
        for row in loans_db {
            let row_id = row.id.clone();
            match Loan::try_from(row) {
                Ok(loan) => scanned.records.push(loan),
                Err(err) => {
                    warn!("Unreadable loan row {}: {}", row_id, err);
                    scanned.rejected.push(RejectedRecord {
                        id: row_id.clone(),
                        loan_id: row_id,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(scanned)
    }

    async fn create(&self, input_owner_id: &str, new_loan: NewLoan) -> Result<Loan> {
        let loan_db = LoanDB::from_new(
            Uuid::new_v4().to_string(),
            input_owner_id,
            new_loan,
            Utc::now().naive_utc(),
        );
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Loan> {
                diesel::insert_into(loans::table)
                    .values(&loan_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Loan::try_from(loan_db)
            })
            .await
    }

    async fn update(&self, loan: Loan) -> Result<Loan> {
        let loan_db = LoanDB::from(loan);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Loan> {
                let affected = diesel::update(loans.find(loan_db.id.as_str()))
                    .set(&loan_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(loan_db.id)));
                }
                load_loan(conn, &loan_db.id)
            })
            .await
    }

    async fn update_status(&self, loan_id: &str, new_status: LoanStatus) -> Result<Loan> {
        let loan_id = loan_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Loan> {
                let affected = diesel::update(loans.find(loan_id.as_str()))
                    .set(status.eq(new_status.as_str()))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(loan_id)));
                }
                load_loan(conn, &loan_id)
            })
            .await
    }

    async fn delete(&self, loan_id: &str) -> Result<usize> {
        let loan_id = loan_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(loans.find(loan_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, new_daily_rate_loan, new_total_rate_loan, setup_db};
    use lendbook_core::loans::{LoanType, PricingTerms, RepaymentFrequency};
    use lendbook_core::Money;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_and_read_back_loan() {
        let db = setup_db();
        let repo = db.loans();

        let created = repo
            .create("owner-1", new_total_rate_loan("Ravi", dec!(100000), dec!(1.2)))
            .await
            .unwrap();

        let loaded = repo.get_by_id(&created.id).unwrap().expect("loan stored");
        assert_eq!(loaded, created);
        assert_eq!(loaded.loan_type, LoanType::TotalRate);
        assert_eq!(loaded.principal_amount, Money::new(dec!(100000)));
        assert_eq!(
            loaded.pricing_terms().unwrap(),
            PricingTerms::TotalRate {
                multiplier: dec!(1.2)
            }
        );
    }

    #[tokio::test]
    async fn test_numeric_frequency_survives_storage() {
        let db = setup_db();
        let repo = db.loans();

        let created = repo
            .create("owner-1", new_daily_rate_loan("Meena", dec!(50000), dec!(100)))
            .await
            .unwrap();

        let loaded = repo.get_by_id(&created.id).unwrap().unwrap();
        assert_eq!(loaded.frequency, RepaymentFrequency::EveryDays(45));
        assert_eq!(loaded.daily_rate_per_lakh, Some(dec!(100)));
    }

    #[tokio::test]
    async fn test_missing_loan_is_none() {
        let db = setup_db();
        assert!(db.loans().get_by_id("nope").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped_and_filters_status() {
        let db = setup_db();
        let repo = db.loans();

        let first = repo
            .create("owner-1", new_total_rate_loan("A", dec!(1000), dec!(1.2)))
            .await
            .unwrap();
        repo.create("owner-1", new_total_rate_loan("B", dec!(2000), dec!(1.2)))
            .await
            .unwrap();
        repo.create("owner-2", new_total_rate_loan("C", dec!(3000), dec!(1.2)))
            .await
            .unwrap();
        repo.update_status(&first.id, LoanStatus::Closed).await.unwrap();

        let all = repo.list("owner-1", &LoanFilter::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|l| l.owner_id == "owner-1"));

        let closed = repo
            .list(
                "owner-1",
                &LoanFilter {
                    status: Some(LoanStatus::Closed),
                },
            )
            .unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].id, first.id);
    }

    #[tokio::test]
    async fn test_update_clears_optional_date() {
        let db = setup_db();
        let repo = db.loans();

        let mut loan = repo
            .create("owner-1", new_daily_rate_loan("Meena", dec!(50000), dec!(100)))
            .await
            .unwrap();
        loan.last_interest_generation_date = Some(date(2024, 2, 15));
        let updated = repo.update(loan).await.unwrap();
        assert_eq!(updated.last_interest_generation_date, Some(date(2024, 2, 15)));

        let mut cleared = updated.clone();
        cleared.last_interest_generation_date = None;
        let reloaded = repo.update(cleared).await.unwrap();
        assert_eq!(reloaded.last_interest_generation_date, None);
    }

    #[tokio::test]
    async fn test_update_status_of_missing_loan_is_not_found() {
        let db = setup_db();
        let result = db.loans().update_status("ghost", LoanStatus::Completed).await;
        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_principal_is_reported() {
        let db = setup_db();
        let repo = db.loans();
        let loan = repo
            .create("owner-1", new_total_rate_loan("Ravi", dec!(100000), dec!(1.2)))
            .await
            .unwrap();

        let mut conn = get_connection(&db.pool).unwrap();
        diesel::update(loans.find(loan.id.as_str()))
            .set(principal_amount.eq("lots"))
            .execute(&mut conn)
            .unwrap();

        assert!(matches!(
            repo.get_by_id(&loan.id),
            Err(Error::Database(DatabaseError::CorruptRecord(_)))
        ));
    }
}

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use log::warn;
use std::sync::Arc;
use uuid::Uuid;

use super::model::InstallmentDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::installments;
use crate::schema::installments::dsl::*;
use lendbook_core::errors::Result;
use lendbook_core::installments::{Installment, InstallmentRepositoryTrait, NewInstallment};
use lendbook_core::utils::{RejectedRecord, ScannedRecords};

pub struct InstallmentRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl InstallmentRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        InstallmentRepository { pool, writer }
    }
}

#[async_trait]
impl InstallmentRepositoryTrait for InstallmentRepository {
    fn find_by_id(&self, installment_id: &str) -> Result<Option<Installment>> {
        let mut conn = get_connection(&self.pool)?;
        let installment_db = installments
            .find(installment_id)
            .select(InstallmentDB::as_select())
            .first::<InstallmentDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        installment_db.map(Installment::try_from).transpose()
    }

    fn list(&self, input_owner_id: &str, input_loan_id: Option<&str>) -> Result<Vec<Installment>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = installments
            .filter(owner_id.eq(input_owner_id))
            .order((due_date.asc(), id.asc()))
            .select(InstallmentDB::as_select())
            .into_boxed();
        if let Some(loan_id_filter) = input_loan_id {
            query = query.filter(loan_id.eq(loan_id_filter));
        }

        let installments_db = query
            .load::<InstallmentDB>(&mut conn)
            .map_err(StorageError::from)?;
        installments_db
            .into_iter()
            .map(Installment::try_from)
            .collect()
    }

    fn scan_for_valuation(&self, input_owner_id: &str) -> Result<ScannedRecords<Installment>> {
        let mut conn = get_connection(&self.pool)?;
        let installments_db = installments
            .filter(owner_id.eq(input_owner_id))
            .order((due_date.asc(), id.asc()))
            .select(InstallmentDB::as_select())
            .load::<InstallmentDB>(&mut conn)
            .map_err(StorageError::from)?;

        let mut scanned = ScannedRecords::complete(Vec::with_capacity(installments_db.len()));
        for row in installments_db {
            let (row_id, row_loan_id) = (row.id.clone(), row.loan_id.clone());
            match Installment::try_from(row) {
                Ok(installment) => scanned.records.push(installment),
                Err(err) => {
                    warn!(
                        "Unreadable installment row {} of loan {}: {}",
                        row_id, row_loan_id, err
                    );
                    scanned.rejected.push(RejectedRecord {
                        id: row_id,
                        loan_id: row_loan_id,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(scanned)
    }

    async fn create_many(
        &self,
        input_owner_id: &str,
        new_installments: Vec<NewInstallment>,
    ) -> Result<Vec<Installment>> {
        let now = Utc::now().naive_utc();
        let rows: Vec<InstallmentDB> = new_installments
            .into_iter()
            .map(|n| InstallmentDB::from_new(Uuid::new_v4().to_string(), input_owner_id, n, now))
            .collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<Installment>> {
                for row in &rows {
                    diesel::insert_into(installments::table)
                        .values(row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                rows.into_iter().map(Installment::try_from).collect()
            })
            .await
    }

    async fn upsert(&self, installment: Installment) -> Result<Installment> {
        let installment_db = InstallmentDB::from(installment);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Installment> {
                diesel::insert_into(installments::table)
                    .values(&installment_db)
                    .on_conflict(id)
                    .do_update()
                    .set(&installment_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Installment::try_from(installment_db)
            })
            .await
    }

    async fn delete(&self, installment_id: &str) -> Result<usize> {
        let installment_id = installment_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(installments.find(installment_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

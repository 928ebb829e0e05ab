use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::InvestmentBreakdownDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::investment_breakdown;
use crate::schema::investment_breakdown::dsl::*;
use lendbook_core::constants::BREAKDOWN_INSERT_CHUNK_SIZE;
use lendbook_core::errors::Result;
use lendbook_core::portfolio::breakdown::{BreakdownRepositoryTrait, InvestmentBreakdownRow};

pub struct BreakdownRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl BreakdownRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn delete_owner_rows(conn: &mut SqliteConnection, input_owner_id: &str) -> Result<usize> {
    Ok(diesel::delete(investment_breakdown.filter(owner_id.eq(input_owner_id)))
        .execute(conn)
        .map_err(StorageError::from)?)
}

fn insert_chunked(conn: &mut SqliteConnection, rows: &[InvestmentBreakdownDB]) -> Result<usize> {
    let mut written = 0;
    for chunk in rows.chunks(BREAKDOWN_INSERT_CHUNK_SIZE) {
        written += diesel::insert_into(investment_breakdown::table)
            .values(chunk)
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    Ok(written)
}

fn to_db_rows(input_owner_id: &str, rows: Vec<InvestmentBreakdownRow>) -> Vec<InvestmentBreakdownDB> {
    rows.into_iter()
        .filter(|row| row.owner_id == input_owner_id)
        .map(InvestmentBreakdownDB::from)
        .collect()
}

#[async_trait]
impl BreakdownRepositoryTrait for BreakdownRepository {
    fn list(&self, input_owner_id: &str) -> Result<Vec<InvestmentBreakdownRow>> {
        let mut conn = get_connection(&self.pool)?;
        let rows_db = investment_breakdown
            .filter(owner_id.eq(input_owner_id))
            .order((start_date.desc(), loan_id.asc()))
            .select(InvestmentBreakdownDB::as_select())
            .load::<InvestmentBreakdownDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows_db
            .into_iter()
            .map(InvestmentBreakdownRow::try_from)
            .collect()
    }

    async fn delete_rows(&self, input_owner_id: &str) -> Result<usize> {
        let input_owner_id = input_owner_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| delete_owner_rows(conn, &input_owner_id))
            .await
    }

    async fn insert_rows(&self, input_owner_id: &str, rows: Vec<InvestmentBreakdownRow>) -> Result<usize> {
        let rows_db = to_db_rows(input_owner_id, rows);
        self.writer
            .exec(move |conn: &mut SqliteConnection| insert_chunked(conn, &rows_db))
            .await
    }

    /// Delete and insert run in one writer transaction, so a failed insert rolls
    /// the delete back and the previous projection stays in place.
    async fn replace_breakdown_rows(
        &self,
        input_owner_id: &str,
        rows: Vec<InvestmentBreakdownRow>,
    ) -> Result<usize> {
        let rows_db = to_db_rows(input_owner_id, rows);
        let input_owner_id = input_owner_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let deleted = delete_owner_rows(conn, &input_owner_id)?;
                let written = insert_chunked(conn, &rows_db)?;
                debug!(
                    "Replaced breakdown for owner {}: {} rows removed, {} written",
                    input_owner_id, deleted, written
                );
                Ok(written)
            })
            .await
    }
}

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::TransactionDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::transactions;
use crate::schema::transactions::dsl::*;
use lendbook_core::errors::Result;
use lendbook_core::transactions::{
    NewTransaction, Transaction, TransactionFilter, TransactionRepositoryTrait,
};

pub struct TransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        TransactionRepository { pool, writer }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn find_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let transaction_db = transactions
            .find(transaction_id)
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        transaction_db.map(Transaction::try_from).transpose()
    }

    fn list(&self, input_owner_id: &str, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions
            .filter(owner_id.eq(input_owner_id))
            .order((transaction_date.desc(), id.asc()))
            .select(TransactionDB::as_select())
            .into_boxed();
        if let Some(type_filter) = filter.transaction_type {
            query = query.filter(transaction_type.eq(type_filter.as_str()));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let transactions_db = query
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;
        transactions_db
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    async fn create(&self, input_owner_id: &str, new_transaction: NewTransaction) -> Result<Transaction> {
        let transaction_db = TransactionDB::from_new(
            Uuid::new_v4().to_string(),
            input_owner_id,
            new_transaction,
            Utc::now().naive_utc(),
        );
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                diesel::insert_into(transactions::table)
                    .values(&transaction_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Transaction::try_from(transaction_db)
            })
            .await
    }

    async fn delete(&self, transaction_id: &str) -> Result<usize> {
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(transactions.find(transaction_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

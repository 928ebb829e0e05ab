use async_trait::async_trait;
use std::sync::Arc;

use super::transactions_model::{NewTransaction, Transaction, TransactionFilter};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::constants::DEFAULT_TRANSACTION_LIST_LIMIT;
use crate::errors::{Error, Result};
use crate::utils::time_utils::utc_now_naive;

const ENTITY: &str = "Transaction";

pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
}

impl TransactionService {
    pub fn new(repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn load_owned(&self, owner_id: &str, transaction_id: &str) -> Result<Transaction> {
        match self.repository.find_by_id(transaction_id)? {
            Some(txn) if txn.owner_id == owner_id => Ok(txn),
            Some(_) => Err(Error::forbidden(ENTITY, transaction_id)),
            None => Err(Error::not_found(ENTITY, transaction_id)),
        }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transaction(&self, owner_id: &str, transaction_id: &str) -> Result<Transaction> {
        self.load_owned(owner_id, transaction_id)
    }

    fn list_transactions(&self, owner_id: &str, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let filter = TransactionFilter {
            transaction_type: filter.transaction_type,
            limit: Some(filter.limit.unwrap_or(DEFAULT_TRANSACTION_LIST_LIMIT)),
        };
        self.repository.list(owner_id, &filter)
    }

    async fn create_transaction(
        &self,
        owner_id: &str,
        mut new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        new_transaction.validate()?;
        if new_transaction.date.is_none() {
            new_transaction.date = Some(utc_now_naive());
        }
        self.repository.create(owner_id, new_transaction).await
    }

    async fn delete_transaction(&self, owner_id: &str, transaction_id: &str) -> Result<()> {
        self.load_owned(owner_id, transaction_id)?;
        self.repository.delete(transaction_id).await?;
        Ok(())
    }
}

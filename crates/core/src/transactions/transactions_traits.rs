use async_trait::async_trait;

use crate::errors::Result;
use crate::transactions::transactions_model::{NewTransaction, Transaction, TransactionFilter};

/// Trait for ledger repository operations
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    fn find_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>>;

    /// Lists an owner's transactions, newest first. `limit: None` returns every row.
    fn list(&self, owner_id: &str, filter: &TransactionFilter) -> Result<Vec<Transaction>>;

    /// Stores a validated transaction whose date has already been resolved.
    async fn create(&self, owner_id: &str, new_transaction: NewTransaction) -> Result<Transaction>;

    async fn delete(&self, transaction_id: &str) -> Result<usize>;
}

/// Trait for ledger service operations
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transaction(&self, owner_id: &str, transaction_id: &str) -> Result<Transaction>;
    fn list_transactions(&self, owner_id: &str, filter: &TransactionFilter) -> Result<Vec<Transaction>>;
    async fn create_transaction(
        &self,
        owner_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, owner_id: &str, transaction_id: &str) -> Result<()>;
}

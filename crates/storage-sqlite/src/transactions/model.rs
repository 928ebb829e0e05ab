//! Database models for ledger transactions.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::{parse_enum_column, parse_money_column};
use lendbook_core::errors::Result;
use lendbook_core::transactions::{NewTransaction, Transaction};

const TABLE: &str = "transactions";

#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TransactionDB {
    pub id: String,
    pub owner_id: String,
    pub amount: String,
    pub transaction_type: String,
    pub category: String,
    pub description: String,
    pub transaction_date: NaiveDateTime,
    pub related_entity_id: Option<String>,
}

impl TransactionDB {
    /// `new_transaction.date` must already be resolved; `fallback_date` is used otherwise.
    pub fn from_new(
        id: String,
        owner_id: &str,
        new_transaction: NewTransaction,
        fallback_date: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            owner_id: owner_id.to_string(),
            amount: new_transaction.amount.to_string(),
            transaction_type: new_transaction.transaction_type.as_str().to_string(),
            category: new_transaction.category,
            description: new_transaction.description,
            transaction_date: new_transaction.date.unwrap_or(fallback_date),
            related_entity_id: new_transaction.related_entity_id,
        }
    }
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = lendbook_core::Error;

    fn try_from(db: TransactionDB) -> Result<Self> {
        let id = db.id.as_str();
        Ok(Transaction {
            amount: parse_money_column(&db.amount, TABLE, id, "amount")?,
            transaction_type: parse_enum_column(&db.transaction_type, TABLE, id, "transaction_type")?,
            owner_id: db.owner_id,
            category: db.category,
            description: db.description,
            date: db.transaction_date,
            related_entity_id: db.related_entity_id,
            id: db.id,
        })
    }
}

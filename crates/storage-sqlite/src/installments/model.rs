//! Database models for installments.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::loans::LoanDB;
use crate::utils::{parse_enum_column, parse_money_column};
use lendbook_core::errors::Result;
use lendbook_core::installments::{Installment, NewInstallment};

const TABLE: &str = "installments";

/// Database model for installments
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Associations,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(LoanDB, foreign_key = loan_id))]
#[diesel(table_name = crate::schema::installments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentDB {
    pub id: String,
    pub owner_id: String,
    pub loan_id: String,
    pub client_name: String,
    pub due_date: NaiveDate,
    pub expected_amount: String,
    pub paid_amount: String,
    pub penalty: String,
    pub installment_type: String,
    pub status: String,
    pub paid_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl InstallmentDB {
    pub fn from_new(
        id: String,
        owner_id: &str,
        new_installment: NewInstallment,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            owner_id: owner_id.to_string(),
            loan_id: new_installment.loan_id,
            client_name: new_installment.client_name,
            due_date: new_installment.due_date,
            expected_amount: new_installment.expected_amount.to_string(),
            paid_amount: new_installment.paid_amount.to_string(),
            penalty: new_installment.penalty.to_string(),
            installment_type: new_installment.kind.as_str().to_string(),
            status: new_installment.status.as_str().to_string(),
            paid_date: None,
            created_at,
        }
    }
}

impl From<Installment> for InstallmentDB {
    fn from(domain: Installment) -> Self {
        Self {
            id: domain.id,
            owner_id: domain.owner_id,
            loan_id: domain.loan_id,
            client_name: domain.client_name,
            due_date: domain.due_date,
            expected_amount: domain.expected_amount.to_string(),
            paid_amount: domain.paid_amount.to_string(),
            penalty: domain.penalty.to_string(),
            installment_type: domain.kind.as_str().to_string(),
            status: domain.status.as_str().to_string(),
            paid_date: domain.paid_date,
            created_at: domain.created_at,
        }
    }
}

impl TryFrom<InstallmentDB> for Installment {
    type Error = lendbook_core::Error;

    fn try_from(db: InstallmentDB) -> Result<Self> {
        let id = db.id.as_str();
        Ok(Installment {
            expected_amount: parse_money_column(&db.expected_amount, TABLE, id, "expected_amount")?,
            paid_amount: parse_money_column(&db.paid_amount, TABLE, id, "paid_amount")?,
            penalty: parse_money_column(&db.penalty, TABLE, id, "penalty")?,
            kind: parse_enum_column(&db.installment_type, TABLE, id, "installment_type")?,
            status: parse_enum_column(&db.status, TABLE, id, "status")?,
            owner_id: db.owner_id,
            loan_id: db.loan_id,
            client_name: db.client_name,
            due_date: db.due_date,
            paid_date: db.paid_date,
            created_at: db.created_at,
            id: db.id,
        })
    }
}

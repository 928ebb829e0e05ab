//! Database models for loans.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::{
    parse_enum_column, parse_money_column, parse_optional_decimal_column,
};
use lendbook_core::errors::Result;
use lendbook_core::loans::{Loan, NewLoan};

const TABLE: &str = "loans";

/// Database model for loans
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::loans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct LoanDB {
    pub id: String,
    pub owner_id: String,
    pub client_name: String,
    pub loan_type: String,
    pub principal_amount: String,
    pub start_date: NaiveDate,
    pub disbursement_date: NaiveDate,
    pub frequency: String,
    pub status: String,
    pub total_rate_multiplier: Option<String>,
    pub tenure: Option<i32>,
    pub daily_rate_per_lakh: Option<String>,
    pub last_interest_generation_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl LoanDB {
    pub fn from_new(id: String, owner_id: &str, new_loan: NewLoan, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            owner_id: owner_id.to_string(),
            client_name: new_loan.client_name,
            loan_type: new_loan.loan_type.as_str().to_string(),
            principal_amount: new_loan.principal_amount.to_string(),
            start_date: new_loan.start_date,
            disbursement_date: new_loan.disbursement_date,
            frequency: new_loan.frequency.to_string(),
            status: new_loan.status.as_str().to_string(),
            total_rate_multiplier: new_loan.total_rate_multiplier.map(|m| m.to_string()),
            tenure: new_loan.tenure,
            daily_rate_per_lakh: new_loan.daily_rate_per_lakh.map(|r| r.to_string()),
            last_interest_generation_date: None,
            created_at,
        }
    }
}

impl From<Loan> for LoanDB {
    fn from(domain: Loan) -> Self {
        Self {
            id: domain.id,
            owner_id: domain.owner_id,
            client_name: domain.client_name,
            loan_type: domain.loan_type.as_str().to_string(),
            principal_amount: domain.principal_amount.to_string(),
            start_date: domain.start_date,
            disbursement_date: domain.disbursement_date,
            frequency: domain.frequency.to_string(),
            status: domain.status.as_str().to_string(),
            total_rate_multiplier: domain.total_rate_multiplier.map(|m| m.to_string()),
            tenure: domain.tenure,
            daily_rate_per_lakh: domain.daily_rate_per_lakh.map(|r| r.to_string()),
            last_interest_generation_date: domain.last_interest_generation_date,
            created_at: domain.created_at,
        }
    }
}

impl TryFrom<LoanDB> for Loan {
    type Error = lendbook_core::Error;

    fn try_from(db: LoanDB) -> Result<Self> {
        let id = db.id.as_str();
        Ok(Loan {
            loan_type: parse_enum_column(&db.loan_type, TABLE, id, "loan_type")?,
            principal_amount: parse_money_column(&db.principal_amount, TABLE, id, "principal_amount")?,
            frequency: parse_enum_column(&db.frequency, TABLE, id, "frequency")?,
            status: parse_enum_column(&db.status, TABLE, id, "status")?,
            total_rate_multiplier: parse_optional_decimal_column(
                db.total_rate_multiplier.as_deref(),
                TABLE,
                id,
                "total_rate_multiplier",
            )?,
            daily_rate_per_lakh: parse_optional_decimal_column(
                db.daily_rate_per_lakh.as_deref(),
                TABLE,
                id,
                "daily_rate_per_lakh",
            )?,
            owner_id: db.owner_id,
            client_name: db.client_name,
            start_date: db.start_date,
            disbursement_date: db.disbursement_date,
            tenure: db.tenure,
            last_interest_generation_date: db.last_interest_generation_date,
            created_at: db.created_at,
            id: db.id,
        })
    }
}

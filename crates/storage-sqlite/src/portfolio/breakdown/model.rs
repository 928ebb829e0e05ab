use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::{parse_decimal_column, parse_money_column};
use lendbook_core::errors::Result;
use lendbook_core::portfolio::breakdown::InvestmentBreakdownRow;

const TABLE: &str = "investment_breakdown";

/// Database model for one projection row. Amounts are stored as decimal text.
#[derive(Queryable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::investment_breakdown)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct InvestmentBreakdownDB {
    pub owner_id: String,
    pub loan_id: String,
    pub person: String,
    pub start_date: NaiveDate,
    pub cycle: String,
    pub capital: String,
    pub interest_percentage: String,
    pub received: String,
    pub market_principal: String,
    pub market_interest: String,
    pub total_market_value: String,
}

impl From<InvestmentBreakdownRow> for InvestmentBreakdownDB {
    fn from(row: InvestmentBreakdownRow) -> Self {
        Self {
            owner_id: row.owner_id,
            loan_id: row.loan_id,
            person: row.person,
            start_date: row.start_date,
            cycle: row.cycle,
            capital: row.capital.to_string(),
            interest_percentage: row.interest_percentage.to_string(),
            received: row.received.to_string(),
            market_principal: row.market_principal.to_string(),
            market_interest: row.market_interest.to_string(),
            total_market_value: row.total_market_value.to_string(),
        }
    }
}

impl TryFrom<InvestmentBreakdownDB> for InvestmentBreakdownRow {
    type Error = lendbook_core::Error;

    fn try_from(db: InvestmentBreakdownDB) -> Result<Self> {
        let id = db.loan_id.as_str();
        Ok(InvestmentBreakdownRow {
            capital: parse_money_column(&db.capital, TABLE, id, "capital")?,
            interest_percentage: parse_decimal_column(
                &db.interest_percentage,
                TABLE,
                id,
                "interest_percentage",
            )?,
            received: parse_money_column(&db.received, TABLE, id, "received")?,
            market_principal: parse_money_column(&db.market_principal, TABLE, id, "market_principal")?,
            market_interest: parse_money_column(&db.market_interest, TABLE, id, "market_interest")?,
            total_market_value: parse_money_column(
                &db.total_market_value,
                TABLE,
                id,
                "total_market_value",
            )?,
            owner_id: db.owner_id,
            person: db.person,
            start_date: db.start_date,
            cycle: db.cycle,
            loan_id: db.loan_id,
        })
    }
}

/// Principal unit that daily rates are quoted against (one lakh).
pub const DAILY_RATE_PRINCIPAL_UNIT: u32 = 100_000;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Rows per insert statement when writing the breakdown projection
pub const BREAKDOWN_INSERT_CHUNK_SIZE: usize = 50;

/// Placeholder cell written for an export sheet with no rows
pub const EMPTY_SHEET_PLACEHOLDER: &str = "No data available";

/// Export sheet names
pub const LOANS_SHEET: &str = "Loans";
pub const INSTALLMENTS_SHEET: &str = "Installments";
pub const TRANSACTIONS_SHEET: &str = "Transactions";
pub const BREAKDOWN_SHEET: &str = "Investment Breakdown";

/// Rows returned by a transaction listing when no limit is given
pub const DEFAULT_TRANSACTION_LIST_LIMIT: usize = 100;

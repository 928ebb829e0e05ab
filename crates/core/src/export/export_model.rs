use serde::{Deserialize, Serialize};

use crate::constants::EMPTY_SHEET_PLACEHOLDER;

/// A named rectangular table of already-formatted cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetTable {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Builds a sheet from a header and data rows. With no data rows the sheet
    /// holds a single placeholder cell instead of a bare header.
    pub fn new(name: &str, header: &[&str], data: Vec<Vec<String>>) -> Self {
        let rows = if data.is_empty() {
            vec![vec![EMPTY_SHEET_PLACEHOLDER.to_string()]]
        } else {
            let mut rows = Vec::with_capacity(data.len() + 1);
            rows.push(header.iter().map(|h| h.to_string()).collect());
            rows.extend(data);
            rows
        };
        Self {
            name: name.to_string(),
            rows,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.rows.len() == 1 && self.rows[0].len() == 1 && self.rows[0][0] == EMPTY_SHEET_PLACEHOLDER
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetFailure {
    pub sheet: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub sheets_written: Vec<String>,
    pub failures: Vec<SheetFailure>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

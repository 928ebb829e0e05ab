/// A stored row that could not be decoded into its domain type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub id: String,
    /// Loan the row belongs to: the row's own id for a loan, `loan_id` for an installment.
    pub loan_id: String,
    pub reason: String,
}

/// Rows that decoded, plus the ones that did not.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedRecords<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RejectedRecord>,
}

impl<T> ScannedRecords<T> {
    pub fn complete(records: Vec<T>) -> Self {
        Self {
            records,
            rejected: Vec::new(),
        }
    }

    /// Number of stored rows seen, decoded or not.
    pub fn row_count(&self) -> usize {
        self.records.len() + self.rejected.len()
    }
}

pub mod keyed_lock;
pub mod record_scan;
pub mod time_utils;

pub use keyed_lock::{KeyedLockGuard, KeyedLocks};
pub use record_scan::{RejectedRecord, ScannedRecords};

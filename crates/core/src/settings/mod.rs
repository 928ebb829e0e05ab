//! Settings module - reporting presentation settings.

mod reporting_settings;

pub use reporting_settings::{DigitGrouping, ReportingSettings};

//! Portfolio-wide financial summary.

mod summary_calculator;
mod summary_model;
mod summary_service;
mod summary_traits;


pub use summary_calculator::{summarize, summarize_with_skips};
pub use summary_model::FinancialSummary;
pub use summary_service::SummaryService;
pub use summary_traits::SummaryServiceTrait;

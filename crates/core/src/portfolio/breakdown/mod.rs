//! Investment-breakdown projection: a per-loan cache rebuilt wholesale from loans
//! and installments.

mod breakdown_model;
mod breakdown_service;
mod breakdown_traits;


pub use breakdown_model::{InvestmentBreakdownRow, ResyncReport};
pub use breakdown_service::BreakdownService;
pub use breakdown_traits::{BreakdownRepositoryTrait, BreakdownServiceTrait};

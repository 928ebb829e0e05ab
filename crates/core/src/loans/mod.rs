//! Loans module - domain models, services, and traits.

mod loans_model;
mod loans_service;
mod loans_traits;


pub use loans_model::{
    Loan, LoanFilter, LoanStatus, LoanType, LoanUpdate, NewLoan, PricingTerms,
    RepaymentFrequency,
};
pub use loans_service::LoanService;
pub(crate) use loans_service::load_owned_loan;
pub use loans_traits::{LoanRepositoryTrait, LoanServiceTrait};

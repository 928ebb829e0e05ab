//! Lendbook Core - loan valuation and reconciliation engine.
//!
//! This crate contains the domain entities, the pure valuation and summary
//! calculators, and the services that orchestrate them. It is database-agnostic
//! and defines traits that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod export;
pub mod installments;
pub mod loans;
pub mod money;
pub mod portfolio;
pub mod settings;
pub mod transactions;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use money::Money;
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

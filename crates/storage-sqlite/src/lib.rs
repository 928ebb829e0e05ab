//! SQLite storage implementation for Lendbook.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `lendbook-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for loans, installments, transactions and the
//!   investment-breakdown projection
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!   core (domain)        worker (jobs)
//!         │                    │
//!         └─────────┬──────────┘
//!                   │
//!                   ▼
//!         storage-sqlite (this crate)
//!                   │
//!                   ▼
//!               SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Repository implementations
pub mod installments;
pub mod loans;
pub mod portfolio;
pub mod transactions;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use installments::InstallmentRepository;
pub use loans::LoanRepository;
pub use portfolio::breakdown::BreakdownRepository;
pub use transactions::TransactionRepository;

// Re-export from lendbook-core for convenience
pub use lendbook_core::errors::{DatabaseError, Error, Result};

//! Portfolio-wide computations: valuation, summary and the breakdown projection.

pub mod breakdown;
pub mod summary;
pub mod valuation;

pub use breakdown::*;
pub use summary::*;
pub use valuation::*;

//! Money module - fixed-point amounts and their display formatting.

mod money_format;
mod money_model;

pub use money_format::format_currency;
pub use money_model::Money;

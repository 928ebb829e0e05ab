mod model;
mod repository;

pub use model::InvestmentBreakdownDB;
pub use repository::BreakdownRepository;

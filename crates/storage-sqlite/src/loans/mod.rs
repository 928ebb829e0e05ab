mod model;
mod repository;

pub use model::LoanDB;
pub use repository::LoanRepository;

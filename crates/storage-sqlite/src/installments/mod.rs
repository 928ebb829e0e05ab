mod model;
mod repository;

pub use model::InstallmentDB;
pub use repository::InstallmentRepository;

//! Installments module - domain models, the reconciliation state machine, services, and traits.

mod installments_model;
mod installments_service;
mod installments_traits;
mod reconciliation;


pub use installments_model::{
    Installment, InstallmentFilter, InstallmentKind, InstallmentStatus, InstallmentUpdate,
    NewInstallment,
};
pub use installments_service::InstallmentService;
pub use installments_traits::{InstallmentRepositoryTrait, InstallmentServiceTrait};
pub use reconciliation::reconcile_loan_status;

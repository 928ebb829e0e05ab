use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use lendbook_core::export::{CsvExportSink, ExportService, ExportServiceTrait};
use lendbook_core::installments::{InstallmentService, InstallmentServiceTrait};
use lendbook_core::portfolio::breakdown::{BreakdownService, BreakdownServiceTrait};
use lendbook_core::portfolio::summary::{SummaryService, SummaryServiceTrait};
use lendbook_storage_sqlite::{
    db, BreakdownRepository, InstallmentRepository, LoanRepository, TransactionRepository,
};

pub struct WorkerState {
    pub installment_service: Arc<dyn InstallmentServiceTrait>,
    pub breakdown_service: Arc<dyn BreakdownServiceTrait>,
    pub summary_service: Arc<dyn SummaryServiceTrait>,
    pub export_service: Option<Arc<dyn ExportServiceTrait>>,
}

pub fn init_tracing() {
    let log_format = std::env::var("LB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Opens the database and wires every repository into its services.
///
/// Must run inside the tokio runtime: the storage writer is a spawned task.
pub fn build_state(config: &Config) -> anyhow::Result<Arc<WorkerState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(&pool)?;

    let loan_repository = Arc::new(LoanRepository::new(pool.clone(), writer.clone()));
    let installment_repository = Arc::new(InstallmentRepository::new(pool.clone(), writer.clone()));
    let transaction_repository = Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let breakdown_repository = Arc::new(BreakdownRepository::new(pool, writer));

    let installment_service = Arc::new(InstallmentService::new(
        installment_repository.clone(),
        loan_repository.clone(),
    ));
    let breakdown_service = Arc::new(BreakdownService::new(
        loan_repository.clone(),
        installment_repository.clone(),
        breakdown_repository.clone(),
    ));
    let summary_service = Arc::new(SummaryService::new(
        loan_repository.clone(),
        installment_repository.clone(),
        transaction_repository.clone(),
    ));

    let export_service: Option<Arc<dyn ExportServiceTrait>> = match &config.export_dir {
        Some(dir) => {
            tracing::info!("CSV export enabled: {}", dir.display());
            Some(Arc::new(ExportService::new(
                loan_repository,
                installment_repository,
                transaction_repository,
                breakdown_repository,
                Arc::new(CsvExportSink::new(dir.clone())),
                config.reporting.clone(),
            )))
        }
        None => None,
    };

    Ok(Arc::new(WorkerState {
        installment_service,
        breakdown_service,
        summary_service,
        export_service,
    }))
}

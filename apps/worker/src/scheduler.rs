//! Owner job runner: status sync, breakdown resync, then the optional export.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::main_lib::WorkerState;
use lendbook_core::portfolio::breakdown::ResyncReport;
use lendbook_core::utils::time_utils::business_date_today;

/// Outcome of one owner's pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OwnerRun {
    pub loans_updated: usize,
    pub rows_written: usize,
    pub loans_skipped: usize,
    pub sheets_written: usize,
    /// Set when the breakdown resync skipped loans or never accounted for all of them.
    pub partial_failure: Option<String>,
}

pub async fn run_owner(
    state: &WorkerState,
    owner_id: &str,
    cancel: &CancellationToken,
) -> lendbook_core::Result<OwnerRun> {
    let mut run = OwnerRun {
        loans_updated: state
            .installment_service
            .sync_all_loan_statuses(owner_id)
            .await?,
        ..OwnerRun::default()
    };

    let mut report = state.breakdown_service.resync_breakdown(owner_id, cancel).await?;
    if !report_accounts_for_every_loan(&report) {
        warn!(
            "Owner {}: resync wrote {} and skipped {} of {} loans, retrying once",
            owner_id,
            report.written,
            report.skipped.len(),
            report.loan_count
        );
        report = state.breakdown_service.resync_breakdown(owner_id, cancel).await?;
    }
    run.rows_written = report.written;
    run.loans_skipped = report.skipped.len();
    for failure in &report.skipped {
        warn!(
            "Owner {}: loan {} left out of the breakdown: {}",
            owner_id, failure.loan_id, failure.reason
        );
    }
    run.partial_failure = if report_accounts_for_every_loan(&report) {
        report.into_result().err().map(|err| err.to_string())
    } else {
        Some(format!(
            "breakdown accounts for {} of {} loans",
            report.written + report.skipped.len(),
            report.loan_count
        ))
    };

    let today = business_date_today();
    let summary = state
        .summary_service
        .get_financial_summary_as_of(owner_id, today)?;
    info!(
        "Owner {}: {} loans ({} active), market value {}, cash in hand {}, {} overdue",
        owner_id,
        summary.total_loans,
        summary.active_loans,
        summary.market_amount,
        summary.cash_in_hand,
        summary.overdue_count
    );

    if let Some(export_service) = &state.export_service {
        if cancel.is_cancelled() {
            return Err(lendbook_core::Error::Cancelled(format!(
                "export for owner {}",
                owner_id
            )));
        }
        let export = export_service.export_owner(owner_id, today).await?;
        run.sheets_written = export.sheets_written.len();
        for failure in &export.failures {
            warn!(
                "Owner {}: sheet '{}' was not exported: {}",
                owner_id, failure.sheet, failure.reason
            );
        }
    }

    Ok(run)
}

fn report_accounts_for_every_loan(report: &ResyncReport) -> bool {
    report.written + report.skipped.len() == report.loan_count
}

/// Runs every owner concurrently. Per-owner failures are logged, not propagated.
pub async fn run_cycle(state: &Arc<WorkerState>, owner_ids: &[String], cancel: &CancellationToken) {
    let runs = owner_ids.iter().map(|owner_id| async move {
        (owner_id, run_owner(state, owner_id, cancel).await)
    });

    for (owner_id, outcome) in join_all(runs).await {
        match outcome {
            Ok(run) => match &run.partial_failure {
                Some(reason) => {
                    warn!("Owner {} done with skipped loans ({}): {:?}", owner_id, reason, run)
                }
                None => info!("Owner {} done: {:?}", owner_id, run),
            },
            Err(e) if cancel.is_cancelled() => info!("Owner {} interrupted: {}", owner_id, e),
            Err(e) => error!("Owner {} failed: {}", owner_id, e),
        }
    }
}

/// Runs cycles until `cancel` fires. `None` runs a single cycle.
pub async fn run(
    state: Arc<WorkerState>,
    owner_ids: Vec<String>,
    every: Option<Duration>,
    cancel: CancellationToken,
) {
    let Some(period) = every else {
        run_cycle(&state, &owner_ids, &cancel).await;
        return;
    };

    info!("Scheduler started ({}s interval)", period.as_secs());
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Scheduler stopped");
                return;
            }
            _ = ticker.tick() => run_cycle(&state, &owner_ids, &cancel).await,
        }
    }
}

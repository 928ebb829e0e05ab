use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};
use lendbook_core::settings::{DigitGrouping, ReportingSettings};

const DEFAULT_DB_PATH: &str = "./data/lendbook.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub owner_ids: Vec<String>,
    pub export_dir: Option<PathBuf>,
    /// `None` runs every job once and exits.
    pub sync_interval: Option<Duration>,
    pub reporting: ReportingSettings,
}

impl Config {
    /// Loads `.env` when present, then reads the `LB_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let owner_ids: Vec<String> = non_empty("LB_OWNER_IDS")
            .ok_or_else(|| anyhow!("LB_OWNER_IDS must list at least one owner id"))?
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        if owner_ids.is_empty() {
            return Err(anyhow!("LB_OWNER_IDS must list at least one owner id"));
        }

        let sync_interval = match non_empty("LB_SYNC_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("LB_SYNC_INTERVAL_SECS is not a number: {}", raw))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let mut reporting = ReportingSettings::default();
        if let Some(symbol) = lookup("LB_CURRENCY_SYMBOL") {
            reporting.currency_symbol = symbol;
        }
        if let Some(raw) = non_empty("LB_MINOR_UNITS") {
            reporting.minor_units = raw
                .trim()
                .parse()
                .with_context(|| format!("LB_MINOR_UNITS is not a number: {}", raw))?;
        }
        if let Some(raw) = non_empty("LB_DIGIT_GROUPING") {
            reporting.digit_grouping = raw.parse::<DigitGrouping>()?;
        }

        Ok(Self {
            db_path: non_empty("LB_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            owner_ids,
            export_dir: non_empty("LB_EXPORT_DIR").map(PathBuf::from),
            sync_interval,
            reporting,
        })
    }
}

use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};

use super::export_model::SheetTable;
use super::export_traits::ExportSinkTrait;
use crate::errors::Result;

/// Writes each sheet to `<dir>/<sheet name>.csv`, replacing any previous file.
pub struct CsvExportSink {
    dir: PathBuf,
}

impl CsvExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn sheet_path(&self, sheet_name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", sheet_name))
    }

    fn write_table(path: &Path, table: &SheetTable) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl ExportSinkTrait for CsvExportSink {
    async fn write_sheet(&self, table: &SheetTable) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.sheet_path(&table.name);
        Self::write_table(&path, table)?;
        debug!("Wrote {} rows to {}", table.rows.len(), path.display());
        Ok(())
    }
}

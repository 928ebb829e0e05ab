//! Spreadsheet-style export of an owner's book.

mod csv_sink;
mod export_model;
mod export_service;
mod export_traits;


pub use csv_sink::CsvExportSink;
pub use export_model::{ExportReport, SheetFailure, SheetTable};
pub use export_service::ExportService;
pub use export_traits::{ExportServiceTrait, ExportSinkTrait};

//! Printer data repository.
//!
//! The dashboard reads printers, health snapshots, alerts, maintenance
//! history and analytics through [`PrinterRepository`]. `main` builds one
//! implementation per session and injects it into the API state:
//!
//! - [`InMemoryPrinterStore`]: demo fleet held in memory
//! - [`RemotePrinterStore`]: the printer backend over HTTP

mod fixtures;
mod memory;
mod remote;

pub use memory::InMemoryPrinterStore;
pub use remote::RemotePrinterStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::backend::ClientError;
use crate::types::{
    Alert, Analytics, HealthSnapshot, MaintenanceRecord, MaintenanceRequest, NewPrinter, Printer,
    TimeRange,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("printer not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("backend unavailable: {0}")]
    Backend(#[from] ClientError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Source of printer fleet data.
#[async_trait]
pub trait PrinterRepository: Send + Sync {
    /// All known printers
    async fn list_printers(&self) -> StoreResult<Vec<Printer>>;

    /// Register a new printer
    async fn add_printer(&self, input: NewPrinter) -> StoreResult<Printer>;

    /// Current health snapshot for a printer
    async fn health(&self, printer_id: &str) -> StoreResult<HealthSnapshot>;

    /// Open maintenance alerts for a printer
    async fn alerts(&self, printer_id: &str) -> StoreResult<Vec<Alert>>;

    /// Past and scheduled maintenance for a printer
    async fn maintenance_history(&self, printer_id: &str) -> StoreResult<Vec<MaintenanceRecord>>;

    /// Book a maintenance slot
    async fn schedule_maintenance(
        &self,
        printer_id: &str,
        request: MaintenanceRequest,
    ) -> StoreResult<MaintenanceRecord>;

    /// Cost and prevention roll-up over `range`
    async fn analytics(&self, printer_id: &str, range: TimeRange) -> StoreResult<Analytics>;
}

/// Shared input checks for `add_printer`.
pub(crate) fn check_new_printer(input: &NewPrinter) -> StoreResult<()> {
    if input.name.trim().is_empty() {
        return Err(StoreError::Validation("printer name is required".to_string()));
    }
    if input.model.trim().is_empty() {
        return Err(StoreError::Validation("printer model is required".to_string()));
    }
    Ok(())
}

/// Accepts RFC 3339 or the `YYYY-MM-DDTHH:MM` form value.
pub(crate) fn check_maintenance_request(request: &MaintenanceRequest) -> StoreResult<()> {
    let date = request.date.trim();
    let parses = chrono::DateTime::parse_from_rfc3339(date).is_ok()
        || chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M").is_ok()
        || chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S").is_ok();
    if parses {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "maintenance date '{}' is not a valid date-time",
            request.date
        )))
    }
}

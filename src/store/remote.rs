use async_trait::async_trait;
use tracing::warn;

use super::{check_maintenance_request, check_new_printer, PrinterRepository, StoreError, StoreResult};
use crate::backend::{BackendClient, ClientError};
use crate::types::{
    Alert, Analytics, HealthSnapshot, MaintenanceRecord, MaintenanceRequest, NewPrinter, Printer,
    TimeRange,
};

/// [`PrinterRepository`] backed by the printer API.
#[derive(Clone)]
pub struct RemotePrinterStore {
    client: BackendClient,
}

impl RemotePrinterStore {
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn map_err(printer_id: &str, err: ClientError) -> StoreError {
        if err.is_not_found() {
            StoreError::NotFound(printer_id.to_string())
        } else {
            warn!(printer_id = %printer_id, error = %err, "Printer backend request failed");
            StoreError::Backend(err)
        }
    }
}

#[async_trait]
impl PrinterRepository for RemotePrinterStore {
    async fn list_printers(&self) -> StoreResult<Vec<Printer>> {
        Ok(self.client.list_printers().await?)
    }

    async fn add_printer(&self, input: NewPrinter) -> StoreResult<Printer> {
        check_new_printer(&input)?;
        Ok(self.client.create_printer(&input).await?)
    }

    async fn health(&self, printer_id: &str) -> StoreResult<HealthSnapshot> {
        self.client
            .printer_health(printer_id)
            .await
            .map_err(|e| Self::map_err(printer_id, e))
    }

    async fn alerts(&self, printer_id: &str) -> StoreResult<Vec<Alert>> {
        self.client
            .printer_alerts(printer_id)
            .await
            .map_err(|e| Self::map_err(printer_id, e))
    }

    async fn maintenance_history(&self, printer_id: &str) -> StoreResult<Vec<MaintenanceRecord>> {
        self.client
            .maintenance_history(printer_id)
            .await
            .map_err(|e| Self::map_err(printer_id, e))
    }

    async fn schedule_maintenance(
        &self,
        printer_id: &str,
        request: MaintenanceRequest,
    ) -> StoreResult<MaintenanceRecord> {
        check_maintenance_request(&request)?;
        self.client
            .schedule_maintenance(printer_id, &request)
            .await
            .map_err(|e| Self::map_err(printer_id, e))
    }

    async fn analytics(&self, printer_id: &str, range: TimeRange) -> StoreResult<Analytics> {
        self.client
            .analytics(printer_id, range)
            .await
            .map_err(|e| Self::map_err(printer_id, e))
    }
}

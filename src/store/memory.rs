use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{
    check_maintenance_request, check_new_printer, fixtures, PrinterRepository, StoreError,
    StoreResult,
};
use crate::types::{
    Alert, Analytics, HealthSnapshot, MaintenanceRecord, MaintenanceRequest, MaintenanceStatus,
    NewPrinter, Printer, TimeRange,
};

#[derive(Debug, Default)]
struct Inner {
    printers: Vec<Printer>,
    maintenance: HashMap<String, Vec<MaintenanceRecord>>,
}

/// In-memory implementation of [`PrinterRepository`] (demo and tests)
#[derive(Debug, Default, Clone)]
pub struct InMemoryPrinterStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryPrinterStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the three-printer demo fleet
    pub fn with_demo_fleet() -> Self {
        let now = Utc::now();
        let printers = fixtures::printers(now);
        let maintenance = printers
            .iter()
            .map(|p| (p.id.clone(), fixtures::maintenance_history(&p.id, now)))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(Inner {
                printers,
                maintenance,
            })),
        }
    }

    async fn ensure_exists(&self, printer_id: &str) -> StoreResult<()> {
        let inner = self.inner.read().await;
        if inner.printers.iter().any(|p| p.id == printer_id) {
            Ok(())
        } else {
            Err(StoreError::NotFound(printer_id.to_string()))
        }
    }
}

#[async_trait]
impl PrinterRepository for InMemoryPrinterStore {
    async fn list_printers(&self) -> StoreResult<Vec<Printer>> {
        Ok(self.inner.read().await.printers.clone())
    }

    async fn add_printer(&self, input: NewPrinter) -> StoreResult<Printer> {
        check_new_printer(&input)?;

        let printer = Printer {
            id: format!("printer-{}", Uuid::new_v4().simple()),
            name: input.name.trim().to_string(),
            model: input.model.trim().to_string(),
            manufacturer: input.manufacturer.filter(|m| !m.trim().is_empty()),
            last_maintenance: Utc::now(),
            total_print_hours: 0.0,
            status: input.status,
            current_parameters: None,
        };

        let mut inner = self.inner.write().await;
        inner.printers.push(printer.clone());
        inner.maintenance.insert(printer.id.clone(), Vec::new());

        info!(printer_id = %printer.id, name = %printer.name, "Added printer");
        Ok(printer)
    }

    async fn health(&self, printer_id: &str) -> StoreResult<HealthSnapshot> {
        self.ensure_exists(printer_id).await?;
        Ok(fixtures::health(printer_id))
    }

    async fn alerts(&self, printer_id: &str) -> StoreResult<Vec<Alert>> {
        self.ensure_exists(printer_id).await?;
        let health = fixtures::health(printer_id);
        // A fully healthy printer has nothing open.
        if health.overall_score >= 100.0 {
            return Ok(Vec::new());
        }
        Ok(fixtures::alerts())
    }

    async fn maintenance_history(&self, printer_id: &str) -> StoreResult<Vec<MaintenanceRecord>> {
        let inner = self.inner.read().await;
        inner
            .maintenance
            .get(printer_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(printer_id.to_string()))
    }

    async fn schedule_maintenance(
        &self,
        printer_id: &str,
        request: MaintenanceRequest,
    ) -> StoreResult<MaintenanceRecord> {
        check_maintenance_request(&request)?;

        let mut inner = self.inner.write().await;
        let history = inner
            .maintenance
            .get_mut(printer_id)
            .ok_or_else(|| StoreError::NotFound(printer_id.to_string()))?;

        let record = MaintenanceRecord {
            id: Uuid::new_v4().to_string(),
            printer_id: printer_id.to_string(),
            date: request.date,
            kind: request.kind,
            description: request.description,
            technician: request.technician,
            status: MaintenanceStatus::Scheduled,
        };
        history.push(record.clone());

        info!(printer_id = %printer_id, record_id = %record.id, kind = ?record.kind, "Scheduled maintenance");
        Ok(record)
    }

    async fn analytics(&self, printer_id: &str, range: TimeRange) -> StoreResult<Analytics> {
        self.ensure_exists(printer_id).await?;
        Ok(fixtures::analytics(range))
    }
}

//! Core domain types shared by the validator, estimator, client and API.

mod parameters;
mod prediction;
mod printer;

pub use parameters::{
    Choice, InfillPattern, Material, MaterialDefaults, MaterialGuidance, PrintParameters,
};
pub use prediction::{Alert, AlertKind, PredictionResponse, PredictionResult, Priority};
pub use printer::{
    Analytics, CurrentParameters, HealthSnapshot, MaintenanceKind, MaintenanceRecommendation,
    MaintenanceRecord, MaintenanceRequest, MaintenanceStatus, NewPrinter, Printer, PrinterStatus,
    TimeRange,
};

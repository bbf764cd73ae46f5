//! printwatch: predictive-maintenance dashboard service for 3D printers
//!
//! ## Architecture
//!
//! - **Validator**: hard range checks and per-material advisories for print parameters
//! - **Cost-Benefit**: savings and ROI estimate for a set of maintenance recommendations
//! - **Classification**: health score and wear/thermal stress bands
//! - **Session**: prediction form state with edit-time and submit-time validation
//! - **Backend / Store**: prediction service client and the injected printer repository
//! - **API**: axum JSON API tying the above together

pub mod api;
pub mod backend;
pub mod classification;
pub mod config;
pub mod cost_benefit;
pub mod session;
pub mod store;
pub mod types;
pub mod validator;

// Re-export configuration
pub use config::{DashboardConfig, DataSource};

// Re-export commonly used types
pub use types::{
    Alert, HealthSnapshot, MaintenanceRecommendation, Material, PredictionResult,
    PrintParameters, Printer, TimeRange,
};

// Re-export services
pub use backend::{BackendClient, ClientError, PredictionService};
pub use cost_benefit::{estimate, render_report, CostBenefitResult};
pub use store::{InMemoryPrinterStore, PrinterRepository, RemotePrinterStore, StoreError};
pub use validator::{validate, validate_detailed};

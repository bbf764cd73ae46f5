//! External prediction service and printer backend.

mod client;

pub use client::{BackendClient, ClientError, PredictionService, PREDICTION_UNAVAILABLE};

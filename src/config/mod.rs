//! Dashboard Configuration Module
//!
//! Configuration is loaded from TOML with per-section defaults.
//!
//! ## Loading Order
//!
//! 1. `PRINTWATCH_CONFIG` environment variable (path to TOML file)
//! 2. `printwatch.toml` in the current working directory
//! 3. Built-in defaults
//!
//! `PRINTWATCH_SERVER_ADDR` overrides `server.addr` after loading.
//!
//! ## Usage
//!
//! Load once in `main()` and pass the value down; there is no global copy.
//!
//! ```ignore
//! let config = DashboardConfig::load();
//! let client = BackendClient::from_config(&config)?;
//! ```

mod dashboard_config;
pub mod validation;

pub use dashboard_config::*;

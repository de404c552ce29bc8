//! Scan configuration for File Foundry.
//!
//! Settings come from an explicit file, the `FOUNDRY_SCAN_CONFIG_PATH` /
//! `FOUNDRY_SCAN_CONFIG_JSON` environment variables, a well-known file in the
//! working directory, or the built-in defaults, in that order. The command
//! line front end layers its flags on top.

pub mod models;

pub use models::scan::{ConfigValidationError, ScanConfig, ScanConfigSource};

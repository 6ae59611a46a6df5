//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the loaded dataset (`SalesRecord`, `SalesTable`)
//! - the UI selection (`ReportType`, `Selection`)
//! - month ordering for categorical month labels (`MonthKey`)

pub mod types;

pub use types::*;

//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - report JSON export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;

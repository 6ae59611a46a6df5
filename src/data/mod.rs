//! Dataset acquisition.

pub mod source;

pub use source::{DataSource, DEFAULT_DATA_URL};

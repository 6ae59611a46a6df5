//! `autosales` library crate.
//!
//! The binary (`autosales`) is a thin wrapper around this library so that:
//!
//! - aggregation and report building are testable without a terminal
//! - the dashboard, text report and JSON export share one pipeline

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;

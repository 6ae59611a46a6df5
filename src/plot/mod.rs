//! Plain-text chart rendering for non-interactive output.

pub mod ascii;

pub use ascii::*;

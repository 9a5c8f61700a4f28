//! Well-depth sonar log converter.
//!
//! This crate provides tools for:
//! - Selecting every Nth line of a space-separated depth log
//! - Converting epoch timestamps to local calendar time
//! - Writing a compact `date,epoch,meters` CSV
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use well_depth_log::{convert_file, ConverterConfig};
//!
//! let summary = convert_file(
//!     Path::new("rp51_log5.csv"),
//!     Path::new("rp51_out.csv"),
//!     &ConverterConfig::default(),
//! )
//! .unwrap();
//! println!("{} rows", summary.rows_written);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;

pub use config::{ConfigError, ConverterConfig};
pub use processors::converter::{convert_file, convert_stream, ConversionSummary, ConvertError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Core record types and I/O operations.

pub mod records;
pub mod writers;

pub use records::{DepthSample, RecordError};
pub use writers::{create_depth_csv, DepthCsvWriter, WriteError};

//! Data processing modules.

pub mod converter;
pub mod decimation;

// Re-export key types for convenience
pub use converter::{
    convert_file, convert_file_in, convert_stream, ConversionSummary, ConvertError, ParseFailure,
};
pub use decimation::{LineKind, LineSelector};

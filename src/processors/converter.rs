//! Sonar log to depth CSV conversion.
//!
//! One sequential pass: every line is numbered (1-based, header included),
//! the header and comments are dropped, every Nth remaining line is parsed
//! and written as `date,epoch,-depth`. A line with an unparseable epoch is
//! reported and skipped. Any other failure ends the pass.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone};
use log::{debug, info};
use thiserror::Error;

use crate::config::{ConfigError, ConverterConfig};
use crate::core::records::{DepthSample, RecordError};
use crate::core::writers::{create_depth_csv, DepthCsvWriter, WriteError};
use crate::processors::decimation::{LineKind, LineSelector};

/// Errors that end a conversion pass.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid converter settings: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open input file '{path}': {source}")]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read input at line {line_number}: {source}")]
    Read {
        line_number: usize,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("line {line_number} ('{content}'): {source}")]
    Record {
        line_number: usize,
        content: String,
        #[source]
        source: RecordError,
    },
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// A sampled line that was dropped because its epoch could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// 1-based position in the input.
    pub line_number: usize,
    /// The line as read.
    pub content: String,
    /// Why the epoch was rejected.
    pub reason: String,
}

/// Outcome of one conversion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// First row written after the header.
    pub first: Option<String>,
    /// Last row written.
    pub last: Option<String>,
    /// Number of input lines seen, header included.
    pub lines_read: usize,
    /// Number of data rows written.
    pub rows_written: usize,
    pub parse_failures: Vec<ParseFailure>,
}

impl ConversionSummary {
    fn record_row(&mut self, row: String) {
        if self.first.is_none() {
            self.first = Some(row.clone());
        }
        self.last = Some(row);
    }
}

/// Convert the log at `input` into a depth CSV at `output`, dates in local time.
///
/// The output file is created (or truncated) only after the input opened
/// successfully. Rows already written are flushed even when the pass fails.
///
/// # Errors
///
/// Returns an error if:
/// - The settings are invalid
/// - The input cannot be opened or read
/// - The output cannot be created or written to
/// - A sampled line with a valid epoch lacks the depth field
pub fn convert_file(
    input: &Path,
    output: &Path,
    config: &ConverterConfig,
) -> Result<ConversionSummary> {
    convert_file_in(input, output, config, &Local)
}

/// Same as [`convert_file`] with dates rendered in `tz`.
pub fn convert_file_in<Tz>(
    input: &Path,
    output: &Path,
    config: &ConverterConfig,
    tz: &Tz,
) -> Result<ConversionSummary>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    config.validate()?;

    let file = File::open(input).map_err(|source| ConvertError::OpenInput {
        path: input.to_path_buf(),
        source,
    })?;
    let reader = BufReader::with_capacity(64 * 1024, file);

    debug!("Now reading {}", input.display());
    debug!("Output to {}", output.display());

    let csv = create_depth_csv(output, &config.header)?;
    convert_into(reader, csv, config, tz)
}

/// Convert a log read from `reader` into a depth CSV written to `writer`.
pub fn convert_stream<R, W, Tz>(
    reader: R,
    writer: W,
    config: &ConverterConfig,
    tz: &Tz,
) -> Result<ConversionSummary>
where
    R: BufRead,
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    config.validate()?;
    let csv = DepthCsvWriter::new(writer, &config.header, "output stream")?;
    convert_into(reader, csv, config, tz)
}

fn convert_into<R, W, Tz>(
    reader: R,
    mut csv: DepthCsvWriter<W>,
    config: &ConverterConfig,
    tz: &Tz,
) -> Result<ConversionSummary>
where
    R: BufRead,
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let result = run_pass(reader, &mut csv, config, tz);
    let flushed = csv.flush();
    let summary = result?;
    flushed?;

    info!(
        "Converted {} of {} lines ({} parse errors)",
        summary.rows_written,
        summary.lines_read,
        summary.parse_failures.len()
    );
    Ok(summary)
}

fn run_pass<R, W, Tz>(
    mut reader: R,
    csv: &mut DepthCsvWriter<W>,
    config: &ConverterConfig,
    tz: &Tz,
) -> Result<ConversionSummary>
where
    R: BufRead,
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let selector = LineSelector::new(config.decimation_rate, config.comment_prefix);
    let mut summary = ConversionSummary::default();

    let mut buf = Vec::with_capacity(256);
    let mut line_number = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| ConvertError::Read {
                line_number: line_number + 1,
                source,
            })?;
        if read == 0 {
            break;
        }
        line_number += 1;
        summary.lines_read = line_number;

        let line = decode_line(&buf);

        if selector.classify(line_number, &line) != LineKind::Sampled {
            continue;
        }

        let row = DepthSample::parse(&line, config.depth_field)
            .and_then(|sample| sample.to_csv_row(tz, &config.date_format));

        match row {
            Ok(row) => {
                debug!("line {}: {}", line_number, row);
                csv.write_row(&row)?;
                summary.record_row(row);
            }
            Err(e) if e.is_recoverable() => {
                debug!("Error at {}: {} ({})", line_number, line, e);
                summary.parse_failures.push(ParseFailure {
                    line_number,
                    content: line,
                    reason: e.to_string(),
                });
            }
            Err(source) => {
                return Err(ConvertError::Record {
                    line_number,
                    content: line,
                    source,
                });
            }
        }
    }

    summary.rows_written = csv.rows_written();
    Ok(summary)
}

/// Strip the line terminator (`\n` or `\r\n`) and decode, replacing invalid UTF-8.
fn decode_line(buf: &[u8]) -> String {
    let mut end = buf.len();
    if end > 0 && buf[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && buf[end - 1] == b'\r' {
            end -= 1;
        }
    }
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

//! Parsing of sonar log lines and rendering of depth CSV rows.
//!
//! A log line is split on single spaces. Field 0 holds the Unix epoch in
//! seconds, the depth field (index 2 by default) holds the raw reading.
//! The reading is never parsed: the output carries it verbatim behind a
//! `-` so depths below the sensor come out negative.

use std::fmt::{Display, Write as FmtWrite};
use std::num::ParseIntError;

use chrono::TimeZone;
use thiserror::Error;

/// Errors that can occur while turning a log line into a CSV row.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid epoch '{raw}': {source}")]
    InvalidEpoch {
        raw: String,
        #[source]
        source: ParseIntError,
    },

    #[error("epoch {0} is outside the representable date range")]
    EpochOutOfRange(i64),

    #[error("missing field {index}: line has only {found} field(s)")]
    MissingField { index: usize, found: usize },

    #[error("invalid date format '{0}'")]
    DateFormat(String),
}

impl RecordError {
    /// Epoch problems only cost the current line; everything else ends the pass.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RecordError::InvalidEpoch { .. } | RecordError::EpochOutOfRange(_)
        )
    }
}

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;

/// Split a log line into its space-separated fields.
///
/// Consecutive spaces yield empty fields, so column positions stay fixed.
#[inline]
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(' ').collect()
}

/// Parse a signed epoch in seconds.
pub fn parse_epoch(field: &str) -> Result<i64> {
    field.parse::<i64>().map_err(|source| RecordError::InvalidEpoch {
        raw: field.to_string(),
        source,
    })
}

/// Format an epoch as calendar time in `tz`.
pub fn format_epoch<Tz>(epoch: i64, tz: &Tz, date_format: &str) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let date = tz
        .timestamp_opt(epoch, 0)
        .single()
        .ok_or(RecordError::EpochOutOfRange(epoch))?;

    // Display on chrono's DelayedFormat fails on bad specifiers instead of panicking
    let mut out = String::with_capacity(date_format.len() + 8);
    write!(out, "{}", date.format(date_format))
        .map_err(|_| RecordError::DateFormat(date_format.to_string()))?;
    Ok(out)
}

/// One sampled line of the sonar log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthSample<'a> {
    /// Unix epoch in seconds.
    pub epoch: i64,
    /// Raw depth text, exactly as logged.
    pub depth: &'a str,
}

impl<'a> DepthSample<'a> {
    /// Parse a log line.
    ///
    /// The epoch is checked before the depth field is looked up, so a line
    /// that is both short and non-numeric reports the epoch problem.
    pub fn parse(line: &'a str, depth_field: usize) -> Result<Self> {
        let fields = split_fields(line);
        let epoch = parse_epoch(fields[0])?;
        let depth = fields
            .get(depth_field)
            .copied()
            .ok_or(RecordError::MissingField {
                index: depth_field,
                found: fields.len(),
            })?;
        Ok(Self { epoch, depth })
    }

    /// Render as `date,epoch,-depth`.
    pub fn to_csv_row<Tz>(&self, tz: &Tz, date_format: &str) -> Result<String>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let date = format_epoch(self.epoch, tz, date_format)?;
        Ok(format!("{},{},-{}", date, self.epoch, self.depth))
    }
}

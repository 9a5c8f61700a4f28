//! Writer for the decimated depth CSV.
//!
//! The output is a fixed header line followed by one `date,epoch,-depth`
//! row per kept sample. Rows go straight to the underlying stream as they
//! are produced.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write data to the output stream.
    #[error("failed to write to '{target}': {source}")]
    WriteFile {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Line-oriented writer for depth CSV rows.
#[derive(Debug)]
pub struct DepthCsvWriter<W: Write> {
    inner: W,
    target: String,
    rows: usize,
}

impl<W: Write> DepthCsvWriter<W> {
    /// Wrap `inner` and write `header` as the first line.
    ///
    /// `target` names the destination in error messages.
    pub fn new(inner: W, header: &str, target: impl Into<String>) -> Result<Self> {
        let mut writer = Self {
            inner,
            target: target.into(),
            rows: 0,
        };
        writer.write_line(header)?;
        Ok(writer)
    }

    /// Append one data row.
    pub fn write_row(&mut self, row: &str) -> Result<()> {
        self.write_line(row)?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written so far (header excluded).
    #[inline]
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> Result<()> {
        let target = &self.target;
        self.inner.flush().map_err(|e| WriteError::WriteFile {
            target: target.clone(),
            source: e,
        })
    }

    /// Flush and hand back the underlying stream.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.inner)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let target = &self.target;
        writeln!(self.inner, "{}", line).map_err(|e| WriteError::WriteFile {
            target: target.clone(),
            source: e,
        })
    }
}

/// Create (or truncate) a depth CSV file and write its header.
///
/// Parent directories are created when missing.
pub fn create_depth_csv(path: &Path, header: &str) -> Result<DepthCsvWriter<BufWriter<File>>> {
    ensure_parent_dirs(path)?;
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    DepthCsvWriter::new(
        BufWriter::with_capacity(64 * 1024, file),
        header,
        path.display().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writer_header_then_rows() {
        let mut writer = DepthCsvWriter::new(Vec::new(), "date, epoch, meters", "memory").unwrap();
        writer.write_row("2022-01-12_150640,1642000000,-3.481").unwrap();
        assert_eq!(writer.rows_written(), 1);

        let bytes = writer.into_inner().unwrap();
        let content = String::from_utf8(bytes).unwrap();
        assert_eq!(
            content,
            "date, epoch, meters\n2022-01-12_150640,1642000000,-3.481\n"
        );
    }

    #[test]
    fn test_create_depth_csv_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("deeper").join("out.csv");

        let writer = create_depth_csv(&path, "date, epoch, meters").unwrap();
        writer.into_inner().unwrap();

        assert!(path.exists());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "date, epoch, meters\n");
    }

    #[test]
    fn test_create_depth_csv_truncates_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");
        fs::write(&path, "stale contents\nmore\n").unwrap();

        let writer = create_depth_csv(&path, "date, epoch, meters").unwrap();
        writer.into_inner().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "date, epoch, meters\n");
    }

    #[test]
    fn test_create_depth_csv_on_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = create_depth_csv(temp_dir.path(), "date, epoch, meters");
        assert!(matches!(result, Err(WriteError::CreateFile { .. })));
    }
}

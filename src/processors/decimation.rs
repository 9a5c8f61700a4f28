//! Line selection for decimated sonar logs.

/// What the converter does with one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Line 1, never inspected.
    Header,
    /// Starts with the comment prefix.
    Comment,
    /// Data line that falls between samples.
    Unsampled,
    /// Data line whose number is a multiple of the decimation rate.
    Sampled,
}

/// Decides which lines of a log are converted.
///
/// Line numbers are 1-based and count every line of the input, header and
/// comments included, so the sampling grid is fixed by file position.
#[derive(Debug, Clone, Copy)]
pub struct LineSelector {
    rate: usize,
    comment_prefix: char,
}

impl LineSelector {
    /// `rate` must be at least 1; a zero rate is treated as 1.
    pub fn new(rate: usize, comment_prefix: char) -> Self {
        Self {
            rate: rate.max(1),
            comment_prefix,
        }
    }

    /// Classify `line` found at 1-based position `line_number`.
    pub fn classify(&self, line_number: usize, line: &str) -> LineKind {
        if line_number == 1 {
            LineKind::Header
        } else if line.starts_with(self.comment_prefix) {
            LineKind::Comment
        } else if line_number % self.rate == 0 {
            LineKind::Sampled
        } else {
            LineKind::Unsampled
        }
    }
}

//! File-based streaming of ECG recordings
//!
//! Reads a text recording with one integer sample per line:
//!
//! ```text
//! # lead II, 250 Hz
//! 926
//! 920
//! 916,
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. A trailing comma is
//! accepted so rows pasted from a C array initializer can be replayed
//! directly. Anything else that is not an integer is a format error.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{Stream, StreamError};
use crate::Sample;

/// Longest line accepted, in bytes
const MAX_LINE_LEN: usize = 64;

/// Statistics for file streaming
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileStreamStats {
    /// Samples read successfully
    pub samples_read: usize,
    /// Lines processed, including skipped ones
    pub lines_processed: usize,
    /// Bytes read from file
    pub bytes_read: usize,
}

/// Recording replayed from a text file
///
/// ## Example
///
/// ```rust,no_run
/// use pantompkins_core::stream::FileStream;
/// use pantompkins_core::traits::Stream;
///
/// let mut stream = FileStream::open("record_100.txt")?.with_skip_lines(1);
/// while let Ok(sample) = stream.poll_next() {
///     // Feed the detector
/// }
/// # Ok::<(), pantompkins_core::stream::StreamError<std::io::Error>>(())
/// ```
///
/// ## Memory Efficiency
///
/// The file is read in 4KB chunks into a fixed buffer; lines are assembled
/// in a bounded `heapless::String`, so replaying a long recording never
/// grows the heap.
pub struct FileStream {
    /// File handle
    file: File,
    /// Read buffer
    buffer: [u8; 4096],
    /// Current position in buffer
    buffer_pos: usize,
    /// Valid bytes in buffer
    buffer_len: usize,
    /// Line being assembled
    line_buffer: heapless::String<MAX_LINE_LEN>,
    /// Whether we've reached EOF
    eof: bool,
    /// Skip first N lines (for headers)
    skip_lines: usize,
    /// Lines already skipped
    lines_skipped: usize,
    /// Statistics
    stats: FileStreamStats,
}

impl FileStream {
    /// Open a recording
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StreamError<std::io::Error>> {
        let file = File::open(path).map_err(StreamError::Transport)?;

        Ok(Self {
            file,
            buffer: [0; 4096],
            buffer_pos: 0,
            buffer_len: 0,
            line_buffer: heapless::String::new(),
            eof: false,
            skip_lines: 0,
            lines_skipped: 0,
            stats: FileStreamStats::default(),
        })
    }

    /// Skip first N lines (useful for headers)
    pub fn with_skip_lines(mut self, lines: usize) -> Self {
        self.skip_lines = lines;
        self
    }

    /// Get statistics
    pub fn stats(&self) -> &FileStreamStats {
        &self.stats
    }

    /// Refill buffer from file
    fn refill_buffer(&mut self) -> Result<bool, StreamError<std::io::Error>> {
        if self.eof {
            return Ok(false);
        }

        let bytes_read = self
            .file
            .read(&mut self.buffer)
            .map_err(StreamError::Transport)?;
        self.buffer_pos = 0;
        self.buffer_len = bytes_read;

        if bytes_read == 0 {
            self.eof = true;
            return Ok(false);
        }

        self.stats.bytes_read += bytes_read;
        Ok(true)
    }

    /// Assemble the next line into `line_buffer`; false at end of file
    fn read_line(&mut self) -> Result<bool, StreamError<std::io::Error>> {
        self.line_buffer.clear();

        loop {
            while self.buffer_pos < self.buffer_len {
                let byte = self.buffer[self.buffer_pos];
                self.buffer_pos += 1;

                if byte == b'\n' {
                    self.stats.lines_processed += 1;

                    if self.lines_skipped < self.skip_lines {
                        self.lines_skipped += 1;
                        self.line_buffer.clear();
                        continue;
                    }

                    return Ok(true);
                } else if byte != b'\r' && self.line_buffer.push(byte as char).is_err() {
                    return Err(StreamError::Overflow);
                }
            }

            if !self.refill_buffer()? {
                // Last line without a newline
                if !self.line_buffer.is_empty() && self.lines_skipped >= self.skip_lines {
                    self.stats.lines_processed += 1;
                    return Ok(true);
                }
                self.line_buffer.clear();
                return Ok(false);
            }
        }
    }
}

/// Parse one recording line; `None` for lines that carry no sample
fn parse_line(line: &str) -> Result<Option<Sample>, StreamError<std::io::Error>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    line.trim_end_matches(',')
        .trim()
        .parse::<Sample>()
        .map(Some)
        .map_err(|_| StreamError::Format("expected one integer sample per line"))
}

impl Stream for FileStream {
    type Item = Sample;
    type Error = StreamError<std::io::Error>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        loop {
            if !self.read_line()? {
                return Err(nb::Error::Other(StreamError::EndOfStream));
            }

            if let Some(sample) = parse_line(&self.line_buffer)? {
                self.stats.samples_read += 1;
                return Ok(sample);
            }
        }
    }
}

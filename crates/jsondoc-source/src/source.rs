use std::io::{self, Read};

use thiserror::Error;
use tracing::trace;

use crate::reader::ReadBytes;

/// A byte offset and the corresponding line and column number.
///
/// Lines start at 1, columns at 0; a `\n` moves to column 0 of the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub byte_offset: u64,
    pub line: u64,
    pub col: u64,
}

impl Default for Location {
    fn default() -> Self {
        Location {
            byte_offset: 0,
            line: 1,
            col: 0,
        }
    }
}

impl Location {
    fn advance_by_byte(&mut self, c: u8) {
        if c == b'\n' {
            self.col = 0;
            self.line += 1;
        } else {
            self.col += 1;
        }
        self.byte_offset += 1;
    }
}

/// Failure to pull the next byte out of the backing reader.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("read failed at line {}, col {}: {source}", .location.line, .location.col)]
    Io {
        location: Location,
        #[source]
        source: io::Error,
    },
}

/// A type alias for `Result<T, SourceError>`.
pub type SourceResult<T> = Result<T, SourceError>;

// Note: char::is_ascii_whitespace is not used because it also accepts U+000C FORM FEED,
// which is not whitespace in JSON.
pub fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\n' | b'\t' | b'\r')
}

/// One-byte-lookahead source over a fallible byte iterator.
///
/// `Ok(None)` from any primitive means end of input.
pub struct CharSource<I> {
    bytes: I,
    peeked: Option<u8>,
    location: Location,
}

impl<R: Read> CharSource<ReadBytes<R>> {
    /// Creates a source reading from `reader` through a [`ReadBytes`] buffer.
    pub fn from_reader(reader: R) -> Self {
        CharSource::new(ReadBytes::new(reader))
    }
}

impl<I: Iterator<Item = io::Result<u8>>> CharSource<I> {
    pub fn new(bytes: I) -> Self {
        CharSource {
            bytes,
            peeked: None,
            location: Location::default(),
        }
    }

    /// The location of the byte that the next call to `next_char(false)` returns.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Consumes and returns the next byte.
    ///
    /// With `skip_whitespace`, JSON whitespace is consumed and skipped first.
    pub fn next_char(&mut self, skip_whitespace: bool) -> SourceResult<Option<u8>> {
        let c = self.peek_char(skip_whitespace)?;
        self.bump();
        Ok(c)
    }

    /// Returns the next byte without consuming it.
    ///
    /// Whitespace skipped on the way to that byte *is* consumed.
    pub fn peek_char(&mut self, skip_whitespace: bool) -> SourceResult<Option<u8>> {
        loop {
            match self.fill()? {
                Some(c) if skip_whitespace && is_whitespace(c) => self.bump(),
                other => return Ok(other),
            }
        }
    }

    /// Whether the next non-whitespace byte is `ch`. Never consumes it.
    pub fn expect(&mut self, ch: u8) -> SourceResult<bool> {
        Ok(self.peek_char(true)? == Some(ch))
    }

    fn fill(&mut self) -> SourceResult<Option<u8>> {
        if self.peeked.is_none() {
            self.peeked = match self.bytes.next() {
                Some(Ok(c)) => Some(c),
                Some(Err(source)) => {
                    trace!(location = ?self.location, %source, "byte source failed");
                    return Err(SourceError::Io {
                        location: self.location,
                        source,
                    });
                }
                None => None,
            };
        }
        Ok(self.peeked)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peeked.take() {
            self.location.advance_by_byte(c);
        }
    }
}

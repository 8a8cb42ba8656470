//! Byte-level character source for the `jsondoc` parser.
//!
//! A [`CharSource`] pulls bytes from any [`std::io::Read`] through a small
//! internal buffer and offers the three primitives the grammar is written in
//! terms of: [`CharSource::next_char`], [`CharSource::peek_char`] and
//! [`CharSource::expect`]. JSON whitespace (space, tab, `\n`, `\r`) can be
//! skipped transparently, and every consumed byte advances a [`Location`].
//!
//! ```
//! use jsondoc_source::CharSource;
//!
//! # fn main() -> Result<(), jsondoc_source::SourceError> {
//! let mut source = CharSource::from_reader(&b"  [ 1 ]"[..]);
//! assert_eq!(source.next_char(true)?, Some(b'['));
//! assert!(source.expect(b'1')?);
//! assert_eq!(source.next_char(false)?, Some(b'1'));
//! assert_eq!(source.peek_char(false)?, Some(b' '));
//! assert_eq!(source.next_char(true)?, Some(b']'));
//! assert_eq!(source.next_char(true)?, None);
//! # Ok(())
//! # }
//! ```

mod reader;
mod source;

pub use reader::*;
pub use source::*;

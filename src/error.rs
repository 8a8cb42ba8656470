use std::io;

use jsondoc_source::{Location, SourceError};
use thiserror::Error;

use crate::json_value::JsonType;
use crate::parser::ParserState;

/// Why a document failed to parse.
///
/// The parser itself only reports success or failure through its state; this
/// is kept alongside for diagnostics.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to open input: {0}")]
    Open(#[source] io::Error),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("unexpected end of input at line {}, col {}", .0.line, .0.col)]
    UnexpectedEof(Location),

    #[error("expected {expected} but found byte {found:#x} at line {}, col {}", .location.line, .location.col)]
    UnexpectedChar {
        found: u8,
        expected: &'static str,
        location: Location,
    },

    #[error("document root must be an object or an array, found byte {found:#x}")]
    InvalidRoot { found: u8 },

    #[error("string starting at line {}, col {} is not terminated", .start.line, .start.col)]
    UnterminatedString { start: Location },

    #[error("string starting at line {}, col {} is not valid UTF-8", .start.line, .start.col)]
    InvalidUtf8 { start: Location },

    #[error("nesting exceeds {limit} levels at line {}, col {}", .location.line, .location.col)]
    TooDeep { limit: usize, location: Location },

    #[error("invalid number literal '{text}' at line {}, col {}", .location.line, .location.col)]
    InvalidNumber { text: String, location: Location },
}

/// A type alias for `Result<T, ParseError>`.
pub type ParseResult<T> = Result<T, ParseError>;

/// Caller-side misuse of a [`JsonValue`](crate::JsonValue) or [`Parser`](crate::Parser).
///
/// The plain accessors panic with this as the message; the `try_*` forms
/// hand it back instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractViolation {
    #[error("cannot take the length of a {0} value")]
    NotSized(JsonType),

    #[error("cannot index {found} value by {by}")]
    WrongContainer { found: JsonType, by: &'static str },

    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("expected {expected} value but found {found}")]
    UnexpectedType { expected: JsonType, found: JsonType },

    #[error("parser cannot start from state {0:?}, it must be Open")]
    ParserNotOpen(ParserState),
}

//! Parses a JSON file into an owned tree of [`JsonValue`]s.
//!
//! The document root must be an object or an array. Parsing is a single
//! recursive-descent pass straight over the file's bytes, with no separate
//! token stream; the tree is built in place as the grammar goes.
//!
//! ```no_run
//! use jsondoc::{Parser, ParserState};
//!
//! let mut parser = Parser::open("settings.json");
//! parser.start();
//! if parser.state() == ParserState::Success {
//!     let root = parser.root().unwrap();
//!     if let Some(name) = root.at_key("name").and_then(|v| v.get::<String>()) {
//!         println!("name: {name}");
//!     }
//! }
//! parser.clean();
//! ```
//!
//! Two kinds of failure are kept apart. Bad input only ever moves the parser
//! to [`ParserState::Error`]. Misusing the API, for example asking a number
//! for its length or viewing an array as a string, is a
//! [`ContractViolation`]: the plain accessors panic, the `try_*` and `get*`
//! forms return it.
//!
//! Objects and arrays may nest at most [`MAX_DEPTH`] levels deep; deeper
//! documents fail like any other malformed input.
//!
//! Limitations: string escapes are not decoded (`\n` stays two characters and
//! `\"` ends the string), and content after the root's closing bracket is not
//! inspected.

mod error;
mod json_value;
mod parser;

pub use error::{ContractViolation, ParseError, ParseResult};
pub use json_value::{InnerAsRef, InnerAsRefMut, JsonArray, JsonObject, JsonType, JsonValue};
pub use jsondoc_source::{Location, SourceError};
pub use parser::{Parser, ParserState, MAX_DEPTH};

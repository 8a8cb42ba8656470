use std::fs::File;
use std::io::{self, Read};
use std::mem;
use std::path::Path;

use jsondoc_source::{is_whitespace, CharSource, ReadBytes};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{ContractViolation, ParseError, ParseResult};
use crate::json_value::{JsonArray, JsonObject, JsonType, JsonValue};

/// Bytes that end a number token, besides whitespace.
const TERMINALS: [u8; 3] = [b',', b'}', b']'];

/// How many objects and arrays may be open at once, the root included.
pub const MAX_DEPTH: usize = 512;

/// Lifecycle of a [`Parser`].
///
/// `Unopened -> Open -> Parsing -> Success | Error`, and `clean()` moves any
/// of them to `Cleaned`. A source that fails to open goes straight to `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserState {
    Unopened,
    Open,
    Parsing,
    Success,
    Error,
    Cleaned,
}

/// Parses one JSON document whose root is an object or an array.
///
/// ```
/// use jsondoc::{Parser, ParserState};
///
/// let mut parser = Parser::from_reader(&br#"{"a": 1, "b": [true, false, null]}"#[..]);
/// parser.start();
/// assert_eq!(parser.state(), ParserState::Success);
///
/// let root = parser.root().unwrap();
/// assert_eq!(root.len(), 2);
/// assert_eq!(*root["a"].view::<f64>(), 1.0);
/// assert_eq!(root["b"].len(), 3);
///
/// parser.clean();
/// assert_eq!(parser.state(), ParserState::Cleaned);
/// assert!(parser.root().is_none());
/// ```
pub struct Parser<R = File> {
    source: Option<CharSource<ReadBytes<R>>>,
    state: ParserState,
    root: Option<JsonValue>,
    error: Option<ParseError>,
}

impl Parser<File> {
    /// Opens `path` for reading. Failing to open is not reported here but
    /// through [`Parser::state`] (`Error`) and [`Parser::error`].
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut parser = Parser {
            source: None,
            state: ParserState::Unopened,
            root: None,
            error: None,
        };
        match File::open(path) {
            Ok(file) => {
                debug!(?path, "opened input");
                parser.source = Some(CharSource::from_reader(file));
                parser.state = ParserState::Open;
            }
            Err(err) => {
                debug!(?path, %err, "failed to open input");
                parser.error = Some(ParseError::Open(err));
                parser.state = ParserState::Error;
            }
        }
        parser
    }
}

impl<R: Read> Parser<R> {
    /// A parser over any reader, already `Open`.
    pub fn from_reader(reader: R) -> Self {
        Parser {
            source: Some(CharSource::from_reader(reader)),
            state: ParserState::Open,
            root: None,
            error: None,
        }
    }

    /// Parses the whole document, ending in `Success` or `Error`.
    ///
    /// # Panics
    ///
    /// If the parser is not `Open`: the source never opened, or `start` was
    /// already called.
    #[track_caller]
    pub fn start(&mut self) {
        let source = match (self.state, self.source.as_mut()) {
            (ParserState::Open, Some(source)) => source,
            (state, _) => panic!("{}", ContractViolation::ParserNotOpen(state)),
        };
        self.state = ParserState::Parsing;
        debug!("parsing started");

        let result = Grammar { source, depth: 0 }.parse_root();
        match result {
            Ok(root) => {
                debug!(%root, "parsing succeeded");
                self.root = Some(root);
                self.state = ParserState::Success;
            }
            Err(err) => {
                // The partially built tree was already dropped on the way up.
                debug!(%err, "parsing failed");
                self.error = Some(err);
                self.state = ParserState::Error;
            }
        }
    }
}

impl<R> Parser<R> {
    /// Drops the parsed tree, if any. Calling this more than once is harmless.
    pub fn clean(&mut self) {
        if self.root.take().is_some() {
            debug!("dropped parsed document");
        }
        self.state = ParserState::Cleaned;
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// The parsed document. Only `Some` after a successful [`Parser::start`].
    pub fn root(&self) -> Option<&JsonValue> {
        self.root.as_ref()
    }

    /// Hands the parsed document over to the caller.
    pub fn into_root(self) -> Option<JsonValue> {
        self.root
    }

    /// Why the parser ended up in `Error`.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }
}

/// The recursive-descent rules, one method per nonterminal.
struct Grammar<'s, I: Iterator<Item = io::Result<u8>>> {
    source: &'s mut CharSource<I>,
    depth: usize,
}

impl<I: Iterator<Item = io::Result<u8>>> Grammar<'_, I> {
    fn eof(&self) -> ParseError {
        ParseError::UnexpectedEof(self.source.location())
    }

    fn unexpected(&self, found: u8, expected: &'static str) -> ParseError {
        ParseError::UnexpectedChar {
            found,
            expected,
            location: self.source.location(),
        }
    }

    /// Next significant byte; end of input is an error here.
    fn next(&mut self) -> ParseResult<u8> {
        match self.source.next_char(true)? {
            Some(c) => Ok(c),
            None => Err(self.eof()),
        }
    }

    /// Consumes `ch` if it is the next significant byte, fails otherwise.
    fn require(&mut self, ch: u8, expected: &'static str) -> ParseResult<()> {
        if self.source.expect(ch)? {
            self.source.next_char(true)?;
            return Ok(());
        }
        match self.source.peek_char(true)? {
            Some(found) => Err(self.unexpected(found, expected)),
            None => Err(self.eof()),
        }
    }

    /// Enters one more container, failing instead of recursing past [`MAX_DEPTH`].
    fn descend(&mut self) -> ParseResult<()> {
        if self.depth == MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                location: self.source.location(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_root(&mut self) -> ParseResult<JsonValue> {
        match self.next()? {
            token @ (b'{' | b'[') => self.parse_element_from(token),
            found => Err(ParseError::InvalidRoot { found }),
        }
    }

    fn parse_object(&mut self, current: &mut JsonValue) -> ParseResult<()> {
        trace!(location = ?self.source.location(), "object");
        let object = current.view_mut::<JsonObject>();

        if self.source.expect(b'}')? {
            self.source.next_char(true)?;
            return Ok(());
        }

        loop {
            self.require(b'"', "'\"' to start an object key")?;
            let mut key = JsonValue::new(JsonType::String);
            self.parse_string(&mut key)?;

            self.require(b':', "':' after an object key")?;
            let value = self.parse_element()?;

            object.insert(mem::take(key.view_mut::<String>()), value);

            match self.next()? {
                b',' => {}
                b'}' => return Ok(()),
                found => return Err(self.unexpected(found, "',' or '}' after an object member")),
            }
        }
    }

    fn parse_array(&mut self, current: &mut JsonValue) -> ParseResult<()> {
        trace!(location = ?self.source.location(), "array");
        let array = current.view_mut::<JsonArray>();

        if self.source.expect(b']')? {
            self.source.next_char(true)?;
            return Ok(());
        }

        loop {
            array.push(self.parse_element()?);

            match self.next()? {
                b',' => {}
                b']' => return Ok(()),
                found => return Err(self.unexpected(found, "',' or ']' after an array element")),
            }
        }
    }

    fn parse_element(&mut self) -> ParseResult<JsonValue> {
        let token = self.next()?;
        self.parse_element_from(token)
    }

    /// Builds the element whose first byte `token` has already been consumed.
    fn parse_element_from(&mut self, token: u8) -> ParseResult<JsonValue> {
        let element = match token {
            b'"' => {
                let mut s = JsonValue::new(JsonType::String);
                self.parse_string(&mut s)?;
                s
            }
            b't' => {
                self.parse_literal("true")?;
                JsonValue::Boolean(true)
            }
            b'f' => {
                self.parse_literal("false")?;
                JsonValue::Boolean(false)
            }
            b'n' => {
                self.parse_literal("null")?;
                JsonValue::new(JsonType::Null)
            }
            b'[' => {
                self.descend()?;
                let mut a = JsonValue::new(JsonType::Array);
                self.parse_array(&mut a)?;
                self.depth -= 1;
                a
            }
            b'{' => {
                self.descend()?;
                let mut o = JsonValue::new(JsonType::Object);
                self.parse_object(&mut o)?;
                self.depth -= 1;
                o
            }
            b'0'..=b'9' | b'-' => {
                let mut n = JsonValue::new(JsonType::Number);
                self.parse_number(&mut n, token)?;
                n
            }
            found => return Err(self.unexpected(found, "a value")),
        };
        Ok(element)
    }

    /// Reads up to the closing quote, byte for byte. Backslashes are kept as
    /// they are, so `\"` ends the string at the quote.
    fn parse_string(&mut self, current: &mut JsonValue) -> ParseResult<()> {
        let start = self.source.location();
        let mut bytes = SmallVec::<[u8; 16]>::new();
        loop {
            match self.source.next_char(false)? {
                Some(b'"') => break,
                Some(b'\n' | b'\r') | None => return Err(ParseError::UnterminatedString { start }),
                Some(c) => bytes.push(c),
            }
        }
        let text = std::str::from_utf8(&bytes).map_err(|_| ParseError::InvalidUtf8 { start })?;
        current.view_mut::<String>().push_str(text);
        Ok(())
    }

    /// Matches the rest of `literal`; its first byte was consumed by the caller.
    /// Whitespace between the letters is skipped, so `t r u e` reads as `true`.
    fn parse_literal(&mut self, literal: &'static str) -> ParseResult<()> {
        for &expected in &literal.as_bytes()[1..] {
            match self.source.next_char(true)? {
                Some(c) if c == expected => {}
                Some(found) => return Err(self.unexpected(found, literal)),
                None => return Err(self.eof()),
            }
        }
        Ok(())
    }

    /// Accumulates bytes until a terminal or whitespace, which is left unread.
    ///
    /// The whole token must be a finite `f64` made of `0-9 + - . e E`; a valid
    /// prefix followed by junk (`1x`, `1.2.3`) is rejected rather than truncated.
    fn parse_number(&mut self, current: &mut JsonValue, token: u8) -> ParseResult<()> {
        let location = self.source.location();
        let mut bytes = SmallVec::<[u8; 16]>::new();
        bytes.push(token);
        loop {
            match self.source.peek_char(false)? {
                Some(c) if TERMINALS.contains(&c) || is_whitespace(c) => break,
                Some(c) => {
                    bytes.push(c);
                    self.source.next_char(false)?;
                }
                None => return Err(self.eof()),
            }
        }

        let text = String::from_utf8_lossy(&bytes);
        let well_formed = bytes
            .iter()
            .all(|c| matches!(c, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E'));
        match text.parse::<f64>() {
            Ok(n) if well_formed && n.is_finite() => {
                trace!(%text, "number");
                *current.view_mut::<f64>() = n;
                Ok(())
            }
            _ => Err(ParseError::InvalidNumber {
                text: text.into_owned(),
                location,
            }),
        }
    }
}

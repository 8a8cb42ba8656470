#![allow(dead_code)]

use std::io::Write;
use std::sync::Once;

use jsondoc::{Parser, ParserState};
use tempfile::NamedTempFile;

static TRACING: Once = Once::new();

/// Routes parser traces to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Writes `contents` to a fresh `.json` file. Keep the handle alive while parsing.
pub fn json_file(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

/// Opens and parses `contents` from a file on disk.
pub fn parse_file(contents: &str) -> Parser {
    init_tracing();
    let file = json_file(contents.as_bytes());
    let mut parser = Parser::open(file.path());
    assert_eq!(parser.state(), ParserState::Open);
    parser.start();
    parser
}

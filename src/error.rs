// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! The error type returned by the parser.

use std::fmt;
use thiserror::Error;

use crate::ast::Span;

/// Maximum number of characters of source text quoted in an error.
const SNIPPET_LEN: usize = 20;

/// The reason a parse failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// A command was not closed by `*` (or an extended block by `%`).
    #[error("unterminated command: expected `*` or `%`, found {found}")]
    Unterminated { found: Found },
    /// A character that cannot start or continue any command.
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    /// A well-formed word or statement whose opcode is not in the command table.
    #[error("unrecognized opcode `{0}`")]
    UnknownOpcode(String),
    /// The numeral following an opcode letter is not a plain unsigned integer.
    #[error("malformed numeral in `{word}`: expected {expected}")]
    MalformedNumeral { word: String, expected: &'static str },
    /// The parameters of an extended command do not match its syntax.
    #[error("malformed `{command}` command: {message}")]
    MalformedCommand { command: &'static str, message: String },
}

/// What was found where a terminator was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    EndOfInput,
    Char(char),
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Found::EndOfInput => write!(f, "end of input"),
            Found::Char(ch) => write!(f, "{:?}", ch),
        }
    }
}

/// A syntax error with the position of the offending text.
///
/// Any `SyntaxError` means that the whole input was rejected: no nodes are
/// produced for a file that fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}line {line}, column {column}: {kind} (near '{snippet}')",
        .path.as_ref().map(|p| format!("{}: ", p)).unwrap_or_default())]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// Byte offset and length of the offending text.
    pub span: Span,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
    /// Source text starting at the error, cut at a newline.
    pub snippet: String,
    pub path: Option<String>,
}

impl SyntaxError {
    /// Create an error for the text covered by `span` in `input`.
    pub fn new(input: &str, span: Span, kind: SyntaxErrorKind) -> Self {
        let offset = span.offset.min(input.len());
        let (line, column) = pest::Position::new(input, offset)
            .map(|pos| pos.line_col())
            .unwrap_or((1, 1));
        let snippet = input.get(offset..).unwrap_or("").chars()
            .take_while(|&ch| ch != '\n' && ch != '\r')
            .take(SNIPPET_LEN)
            .collect();
        SyntaxError { kind, span, line, column, snippet, path: None }
    }

    /// Attach the name of the file the input came from.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn offset(&self) -> usize {
        self.span.offset
    }
}

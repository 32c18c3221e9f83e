//! Parser for [Ungrammar][1], a small language to describe the shape of
//! concrete syntax trees.
//!
//! The parser is error tolerant: it doesn't stop at the first error, but
//! recovers at the next rule definition and keeps going. A parse always
//! produces a [`Grammar`] with everything that could be parsed, together with
//! all errors found on the way.
//!
//! # Example
//!
//! ```
//! let input = "
//! Foo = Bar Baz
//! Baz = ( Kay Jay )* | 'id'";
//!
//! let (grammar, errors) = ungrammar::parse(input);
//! assert!(errors.is_empty());
//!
//! assert_eq!(grammar.get("Foo").unwrap().to_string(), "Seq(Bar, Baz)");
//! assert_eq!(
//!     grammar.get("Baz").unwrap().to_string(),
//!     "Alt(Rep(Seq(Kay, Jay)), 'id')"
//! );
//! ```
//!
//! [1]: https://rust-analyzer.github.io/blog/2020/10/24/introducing-ungrammar.html

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
mod print;

use std::path::Path;

pub use crate::{
    ast::{
        Grammar,
        Rule,
    },
    error::{
        ErrorList,
        ParseError,
    },
    lexer::Location,
    parser::Parser,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ErrorList),
}

/// Parses `source`, returning the grammar and all errors encountered.
pub fn parse(source: &str) -> (Grammar, ErrorList) {
    Parser::new(source).parse_grammar()
}

/// Parses `source`, failing if there were any errors.
pub fn try_parse(source: &str) -> Result<Grammar, ErrorList> {
    let (grammar, errors) = parse(source);
    errors.into_result(grammar)
}

/// Reads and parses an Ungrammar file, failing if there were any errors.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Grammar, Error> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading grammar");
    let source = std::fs::read_to_string(path)?;
    let grammar = try_parse(&source)?;
    Ok(grammar)
}

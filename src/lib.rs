//! zxml - depth-safe XML document parsing and tree manipulation
//!
//! Turns a character stream into an owned document tree and turns the tree
//! back into canonical text. Parsing, serialization, and the structural
//! algorithms (normalize, deep copy, traversal) are all iterative, so
//! pathologically deep documents grow heap-allocated stacks instead of
//! overflowing the native one.
//!
//! The accepted grammar is a permissive subset: ASCII name characters, the
//! five standard escapes, CDATA, comments, DOCTYPE and `<?...?>`
//! declarations treated as mostly opaque. Parsing is fail-fast; the first
//! malformed token aborts with a positioned error.
//!
//! # Quick Start
//!
//! ```
//! use zxml::parse_str;
//! # fn main() -> Result<(), zxml::Error> {
//! let doc = parse_str(r#"<greeting lang="en">hello</greeting>"#)?;
//! let root = doc.expect_root()?;
//! assert_eq!(root.tag, "greeting");
//! assert_eq!(root.expect_attribute("lang")?.value, "en");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result};

pub mod reader;
pub use reader::{BufferReader, CharSource, StreamReader};

pub mod lexer;
pub use lexer::{Lexer, Token};

pub mod document;
pub use document::{Attribute, Declaration, Document, Element, Node, RootSibling};

pub mod parser;
pub use parser::Parser;

pub mod tree;
pub use tree::{NodeRef, Stats};

pub mod serialize;
pub use serialize::escape;

use tracing::debug;

/// Parse an XML document from a fully buffered string.
pub fn parse_str(text: &str) -> Result<Document> {
    debug!(bytes = text.len(), "parsing buffered input");
    Parser::new(BufferReader::new(text)).parse()
}

/// Parse an XML document from an incremental character source.
///
/// The source is read once; lookahead is held in a small fixed ring buffer,
/// never a second copy of the document.
pub fn parse_iter<I>(source: I) -> Result<Document>
where
    I: Iterator<Item = char>,
{
    debug!("parsing incremental input");
    Parser::new(StreamReader::new(source)).parse()
}

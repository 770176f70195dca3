//! Error types for zxml

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    /// Consumed characters before this point
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    UnexpectedEndOfInput,
    InvalidEscapeSequence { entity: String },
    InvalidNameChar { ch: char },
    InvalidCloseToken,
    InvalidOpenToken,
    InvalidAttributeList,
    InvalidDeclarationClose,
    BadAttributeValueQuote { ch: char },
    UnclosedAttributeList,
    ClosingTagMismatch { open: String, close: String },
    MultipleRootElements,
    InvalidRootLevelToken,
    NodeNotFound { name: String },
    NodeTypeMismatch { expected: &'static str, found: &'static str },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
            Self::InvalidEscapeSequence { entity } => {
                write!(f, "invalid escape sequence: &{entity};")
            }
            Self::InvalidNameChar { ch } => write!(f, "invalid character in name: {ch:?}"),
            Self::InvalidCloseToken => write!(f, "invalid close token"),
            Self::InvalidOpenToken => write!(f, "invalid open token"),
            Self::InvalidAttributeList => write!(f, "invalid attribute list"),
            Self::InvalidDeclarationClose => write!(f, "declaration not closed with ?>"),
            Self::BadAttributeValueQuote { ch } => {
                write!(f, "attribute value must start with a quote, found {ch:?}")
            }
            Self::UnclosedAttributeList => write!(f, "unclosed attribute list"),
            Self::ClosingTagMismatch { open, close } => {
                write!(f, "closing tag </{close}> does not match <{open}>")
            }
            Self::MultipleRootElements => write!(f, "multiple root elements"),
            Self::InvalidRootLevelToken => write!(f, "invalid token at root level"),
            Self::NodeNotFound { name } => write!(f, "node not found: {name}"),
            Self::NodeTypeMismatch { expected, found } => {
                write!(f, "expected {expected} node, found {found}")
            }
        }
    }
}

/// Main error type for zxml
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    pos: Pos,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, pos: Pos) -> Self {
        let message = kind.to_string();
        Self { kind, pos, message }
    }

    pub fn with_message(kind: ErrorKind, pos: Pos, message: impl Into<String>) -> Self {
        Self {
            kind,
            pos,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        Self::new(kind, Pos::new(offset, line, col))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}: {}", self.pos, self.message)
    }
}

/// Result type alias for zxml
pub type Result<T> = std::result::Result<T, Error>;

//! Lexer turning reader output into the token vocabulary
//!
//! Two entry points mirror the two disambiguation grammars: `read_open_token`
//! decides what a `<` (or a run of text) means, `read_close_token` decides
//! how a tag or declaration ends. Escape decoding and CDATA handling happen
//! here, so the parser only ever sees decoded text.

pub mod token;

pub use token::Token;

use crate::error::{Error, ErrorKind, Pos, Result};
use crate::reader::CharSource;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Lexer over any character source, with position tracking.
#[derive(Debug)]
pub struct Lexer<S> {
    source: S,
    offset: usize,
    line: u32,
    col: u32,
}

impl<S: CharSource> Lexer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    /// Current position, updated on every consumed character.
    pub fn position(&self) -> Pos {
        Pos::new(self.offset, self.line, self.col)
    }

    fn peek(&mut self) -> Option<char> {
        self.source.peek(0)
    }

    fn pop(&mut self) -> Option<char> {
        let c = self.source.pop()?;
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    /// Non-consuming literal probe. Consumption goes through [`Self::pop`]
    /// so the position counters stay correct.
    fn looking_at(&mut self, literal: &str) -> bool {
        for (i, expected) in literal.chars().enumerate() {
            if self.source.peek(i) != Some(expected) {
                return false;
            }
        }
        true
    }

    fn accept(&mut self, literal: &str) -> bool {
        if !self.looking_at(literal) {
            return false;
        }
        for _ in literal.chars() {
            self.pop();
        }
        true
    }

    pub(crate) fn accept_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pop();
            true
        } else {
            false
        }
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pop();
        }
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::new(kind, self.position())
    }

    /// Read the next token at the top of a construct: comment, declaration,
    /// DOCTYPE, end tag, begin tag, raw text, or end of input.
    ///
    /// Text runs that trim to nothing are skipped, so callers never see an
    /// empty text token.
    pub fn read_open_token(&mut self) -> Result<Token> {
        loop {
            match self.peek() {
                None => return Ok(Token::Eof),
                Some('<') if !self.looking_at(CDATA_OPEN) => {
                    if self.accept("<!--") {
                        return Ok(Token::OpenComment);
                    }
                    if self.accept("<!DOCTYPE") {
                        return Ok(Token::OpenDocType);
                    }
                    if self.looking_at("<!") {
                        return Err(self.error(ErrorKind::InvalidOpenToken));
                    }
                    if self.accept("<?") {
                        return Ok(Token::OpenDeclaration);
                    }
                    if self.accept("</") {
                        return Ok(Token::OpenEndTag);
                    }
                    self.pop();
                    return Ok(Token::OpenBeginTag);
                }
                Some(_) => match self.read_text()? {
                    Token::Text(text) if text.is_empty() => continue,
                    token => return Ok(token),
                },
            }
        }
    }

    /// Read the token that ends a tag or declaration: `/>`, `?>`, or `>`.
    ///
    /// Returns `None` when the next character starts an attribute name
    /// instead, leaving it unconsumed.
    pub fn read_close_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error(ErrorKind::UnclosedAttributeList)),
            Some('>') => {
                self.pop();
                Ok(Some(Token::CloseEndTag))
            }
            Some('/') => {
                if self.accept("/>") {
                    Ok(Some(Token::CloseBeginTag))
                } else {
                    Err(self.error(ErrorKind::InvalidCloseToken))
                }
            }
            Some('?') => {
                if self.accept("?>") {
                    Ok(Some(Token::CloseDeclaration))
                } else {
                    Err(self.error(ErrorKind::InvalidCloseToken))
                }
            }
            Some(_) => Ok(None),
        }
    }

    /// Read a tag or attribute name.
    pub fn read_name(&mut self) -> Result<String> {
        let mut name = String::new();
        match self.peek() {
            None => return Err(self.error(ErrorKind::UnexpectedEndOfInput)),
            Some(c) if is_name_start(c) => {
                self.pop();
                name.push(c);
            }
            Some(c) => return Err(self.error(ErrorKind::InvalidNameChar { ch: c })),
        }
        loop {
            match self.peek() {
                None => break,
                Some(c) if is_name_char(c) => {
                    self.pop();
                    name.push(c);
                }
                Some(c) if is_name_terminator(c) => break,
                Some(c) => return Err(self.error(ErrorKind::InvalidNameChar { ch: c })),
            }
        }
        Ok(name)
    }

    /// Read a quoted attribute value, decoding escapes. Single and double
    /// quotes are accepted; open and close quote must match.
    pub fn read_attribute_value(&mut self) -> Result<String> {
        let quote = match self.peek() {
            None => return Err(self.error(ErrorKind::UnclosedAttributeList)),
            Some(c @ ('"' | '\'')) => {
                self.pop();
                c
            }
            Some(c) => return Err(self.error(ErrorKind::BadAttributeValueQuote { ch: c })),
        };
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error(ErrorKind::UnclosedAttributeList)),
                Some(c) if c == quote => {
                    self.pop();
                    return Ok(value);
                }
                Some('&') => value.push(self.read_escape()?),
                Some(c) => {
                    self.pop();
                    value.push(c);
                }
            }
        }
    }

    /// Read a comment body up to and excluding `-->`, trimmed at both ends.
    pub fn read_comment_body(&mut self) -> Result<String> {
        let start = self.position();
        let mut body = String::new();
        loop {
            if self.accept("-->") {
                return Ok(body.trim().to_string());
            }
            match self.peek() {
                Some(_) => {
                    if let Some(c) = self.pop() {
                        body.push(c);
                    }
                }
                None => return Err(Error::new(ErrorKind::UnexpectedEndOfInput, start)),
            }
        }
    }

    /// Read an opaque DOCTYPE body up to and excluding `>`, trimmed.
    pub fn read_doctype_body(&mut self) -> Result<String> {
        let start = self.position();
        let mut body = String::new();
        loop {
            match self.peek() {
                Some('>') => {
                    self.pop();
                    return Ok(body.trim().to_string());
                }
                Some(_) => {
                    if let Some(c) = self.pop() {
                        body.push(c);
                    }
                }
                None => return Err(Error::new(ErrorKind::UnexpectedEndOfInput, start)),
            }
        }
    }

    /// Accumulate a raw text run: decoded escapes, verbatim CDATA sections,
    /// stopping at a non-CDATA `<` or end of input. The whole run is trimmed
    /// at both ends; internal whitespace is preserved.
    fn read_text(&mut self) -> Result<Token> {
        let mut out = String::new();
        loop {
            match self.peek() {
                None => break,
                Some('<') => {
                    if self.looking_at(CDATA_OPEN) {
                        self.read_cdata_into(&mut out)?;
                    } else {
                        break;
                    }
                }
                Some('&') => out.push(self.read_escape()?),
                Some(c) => {
                    self.pop();
                    out.push(c);
                }
            }
        }
        Ok(Token::Text(out.trim().to_string()))
    }

    /// Copy a CDATA section verbatim, no escape decoding. A lone `]` not
    /// followed by `]>` is kept literally.
    fn read_cdata_into(&mut self, out: &mut String) -> Result<()> {
        let start = self.position();
        for _ in CDATA_OPEN.chars() {
            self.pop();
        }
        loop {
            if self.accept(CDATA_CLOSE) {
                return Ok(());
            }
            match self.peek() {
                Some(_) => {
                    if let Some(c) = self.pop() {
                        out.push(c);
                    }
                }
                None => return Err(Error::new(ErrorKind::UnexpectedEndOfInput, start)),
            }
        }
    }

    /// Decode one `&...;` escape. Exactly five entities are recognized.
    fn read_escape(&mut self) -> Result<char> {
        let start = self.position();
        self.pop(); // '&'
        let mut entity = String::new();
        loop {
            match self.peek() {
                Some(';') => {
                    self.pop();
                    break;
                }
                Some(c) if c.is_ascii_alphabetic() && entity.len() < 4 => {
                    self.pop();
                    entity.push(c);
                }
                _ => {
                    return Err(Error::new(
                        ErrorKind::InvalidEscapeSequence { entity },
                        start,
                    ))
                }
            }
        }
        match entity.as_str() {
            "quot" => Ok('"'),
            "apos" => Ok('\''),
            "lt" => Ok('<'),
            "gt" => Ok('>'),
            "amp" => Ok('&'),
            _ => Err(Error::new(
                ErrorKind::InvalidEscapeSequence { entity },
                start,
            )),
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == ':' || c == '_'
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-' || c == '.'
}

fn is_name_terminator(c: char) -> bool {
    c.is_ascii_whitespace() || matches!(c, '=' | '>' | '/' | '?')
}

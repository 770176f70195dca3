//! Tree builder: consumes tokens and builds the document tree
//!
//! Element parsing is iterative. The set of currently open elements lives in
//! an explicit heap-allocated stack, so native call-stack usage stays O(1)
//! no matter how deeply the input nests. Parsing is fail-fast: the first
//! malformed token aborts with an error and no partial tree is returned.

use tracing::trace;

use crate::document::{Attribute, Declaration, Document, Element, Node, RootSibling};
use crate::error::{Error, ErrorKind, Pos, Result};
use crate::lexer::{Lexer, Token};
use crate::reader::CharSource;

/// Parser over any character source.
#[derive(Debug)]
pub struct Parser<S> {
    lexer: Lexer<S>,
}

impl<S: CharSource> Parser<S> {
    pub fn new(source: S) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    /// Parse a whole document.
    ///
    /// DOCTYPE, declarations, and comments at document scope become root
    /// siblings; the first begin tag starts the single root element and a
    /// second one is an error. An input with no root element at all is a
    /// legal, empty document.
    pub fn parse(mut self) -> Result<Document> {
        let mut document = Document::new();
        loop {
            let token = self.lexer.read_open_token()?;
            trace!(token = token.describe(), "document-level token");
            match token {
                Token::Eof => break,
                Token::OpenDocType => {
                    let text = self.lexer.read_doctype_body()?;
                    document.push_sibling(RootSibling::DocType(text));
                }
                Token::OpenComment => {
                    let text = self.lexer.read_comment_body()?;
                    document.push_sibling(RootSibling::Comment(text));
                }
                Token::OpenDeclaration => {
                    let declaration = self.parse_declaration()?;
                    document.push_sibling(RootSibling::Declaration(declaration));
                }
                Token::OpenBeginTag => {
                    if document.root.is_some() {
                        return Err(self.error(ErrorKind::MultipleRootElements));
                    }
                    let root = self.parse_element_tree()?;
                    document.set_root(root);
                }
                Token::OpenEndTag | Token::Text(_) => {
                    return Err(self.error(ErrorKind::InvalidRootLevelToken));
                }
                Token::CloseDeclaration | Token::CloseBeginTag | Token::CloseEndTag => {
                    return Err(self.error(ErrorKind::InvalidRootLevelToken));
                }
            }
        }
        Ok(document)
    }

    /// Parse a `<?tag attrs?>` declaration; the open token is already
    /// consumed.
    fn parse_declaration(&mut self) -> Result<Declaration> {
        let tag = self.lexer.read_name()?;
        let (attrs, terminator) = self.parse_attribute_list()?;
        if terminator != Token::CloseDeclaration {
            return Err(self.error(ErrorKind::InvalidDeclarationClose));
        }
        Ok(Declaration { tag, attrs })
    }

    /// Parse an element subtree; the `<` of the first tag is already
    /// consumed.
    ///
    /// Open elements are kept on an explicit stack. A close tag must match
    /// the stack top exactly; popping the last entry finishes the subtree.
    fn parse_element_tree(&mut self) -> Result<Element> {
        let (first, self_closing) = self.parse_tag_header()?;
        if self_closing {
            return Ok(first);
        }

        let mut stack: Vec<Element> = vec![first];
        loop {
            match self.lexer.read_open_token()? {
                Token::OpenEndTag => {
                    let close = self.lexer.read_name()?;
                    let Some(finished) = stack.pop() else {
                        return Err(self.error(ErrorKind::InvalidRootLevelToken));
                    };
                    if close != finished.tag {
                        return Err(self.error(ErrorKind::ClosingTagMismatch {
                            open: finished.tag.clone(),
                            close,
                        }));
                    }
                    if self.lexer.read_close_token()? != Some(Token::CloseEndTag) {
                        return Err(self.error(ErrorKind::InvalidCloseToken));
                    }
                    match stack.last_mut() {
                        Some(parent) => {
                            parent.push_child(Node::Element(Box::new(finished)));
                        }
                        None => return Ok(finished),
                    }
                }
                Token::OpenBeginTag => {
                    let (child, self_closing) = self.parse_tag_header()?;
                    if self_closing {
                        top(&mut stack)?.push_child(Node::Element(Box::new(child)));
                    } else {
                        stack.push(child);
                    }
                }
                Token::OpenComment => {
                    let text = self.lexer.read_comment_body()?;
                    top(&mut stack)?.push_child(Node::Comment(text));
                }
                Token::Text(text) => {
                    top(&mut stack)?.push_child(Node::Text(text));
                }
                Token::Eof => return Err(self.error(ErrorKind::UnexpectedEndOfInput)),
                _ => return Err(self.error(ErrorKind::InvalidOpenToken)),
            }
        }
    }

    /// Parse a tag name and attribute list, returning the element shell and
    /// whether the tag was self-closing.
    fn parse_tag_header(&mut self) -> Result<(Element, bool)> {
        let tag = self.lexer.read_name()?;
        let (attrs, terminator) = self.parse_attribute_list()?;
        let element = Element::with_attrs(tag, attrs);
        match terminator {
            Token::CloseEndTag => Ok((element, false)),
            Token::CloseBeginTag => Ok((element, true)),
            _ => Err(self.error(ErrorKind::InvalidCloseToken)),
        }
    }

    /// Parse `name="value"` pairs until a close token ends the list. The
    /// terminator is returned so elements and declarations can interpret it
    /// themselves.
    fn parse_attribute_list(&mut self) -> Result<(Vec<Attribute>, Token)> {
        let mut attrs = Vec::new();
        loop {
            if let Some(terminator) = self.lexer.read_close_token()? {
                return Ok((attrs, terminator));
            }
            let name = self.lexer.read_name()?;
            self.lexer.skip_whitespace();
            if !self.lexer.accept_char('=') {
                return Err(self.error(ErrorKind::InvalidAttributeList));
            }
            self.lexer.skip_whitespace();
            let value = self.lexer.read_attribute_value()?;
            attrs.push(Attribute::new(name, value));
        }
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::new(kind, self.lexer.position())
    }
}

/// Top of the open-element stack. The stack is non-empty for as long as the
/// subtree loop runs; an empty stack here means the loop invariant broke.
fn top(stack: &mut [Element]) -> Result<&mut Element> {
    stack
        .last_mut()
        .ok_or_else(|| Error::new(ErrorKind::UnexpectedEndOfInput, Pos::default()))
}

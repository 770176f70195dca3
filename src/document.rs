//! XML document model
//!
//! Ownership is a strict tree: a `Document` owns its root siblings and root
//! element, every `Element` owns its attributes and children. There are no
//! back-references and nothing is shared, so exclusive mutation is always
//! local to the borrowed subtree.

use crate::error::{Error, ErrorKind, Pos, Result};

/// Attribute name/value pair.
///
/// No uniqueness is enforced; lookup returns the first match in document
/// order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Processing instruction before the root element, e.g. `<?xml version="1.0"?>`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
    pub tag: String,
    pub attrs: Vec<Attribute>,
}

impl Declaration {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    pub fn push_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attrs.push(Attribute::new(name, value));
        self
    }
}

/// A node inside an element's child list.
///
/// The `Element` variant holds a `Box`, so a present element can always be
/// dereferenced; there is no null state to check for.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Element(Box<Element>),
    Comment(String),
    Text(String),
}

impl Node {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Element(_) => "element",
            Self::Comment(_) => "comment",
            Self::Text(_) => "text",
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&str> {
        match self {
            Self::Comment(text) => Some(text),
            _ => None,
        }
    }

    /// Like [`Self::as_element`] but raises a node-type error on mismatch.
    pub fn expect_element(&self) -> Result<&Element> {
        self.as_element().ok_or_else(|| type_error("element", self.kind()))
    }

    pub fn expect_text(&self) -> Result<&str> {
        self.as_text().ok_or_else(|| type_error("text", self.kind()))
    }

    pub fn expect_comment(&self) -> Result<&str> {
        self.as_comment().ok_or_else(|| type_error("comment", self.kind()))
    }
}

/// Items allowed at document scope outside the root element.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RootSibling {
    Comment(String),
    Declaration(Declaration),
    DocType(String),
}

/// A tagged element with attributes and ordered children.
///
/// Equality, deep copy, and destruction are implemented with explicit
/// stacks below, like the parser and serializer: nesting depth must grow
/// heap usage, never native call-stack frames.
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn with_attrs(tag: String, attrs: Vec<Attribute>) -> Self {
        Self {
            tag,
            attrs,
            children: Vec::new(),
        }
    }

    pub fn push_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attrs.push(Attribute::new(name, value));
        self
    }

    pub fn push_child(&mut self, node: Node) -> &mut Self {
        self.children.push(node);
        self
    }

    pub fn push_element(&mut self, child: Element) -> &mut Self {
        self.children.push(Node::Element(Box::new(child)));
        self
    }

    pub fn push_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn push_comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.children.push(Node::Comment(text.into()));
        self
    }

    /// First attribute with the given name, in document order.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|attr| attr.name == name)
    }

    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attrs.iter_mut().find(|attr| attr.name == name)
    }

    /// Like [`Self::attribute`] but absence is an error.
    pub fn expect_attribute(&self, name: &str) -> Result<&Attribute> {
        self.attribute(name).ok_or_else(|| not_found(name))
    }

    /// First direct child element with the given tag.
    pub fn child_element(&self, tag: &str) -> Option<&Element> {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .find(|child| child.tag == tag)
    }

    pub fn child_element_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|child| child.tag == tag)
    }

    /// Like [`Self::child_element`] but absence is an error.
    pub fn expect_element(&self, tag: &str) -> Result<&Element> {
        self.child_element(tag).ok_or_else(|| not_found(tag))
    }

    /// Remove the first attribute with the given name. Returns whether one
    /// was removed.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        match self.attrs.iter().position(|attr| attr.name == name) {
            Some(index) => {
                self.attrs.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every attribute with the given name in a single compaction
    /// pass, preserving the relative order of survivors. Returns the removed
    /// count.
    pub fn remove_attributes(&mut self, name: &str) -> usize {
        let before = self.attrs.len();
        self.attrs.retain(|attr| attr.name != name);
        before - self.attrs.len()
    }

    /// Remove the first direct child element with the given tag.
    pub fn remove_child_element(&mut self, tag: &str) -> bool {
        let position = self
            .children
            .iter()
            .position(|node| matches!(node.as_element(), Some(child) if child.tag == tag));
        match position {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every direct child element with the given tag, preserving the
    /// relative order of remaining children. Returns the removed count.
    pub fn remove_child_elements(&mut self, tag: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node.as_element(), Some(child) if child.tag == tag));
        before - self.children.len()
    }
}

/// Tag and attributes only; children are compared by the stack walk.
fn shallow_eq(left: &Element, right: &Element) -> bool {
    left.tag == right.tag && left.attrs == right.attrs
}

fn shallow_copy(source: &Element) -> Element {
    Element {
        tag: source.tag.clone(),
        attrs: source.attrs.clone(),
        children: Vec::with_capacity(source.children.len()),
    }
}

impl PartialEq for Element {
    /// Structural, order-sensitive equality over an explicit stack of child
    /// slice pairs.
    fn eq(&self, other: &Self) -> bool {
        if !shallow_eq(self, other) {
            return false;
        }
        let mut stack: Vec<(&[Node], &[Node])> = vec![(&self.children, &other.children)];
        while let Some((left, right)) = stack.pop() {
            if left.len() != right.len() {
                return false;
            }
            for pair in left.iter().zip(right) {
                match pair {
                    (Node::Element(l), Node::Element(r)) => {
                        if !shallow_eq(l, r) {
                            return false;
                        }
                        stack.push((&l.children, &r.children));
                    }
                    (Node::Comment(l), Node::Comment(r)) | (Node::Text(l), Node::Text(r)) => {
                        if l != r {
                            return false;
                        }
                    }
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Eq for Element {}

impl Clone for Element {
    /// Deep copy over an explicit frame stack; a frame's finished copy moves
    /// into its parent once its children are exhausted.
    fn clone(&self) -> Self {
        struct Frame<'a> {
            source: &'a Element,
            next_child: usize,
            copy: Element,
        }
        let mut stack = vec![Frame {
            source: self,
            next_child: 0,
            copy: shallow_copy(self),
        }];
        loop {
            let Some(frame) = stack.last_mut() else {
                // the root frame returns from inside the loop
                return Self::default();
            };
            let source = frame.source;
            let index = frame.next_child;
            frame.next_child += 1;
            match source.children.get(index) {
                Some(Node::Element(nested)) => {
                    stack.push(Frame {
                        source: nested,
                        next_child: 0,
                        copy: shallow_copy(nested),
                    });
                }
                Some(Node::Comment(text)) => {
                    frame.copy.children.push(Node::Comment(text.clone()));
                }
                Some(Node::Text(text)) => {
                    frame.copy.children.push(Node::Text(text.clone()));
                }
                None => {
                    let Some(finished) = stack.pop() else {
                        return Self::default();
                    };
                    match stack.last_mut() {
                        Some(parent) => {
                            parent.copy.children.push(Node::Element(Box::new(finished.copy)));
                        }
                        None => return finished.copy,
                    }
                }
            }
        }
    }
}

impl Drop for Element {
    /// Descendants drain into a flat worklist, so each box is childless by
    /// the time its own drop glue runs.
    fn drop(&mut self) {
        let mut worklist = std::mem::take(&mut self.children);
        while let Some(node) = worklist.pop() {
            if let Node::Element(mut nested) = node {
                worklist.append(&mut nested.children);
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Element(left), Self::Element(right)) => left == right,
            (Self::Comment(left), Self::Comment(right)) => left == right,
            (Self::Text(left), Self::Text(right)) => left == right,
            _ => false,
        }
    }
}

impl Eq for Node {}

impl Clone for Node {
    fn clone(&self) -> Self {
        match self {
            Self::Element(element) => Self::Element(Box::new(element.as_ref().clone())),
            Self::Comment(text) => Self::Comment(text.clone()),
            Self::Text(text) => Self::Text(text.clone()),
        }
    }
}

/// An XML document: root siblings in order, then at most one root element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub children: Vec<RootSibling>,
    pub root: Option<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_sibling(&mut self, sibling: RootSibling) -> &mut Self {
        self.children.push(sibling);
        self
    }

    pub fn set_root(&mut self, root: Element) -> &mut Self {
        self.root = Some(root);
        self
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.root.as_mut()
    }

    /// Root element, or a node-not-found error for rootless documents.
    pub fn expect_root(&self) -> Result<&Element> {
        self.root.as_ref().ok_or_else(|| not_found("root element"))
    }
}

fn not_found(name: &str) -> Error {
    Error::new(
        ErrorKind::NodeNotFound {
            name: name.to_string(),
        },
        Pos::default(),
    )
}

fn type_error(expected: &'static str, found: &'static str) -> Error {
    Error::new(ErrorKind::NodeTypeMismatch { expected, found }, Pos::default())
}

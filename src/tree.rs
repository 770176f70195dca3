//! Structural algorithms over the document tree
//!
//! Everything that walks the tree here does so with an explicit stack, for
//! the same reason the parser does: nesting depth must grow heap usage, not
//! native call-stack usage.

use std::mem::size_of;

use crate::document::{Attribute, Declaration, Document, Element, Node, RootSibling};
use crate::error::{Error, ErrorKind, Pos, Result};

/// Borrowed view of a node, handed to [`Document::walk`] callbacks.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    DocType(&'a str),
    Declaration(&'a Declaration),
    Comment(&'a str),
    Text(&'a str),
    Element(&'a Element),
}

/// Node count and approximate memory footprint of a tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub node_count: usize,
    pub byte_estimate: usize,
}

impl Document {
    /// Pre-order traversal: every root sibling in order, then the root
    /// element subtree depth-first. An element is visited before its
    /// children.
    pub fn walk<F: FnMut(NodeRef<'_>)>(&self, mut visit: F) {
        for sibling in &self.children {
            match sibling {
                RootSibling::Comment(text) => visit(NodeRef::Comment(text)),
                RootSibling::Declaration(declaration) => {
                    visit(NodeRef::Declaration(declaration));
                }
                RootSibling::DocType(text) => visit(NodeRef::DocType(text)),
            }
        }
        let Some(root) = &self.root else { return };
        visit(NodeRef::Element(root));
        let mut stack: Vec<&Node> = Vec::new();
        push_children(&mut stack, root);
        while let Some(node) = stack.pop() {
            match node {
                Node::Element(element) => {
                    visit(NodeRef::Element(element));
                    push_children(&mut stack, element);
                }
                Node::Comment(text) => visit(NodeRef::Comment(text)),
                Node::Text(text) => visit(NodeRef::Text(text)),
            }
        }
    }

    /// Merge adjacent text children throughout the root subtree. Returns the
    /// number of nodes removed by merging; idempotent.
    pub fn normalize(&mut self) -> usize {
        self.root.as_mut().map_or(0, Element::normalize)
    }

    /// Node count plus an approximate byte footprint: structural overhead
    /// and stored string bytes per node.
    pub fn stats(&self) -> Stats {
        let mut stats = Stats::default();
        self.walk(|node| {
            stats.node_count += 1;
            stats.byte_estimate += match node {
                NodeRef::DocType(text) | NodeRef::Comment(text) | NodeRef::Text(text) => {
                    size_of::<Node>() + text.len()
                }
                NodeRef::Declaration(declaration) => {
                    size_of::<Declaration>()
                        + declaration.tag.len()
                        + attrs_bytes(&declaration.attrs)
                }
                NodeRef::Element(element) => {
                    size_of::<Element>() + element.tag.len() + attrs_bytes(&element.attrs)
                }
            };
        });
        stats
    }
}

fn push_children<'a>(stack: &mut Vec<&'a Node>, element: &'a Element) {
    // reversed so children pop in document order
    for child in element.children.iter().rev() {
        stack.push(child);
    }
}

fn attrs_bytes(attrs: &[Attribute]) -> usize {
    attrs
        .iter()
        .map(|attr| size_of::<Attribute>() + attr.name.len() + attr.value.len())
        .sum()
}

impl Element {
    /// Merge every maximal run of adjacent text children into one text node,
    /// at every depth. Non-text siblings and element structure are left
    /// untouched. Returns the number of nodes removed; idempotent.
    pub fn normalize(&mut self) -> usize {
        let mut removed = 0;
        let mut stack: Vec<&mut Element> = vec![self];
        while let Some(element) = stack.pop() {
            removed += merge_adjacent_text(&mut element.children);
            for child in element.children.iter_mut() {
                if let Node::Element(nested) = child {
                    stack.push(nested.as_mut());
                }
            }
        }
        removed
    }

    /// Replace this element's content with a copy of `source`'s.
    ///
    /// The copy is fully materialized before the destination is touched, so
    /// nothing the read side depends on is freed mid-assignment.
    pub fn assign(&mut self, source: &Element) {
        let tag = source.tag.clone();
        let attrs = source.attrs.clone();
        let children = source.children.clone();
        self.tag = tag;
        self.attrs = attrs;
        self.children = children;
    }

    /// Replace this element's content with a copy of the descendant reached
    /// by following `path` (child indices, one per level). The empty path is
    /// self-assignment and leaves the element unchanged.
    ///
    /// This covers the aliasing case [`Self::assign`] cannot express under
    /// borrowing rules: source inside destination. The descendant is cloned
    /// in full before the ancestor is overwritten.
    pub fn assign_from_descendant(&mut self, path: &[usize]) -> Result<()> {
        let copy = {
            let mut current: &Element = self;
            for &index in path {
                let node = current.children.get(index).ok_or_else(|| {
                    Error::new(
                        ErrorKind::NodeNotFound {
                            name: format!("child #{index}"),
                        },
                        Pos::default(),
                    )
                })?;
                current = node.expect_element()?;
            }
            current.clone()
        };
        *self = copy;
        Ok(())
    }
}

fn merge_adjacent_text(children: &mut Vec<Node>) -> usize {
    let before = children.len();
    let mut merged: Vec<Node> = Vec::with_capacity(before);
    for node in std::mem::take(children) {
        match (merged.last_mut(), node) {
            (Some(Node::Text(run)), Node::Text(text)) => run.push_str(&text),
            (_, node) => merged.push(node),
        }
    }
    *children = merged;
    before - children.len()
}

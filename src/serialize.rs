//! Canonical text emission
//!
//! The inverse of parsing, with the same depth discipline: element subtrees
//! are emitted with an explicit frame stack, one child per loop iteration.
//! Escaping is the exact inverse of the lexer's decode table. Elements are
//! always written with explicit open and close tags, never the self-closing
//! shorthand, and parts are separated by single spaces.

use std::fmt;

use crate::document::{Attribute, Declaration, Document, Element, Node, RootSibling};

/// Escape character data for attribute values and text content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
    out
}

struct Frame<'a> {
    element: &'a Element,
    next_child: usize,
}

fn write_attrs(out: &mut String, attrs: &[Attribute]) {
    for attr in attrs {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape(&attr.value));
        out.push('"');
    }
}

fn write_open_tag(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.tag);
    write_attrs(out, &element.attrs);
    out.push('>');
}

fn write_comment(out: &mut String, text: &str) {
    out.push_str("<!-- ");
    out.push_str(text);
    out.push_str(" -->");
}

fn write_element(out: &mut String, root: &Element) {
    write_open_tag(out, root);
    let mut stack = vec![Frame {
        element: root,
        next_child: 0,
    }];
    while let Some(frame) = stack.last_mut() {
        let element = frame.element;
        let index = frame.next_child;
        frame.next_child += 1;
        match element.children.get(index) {
            None => {
                // children exhausted, close and pop
                if !element.children.is_empty() {
                    out.push(' ');
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
                stack.pop();
            }
            Some(child) => {
                out.push(' ');
                match child {
                    Node::Text(text) => out.push_str(&escape(text)),
                    Node::Comment(text) => write_comment(out, text),
                    Node::Element(nested) => {
                        write_open_tag(out, nested);
                        stack.push(Frame {
                            element: nested,
                            next_child: 0,
                        });
                    }
                }
            }
        }
    }
}

impl Element {
    /// Canonical text for this subtree.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, self);
        out
    }
}

impl Declaration {
    pub fn serialize(&self) -> String {
        let mut out = String::from("<?");
        out.push_str(&self.tag);
        write_attrs(&mut out, &self.attrs);
        out.push_str("?>");
        out
    }
}

impl Document {
    /// Canonical text for the whole document: root siblings in literal form,
    /// then the root element, joined by single spaces.
    pub fn serialize(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.children.len() + 1);
        for sibling in &self.children {
            parts.push(match sibling {
                RootSibling::Comment(text) => {
                    let mut out = String::new();
                    write_comment(&mut out, text);
                    out
                }
                RootSibling::Declaration(declaration) => declaration.serialize(),
                RootSibling::DocType(text) => format!("<!DOCTYPE {text}>"),
            });
        }
        if let Some(root) = &self.root {
            parts.push(root.serialize());
        }
        parts.join(" ")
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_table() {
        assert_eq!(escape("\" ' < > &"), "&quot; &apos; &lt; &gt; &amp;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_childless_element() {
        assert_eq!(Element::new("Name").serialize(), "<Name></Name>");
    }

    #[test]
    fn test_attributes_and_children() {
        let mut element = Element::new("Test");
        element
            .push_attribute("TestId", "0001")
            .push_comment("note")
            .push_element(Element::new("Name"));
        assert_eq!(
            element.serialize(),
            "<Test TestId=\"0001\"> <!-- note --> <Name></Name> </Test>"
        );
    }

    #[test]
    fn test_attribute_value_escaped() {
        let mut element = Element::new("a");
        element.push_attribute("v", "x<y>&");
        assert_eq!(element.serialize(), "<a v=\"x&lt;y&gt;&amp;\"></a>");
    }

    #[test]
    fn test_never_self_closing() {
        let mut element = Element::new("a");
        element.push_element(Element::new("b"));
        assert_eq!(element.serialize(), "<a> <b></b> </a>");
    }

    #[test]
    fn test_document_parts() {
        let mut doc = Document::new();
        let mut declaration = Declaration::new("xml");
        declaration.push_attribute("version", "1.0");
        doc.push_sibling(RootSibling::Declaration(declaration))
            .push_sibling(RootSibling::DocType("note".to_string()))
            .push_sibling(RootSibling::Comment("header".to_string()))
            .set_root(Element::new("root"));
        assert_eq!(
            doc.serialize(),
            "<?xml version=\"1.0\"?> <!DOCTYPE note> <!-- header --> <root></root>"
        );
    }

    #[test]
    fn test_display_delegates() {
        let doc = Document::new();
        assert_eq!(doc.to_string(), "");
        assert_eq!(Element::new("x").to_string(), "<x></x>");
    }
}

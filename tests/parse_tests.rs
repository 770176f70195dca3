//! End-to-end parsing tests covering the grammar, escapes, CDATA, root
//! siblings, and the error taxonomy.

use zxml::{parse_iter, parse_str, ErrorKind, Node, RootSibling};

#[test]
fn parses_attributes_comment_and_nested_element() {
    let input = r#"<Test TestId="0001" TestType="CMD"><!-- This is a comment --><Name></Name></Test>"#;
    let doc = parse_str(input).expect("valid input");
    let root = doc.expect_root().expect("root element");

    assert_eq!(root.tag, "Test");
    assert_eq!(root.attrs.len(), 2);
    assert_eq!(root.expect_attribute("TestId").unwrap().value, "0001");
    assert_eq!(root.expect_attribute("TestType").unwrap().value, "CMD");

    assert_eq!(root.children.len(), 2);
    assert_eq!(root.children[0].as_comment(), Some("This is a comment"));
    let name = root.children[1].expect_element().expect("element child");
    assert_eq!(name.tag, "Name");
    assert!(name.children.is_empty());
}

#[test]
fn decodes_escapes_in_attributes_and_text() {
    let input = r#"<Test name="&quot; &apos; &lt; &gt; &amp;"> &quot; &apos; &lt; &gt; &amp; </Test>"#;
    let doc = parse_str(input).expect("valid input");
    let root = doc.expect_root().unwrap();

    assert_eq!(root.expect_attribute("name").unwrap().value, "\" ' < > &");
    assert_eq!(root.children[0].as_text(), Some("\" ' < > &"));

    // serializing reproduces the escaped literal form
    assert_eq!(doc.serialize(), input);
}

#[test]
fn cdata_is_verbatim() {
    let input = "<description><![CDATA[<html> <html/>]]></description>";
    let doc = parse_str(input).expect("valid input");
    let root = doc.expect_root().unwrap();
    assert_eq!(root.children[0].as_text(), Some("<html> <html/>"));
}

#[test]
fn cdata_mixed_with_text_and_escapes() {
    let input = "<d>before <![CDATA[&amp; ] ]]> after</d>";
    let doc = parse_str(input).expect("valid input");
    let root = doc.expect_root().unwrap();
    assert_eq!(root.children[0].as_text(), Some("before &amp; ]  after"));
}

#[test]
fn closing_tag_mismatch_is_an_error() {
    let err = parse_str("<Test> <Name/> </Test1>").unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::ClosingTagMismatch {
            open: "Test".to_string(),
            close: "Test1".to_string(),
        }
    );
}

#[test]
fn second_root_element_is_an_error() {
    let err = parse_str("<Test> </Test> <Test1> </Test>").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::MultipleRootElements);
}

#[test]
fn unterminated_input_is_an_error() {
    let err = parse_str(r#"<Test TestId="0001"> <Name/>"#).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnexpectedEndOfInput);
}

#[test]
fn declaration_becomes_root_sibling() {
    let input = r#"<?xml version="1.0" encoding="UTF-8"?><root/>"#;
    let doc = parse_str(input).expect("valid input");
    assert_eq!(doc.children.len(), 1);
    match &doc.children[0] {
        RootSibling::Declaration(declaration) => {
            assert_eq!(declaration.tag, "xml");
            assert_eq!(declaration.attrs.len(), 2);
            assert_eq!(declaration.attrs[0].name, "version");
            assert_eq!(declaration.attrs[1].value, "UTF-8");
        }
        other => panic!("expected declaration, got {other:?}"),
    }
    assert_eq!(doc.expect_root().unwrap().tag, "root");
}

#[test]
fn doctype_and_comment_become_root_siblings() {
    let input = r#"<!DOCTYPE note SYSTEM "note.dtd"> <!-- header --> <note/>"#;
    let doc = parse_str(input).expect("valid input");
    assert_eq!(
        doc.children,
        vec![
            RootSibling::DocType("note SYSTEM \"note.dtd\"".to_string()),
            RootSibling::Comment("header".to_string()),
        ]
    );
}

#[test]
fn declaration_must_close_with_question_mark() {
    let err = parse_str(r#"<?xml version="1.0"><root/>"#).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidDeclarationClose);
}

#[test]
fn empty_document_is_legal() {
    let doc = parse_str("").expect("empty input");
    assert!(doc.root.is_none());
    assert!(doc.children.is_empty());
    let doc = parse_str("   \n  ").expect("whitespace input");
    assert!(doc.root.is_none());
}

#[test]
fn text_at_root_level_is_an_error() {
    let err = parse_str("stray text <root/>").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidRootLevelToken);
}

#[test]
fn end_tag_at_root_level_is_an_error() {
    let err = parse_str("</root>").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidRootLevelToken);
}

#[test]
fn missing_equals_is_an_error() {
    let err = parse_str("<a b></a>").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidAttributeList);
}

#[test]
fn unquoted_attribute_value_is_an_error() {
    let err = parse_str("<a b=c></a>").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::BadAttributeValueQuote { ch: 'c' });
}

#[test]
fn unterminated_attribute_value_is_an_error() {
    let err = parse_str(r#"<a b="c"#).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnclosedAttributeList);
}

#[test]
fn invalid_escape_is_an_error() {
    let err = parse_str("<a>&nbsp;</a>").unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::InvalidEscapeSequence {
            entity: "nbsp".to_string()
        }
    );
}

#[test]
fn invalid_name_character_reports_position() {
    let err = parse_str("<root>\n<ta*g/></root>").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidNameChar { ch: '*' });
    assert_eq!(err.pos().line, 2);
    assert_eq!(err.pos().col, 4);
}

#[test]
fn bang_without_known_construct_is_an_error() {
    let err = parse_str("<!ELEMENT note>").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidOpenToken);
}

#[test]
fn self_closing_child_keeps_attributes() {
    let doc = parse_str(r#"<a><b k="v"/></a>"#).expect("valid input");
    let root = doc.expect_root().unwrap();
    let child = root.child_element("b").expect("child b");
    assert_eq!(child.expect_attribute("k").unwrap().value, "v");
    assert!(child.children.is_empty());
}

#[test]
fn whitespace_inside_tags_is_tolerated() {
    let doc = parse_str("<a  k = 'v' ><b />\n</a >").expect("valid input");
    let root = doc.expect_root().unwrap();
    assert_eq!(root.expect_attribute("k").unwrap().value, "v");
    assert!(root.child_element("b").is_some());
}

#[test]
fn comment_after_root_is_allowed() {
    let doc = parse_str("<a></a> <!-- trailer -->").expect("valid input");
    assert_eq!(
        doc.children,
        vec![RootSibling::Comment("trailer".to_string())]
    );
}

#[test]
fn text_whitespace_is_trimmed_but_internal_kept() {
    let doc = parse_str("<a>  one  two  </a>").expect("valid input");
    let root = doc.expect_root().unwrap();
    assert_eq!(root.children[0].as_text(), Some("one  two"));
}

#[test]
fn mixed_content_order_is_preserved() {
    let doc = parse_str("<a>x<b/>y<!-- c -->z</a>").expect("valid input");
    let root = doc.expect_root().unwrap();
    let kinds: Vec<&str> = root.children.iter().map(Node::kind).collect();
    assert_eq!(kinds, vec!["text", "element", "text", "comment", "text"]);
}

const DEPTH: usize = 50_000;

fn deeply_nested_input() -> String {
    let mut input = String::with_capacity(DEPTH * 8);
    for _ in 0..DEPTH {
        input.push_str("<a>");
    }
    input.push_str("leaf");
    for _ in 0..DEPTH {
        input.push_str("</a>");
    }
    input
}

#[test]
fn deeply_nested_document_does_not_overflow() {
    let input = deeply_nested_input();
    let mut doc = parse_str(&input).expect("deep input");

    // the structural algorithms and the serializer must be depth-safe too
    assert_eq!(doc.normalize(), 0);
    let stats = doc.stats();
    assert_eq!(stats.node_count, DEPTH + 1);
    let text = doc.serialize();
    assert!(text.starts_with("<a> <a>"));
    assert!(text.ends_with("</a> </a>"));
    let reparsed = parse_str(&text).expect("reparse");
    assert_eq!(reparsed, doc);
}

#[test]
fn deeply_nested_copy_compare_and_drop() {
    // equality, deep copy, and destruction walk the same depths the parser
    // does and must stay off the native call stack as well
    let input = deeply_nested_input();
    let doc = parse_str(&input).expect("deep input");
    let copy = doc.clone();
    assert_eq!(copy, doc);

    let mut modified = doc.clone();
    if let Some(root) = modified.root_mut() {
        root.push_text("tail");
    }
    assert_ne!(modified, doc);

    drop(modified);
    drop(copy);
    drop(doc);
}

#[test]
fn buffered_and_streamed_parses_agree() {
    let input = r#"<?xml version="1.0"?><Test a="1"><!-- c --><b>t &amp; u</b></Test>"#;
    let buffered = parse_str(input);
    let streamed = parse_iter(input.chars());
    assert_eq!(buffered, streamed);
}

#[test]
fn streamed_parse_reports_same_errors() {
    let input = "<Test> <Name/> </Test1>";
    assert_eq!(parse_str(input), parse_iter(input.chars()));
}

#[test]
fn reparse_of_serialized_form_is_fixed_point() {
    let input = "<a>один<б/></a>"; // non-ASCII text is fine, names are ASCII
    assert!(parse_str(input).is_err()); // non-ASCII tag rejected

    let input = r#"<Test TestId="0001"><!-- c --><Name>v &lt; w</Name></Test>"#;
    let first = parse_str(input).expect("valid input");
    let second = parse_str(&first.serialize()).expect("serialized form");
    assert_eq!(first, second);
    // one round of serialization is a fixed point
    assert_eq!(second.serialize(), first.serialize());
}

//! Edge case tests for genma-html
//!
//! Malformed and unusual markup.

use genma_html::{get_inner_html, parse, parse_fragment};
use genma_dom::DomTree;

#[test]
fn test_parse_empty() {
    let doc = parse("");
    assert!(doc.body().is_valid());
    assert_eq!(get_inner_html(doc.tree(), doc.body()), "");
}

#[test]
fn test_parse_only_whitespace() {
    let doc = parse("   \t\n\r\n   ");
    assert!(doc.tree().child_ids(doc.body()).is_empty());
}

#[test]
fn test_parse_unclosed_tags() {
    let doc = parse("<div><p><span>text");
    assert_eq!(get_inner_html(doc.tree(), doc.body()), "<div><p><span>text</span></p></div>");
}

#[test]
fn test_parse_orphan_closing_tag() {
    let doc = parse("</div>");
    assert!(doc.tree().child_ids(doc.body()).is_empty());
}

#[test]
fn test_fragment_empty() {
    let mut tree = DomTree::new();
    assert!(parse_fragment(&mut tree, "").is_empty());
}

#[test]
fn test_fragment_unbalanced() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment(&mut tree, "<b>bold<i>both</b>");
    assert!(!nodes.is_empty());
    assert_eq!(tree.tag_name(nodes[0]), Some("b"));
}

#[test]
fn test_comment_serialized() {
    let doc = parse("<div id='d'><!-- note --></div>");
    let div = doc.get_element_by_id("d").unwrap();
    assert_eq!(get_inner_html(doc.tree(), div), "<!-- note -->");
}

#[test]
fn test_void_element_children_ignored() {
    let doc = parse("<br>text");
    assert_eq!(get_inner_html(doc.tree(), doc.body()), "<br>text");
}

#[test]
fn test_unicode_text() {
    let doc = parse("<p id='p'>日本語 🎉</p>");
    let p = doc.get_element_by_id("p").unwrap();
    assert_eq!(doc.tree().text_content(p).as_deref(), Some("日本語 🎉"));
}

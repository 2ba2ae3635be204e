//! Edge case tests for genma-css

use genma_css::{parse_selector, query_all, state, CssError, InlineStyle};
use genma_dom::NodeId;
use genma_html::parse;

#[test]
fn test_invalid_selectors() {
    for bad in ["", "  ", "div >", ">", "[", "[data-id=", "a,", ".", "#1x y >", "li::marker", ":nth-child()"] {
        let err = parse_selector(bad).unwrap_err();
        assert!(matches!(err, CssError::InvalidSelector { .. }), "{bad:?}");
    }
}

#[test]
fn test_whitespace_around_selector() {
    let doc = parse("<p class='a'></p>");
    let list = parse_selector("  p.a  ").unwrap();
    assert_eq!(query_all(&doc, NodeId::ROOT, &list).len(), 1);
}

#[test]
fn test_escaped_identifier() {
    let doc = parse(r#"<p id="a:b"></p>"#);
    let list = parse_selector(r"#a\:b").unwrap();
    assert_eq!(query_all(&doc, NodeId::ROOT, &list).len(), 1);
}

#[test]
fn test_quoted_attribute_with_comma() {
    let doc = parse(r#"<p title="a, b"></p><p title="c"></p>"#);
    let list = parse_selector(r#"[title="a, b"], [title=c]"#).unwrap();
    assert_eq!(query_all(&doc, NodeId::ROOT, &list).len(), 2);
}

#[test]
fn test_hover_never_matches() {
    let doc = parse("<a href='#'>x</a>");
    let list = parse_selector("a:hover").unwrap();
    assert!(query_all(&doc, NodeId::ROOT, &list).is_empty());
}

#[test]
fn test_detached_elements_not_visible() {
    let mut doc = parse("<div id='d'></div>");
    let d = doc.get_element_by_id("d").unwrap();
    assert!(state::is_visible(&doc, d));
    doc.tree.detach(d);
    assert!(!state::is_visible(&doc, d));
}

#[test]
fn test_hidden_markup() {
    let doc = parse(r#"<div hidden><span id="s"></span></div><input id="h" type="hidden">"#);
    let s = doc.get_element_by_id("s").unwrap();
    let h = doc.get_element_by_id("h").unwrap();
    assert!(state::is_hidden(&doc, s));
    assert!(state::is_hidden(&doc, h));
}

#[test]
fn test_empty_style_attribute() {
    let style = InlineStyle::parse_lenient("");
    assert!(style.is_empty());
    assert_eq!(style.to_css_text(), "");
}

#[test]
fn test_custom_property_kept() {
    let mut style = InlineStyle::new();
    style.set("--accentColor", "teal");
    assert_eq!(style.get("--accentColor"), Some("teal"));
    assert_eq!(style.to_css_text(), "--accentColor: teal;");
}

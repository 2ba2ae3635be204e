//! Element states
//!
//! The live states behind the state pseudo-classes. They read the document
//! as it is now, so a property write is visible to the next check.

use genma_dom::{properties, Document, NodeId};

use crate::style::InlineStyle;

/// Elements that can be disabled
const DISABLEABLE: &[&str] = &["button", "input", "select", "textarea", "optgroup", "option", "fieldset"];

/// Form-associated elements for `:optional`
const FORM_CONTROLS: &[&str] = &["input", "select", "textarea"];

/// Elements that never render a box
const NON_RENDERED: &[&str] = &[
    "head", "script", "style", "template", "meta", "link", "title", "base", "noscript",
];

pub fn is_form_control(document: &Document, element: NodeId) -> bool {
    document.tree().tag_name(element).is_some_and(|t| FORM_CONTROLS.contains(&t))
}

/// `:disabled`
pub fn is_disabled(document: &Document, element: NodeId) -> bool {
    let tree = document.tree();
    let Some(tag) = tree.tag_name(element) else {
        return false;
    };
    if !DISABLEABLE.contains(&tag) {
        return false;
    }
    if tree.has_attribute(element, "disabled") {
        return true;
    }

    match tag {
        "option" => tree.get(element)
            .map(|n| n.parent)
            .is_some_and(|p| tree.tag_name(p) == Some("optgroup") && tree.has_attribute(p, "disabled")),
        "optgroup" => false,
        _ => disabled_by_fieldset(document, element),
    }
}

/// Inside a disabled fieldset, unless within that fieldset's first legend
fn disabled_by_fieldset(document: &Document, element: NodeId) -> bool {
    let tree = document.tree();
    let mut child = element;
    for ancestor in tree.ancestors(element) {
        if tree.tag_name(ancestor) == Some("fieldset") && tree.has_attribute(ancestor, "disabled") {
            let first_legend = tree.element_children(ancestor)
                .find(|&c| tree.tag_name(c) == Some("legend"));
            if first_legend != Some(child) {
                return true;
            }
        }
        child = ancestor;
    }
    false
}

/// `:enabled`
pub fn is_enabled(document: &Document, element: NodeId) -> bool {
    document.tree().tag_name(element).is_some_and(|t| DISABLEABLE.contains(&t))
        && !is_disabled(document, element)
}

/// `:checked`: checked checkboxes and radios, selected options
pub fn is_checked(document: &Document, element: NodeId) -> bool {
    let tree = document.tree();
    match tree.tag_name(element) {
        Some("input") => {
            let toggle = tree.get_attribute(element, "type")
                .is_some_and(|t| t.eq_ignore_ascii_case("checkbox") || t.eq_ignore_ascii_case("radio"));
            toggle && properties::checkedness(tree, element)
        }
        Some("option") => properties::selectedness(tree, element),
        _ => false,
    }
}

/// `:empty`: no element or text children
pub fn is_empty(document: &Document, element: NodeId) -> bool {
    document.tree()
        .children(element)
        .all(|(_, node)| !node.is_element() && !node.is_text())
}

/// `:focus`
pub fn is_focused(document: &Document, element: NodeId) -> bool {
    document.focused == Some(element)
}

/// `:link`: `<a>` and `<area>` with an href
pub fn is_link(document: &Document, element: NodeId) -> bool {
    let tree = document.tree();
    matches!(tree.tag_name(element), Some("a" | "area")) && tree.has_attribute(element, "href")
}

/// `:read-write`: editable text controls and contenteditable elements
pub fn is_writable(document: &Document, element: NodeId) -> bool {
    let tree = document.tree();
    match tree.tag_name(element) {
        Some("textarea") => !tree.has_attribute(element, "readonly") && !is_disabled(document, element),
        Some("input") => {
            let kind = tree.get_attribute(element, "type").unwrap_or("text").to_ascii_lowercase();
            let textual = !matches!(
                kind.as_str(),
                "checkbox" | "radio" | "button" | "submit" | "reset" | "image" | "file" | "hidden" | "range" | "color"
            );
            textual && !tree.has_attribute(element, "readonly") && !is_disabled(document, element)
        }
        Some(_) => tree.get_attribute(element, "contenteditable")
            .is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true")),
        None => false,
    }
}

/// Whether the element itself hides its box
fn hides_self(document: &Document, element: NodeId) -> bool {
    let tree = document.tree();
    let Some(tag) = tree.tag_name(element) else {
        return false;
    };
    if NON_RENDERED.contains(&tag) || tree.has_attribute(element, "hidden") {
        return true;
    }
    if tag == "input" && tree.get_attribute(element, "type").is_some_and(|t| t.eq_ignore_ascii_case("hidden")) {
        return true;
    }
    InlineStyle::from_element(document.tree(), element)
        .get("display")
        .is_some_and(|d| d.trim().eq_ignore_ascii_case("none"))
}

/// `:visible`: connected, and neither the element nor an ancestor element
/// hides its box. Without layout, visibility is decided from markup and
/// inline styles alone.
pub fn is_visible(document: &Document, element: NodeId) -> bool {
    let tree = document.tree();
    if !tree.get(element).is_some_and(|n| n.is_element()) || !tree.is_connected(element) {
        return false;
    }
    if hides_self(document, element) {
        return false;
    }
    !tree.ancestors(element).any(|a| hides_self(document, a))
}

/// `:hidden`
pub fn is_hidden(document: &Document, element: NodeId) -> bool {
    document.tree().get(element).is_some_and(|n| n.is_element()) && !is_visible(document, element)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(tag: &str) -> (Document, NodeId) {
        let mut doc = Document::default();
        let el = doc.tree.create_element(tag);
        let body = doc.body();
        doc.tree.append_child(body, el).unwrap();
        (doc, el)
    }

    #[test]
    fn test_disabled_attribute() {
        let (mut doc, input) = doc_with("input");
        assert!(is_enabled(&doc, input));
        doc.tree.set_attribute(input, "disabled", "").unwrap();
        assert!(is_disabled(&doc, input));
        assert!(!is_enabled(&doc, input));
    }

    #[test]
    fn test_div_is_neither_enabled_nor_disabled() {
        let (mut doc, div) = doc_with("div");
        doc.tree.set_attribute(div, "disabled", "").unwrap();
        assert!(!is_disabled(&doc, div));
        assert!(!is_enabled(&doc, div));
    }

    #[test]
    fn test_disabled_fieldset() {
        let (mut doc, fieldset) = doc_with("fieldset");
        let legend = doc.tree.create_element("legend");
        let in_legend = doc.tree.create_element("button");
        let button = doc.tree.create_element("button");
        doc.tree.append_child(fieldset, legend).unwrap();
        doc.tree.append_child(legend, in_legend).unwrap();
        doc.tree.append_child(fieldset, button).unwrap();
        doc.tree.set_attribute(fieldset, "disabled", "").unwrap();

        assert!(is_disabled(&doc, button));
        assert!(!is_disabled(&doc, in_legend));
    }

    #[test]
    fn test_checked_tracks_property() {
        let (mut doc, input) = doc_with("input");
        doc.tree.set_attribute(input, "type", "checkbox").unwrap();
        assert!(!is_checked(&doc, input));
        properties::set_property(&mut doc.tree, input, "checked", true.into()).unwrap();
        assert!(is_checked(&doc, input));
    }

    #[test]
    fn test_visibility() {
        let (mut doc, div) = doc_with("div");
        let span = doc.tree.create_element("span");
        doc.tree.append_child(div, span).unwrap();
        assert!(is_visible(&doc, span));

        doc.tree.set_attribute(div, "style", "display: none").unwrap();
        assert!(!is_visible(&doc, span));
        assert!(is_hidden(&doc, span));

        doc.tree.remove_attribute(div, "style").unwrap();
        doc.tree.detach(div);
        assert!(!is_visible(&doc, span));
    }

    #[test]
    fn test_empty_ignores_comments() {
        let (mut doc, div) = doc_with("div");
        let comment = doc.tree.create_comment("note");
        doc.tree.append_child(div, comment).unwrap();
        assert!(is_empty(&doc, div));
        let text = doc.tree.create_text("x");
        doc.tree.append_child(div, text).unwrap();
        assert!(!is_empty(&doc, div));
    }
}

//! HTML Serialization (innerHTML/outerHTML)
//!
//! Attributes are always written double-quoted, void elements get no end
//! tag, and the text of raw-text elements is written unescaped.

use genma_dom::{DomTree, ElementData, NodeData, NodeId};

/// HTML serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSerializer;

/// Void elements (no end tag)
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext"];

/// Where escaped text ends up
#[derive(Clone, Copy, PartialEq, Eq)]
enum Context {
    Text,
    Attribute,
}

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Markup of the node's children
    pub fn serialize_inner(&self, tree: &DomTree, id: NodeId) -> String {
        let mut out = String::new();
        for child in tree.child_ids(id) {
            self.write_node(tree, child, &mut out);
        }
        out
    }

    /// Markup of the node itself and its subtree
    pub fn serialize_outer(&self, tree: &DomTree, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(tree, id, &mut out);
        out
    }

    fn write_node(&self, tree: &DomTree, id: NodeId, out: &mut String) {
        let Some(node) = tree.get(id) else {
            return;
        };

        match &node.data {
            NodeData::Document => {
                for child in tree.child_ids(id) {
                    self.write_node(tree, child, out);
                }
            }
            NodeData::Element(element) => self.write_element(tree, id, element, out),
            NodeData::Text(text) => escape_into(&text.content, Context::Text, out),
            NodeData::Comment(comment) => {
                out.push_str(&format!("<!--{comment}-->"));
            }
            NodeData::Doctype { name } => {
                out.push_str(&format!("<!DOCTYPE {name}>"));
            }
        }
    }

    fn write_element(&self, tree: &DomTree, id: NodeId, element: &ElementData, out: &mut String) {
        let tag = tree.resolve(element.name);

        out.push('<');
        out.push_str(tag);
        for attr in &element.attrs {
            out.push(' ');
            out.push_str(tree.resolve(attr.name));
            out.push_str("=\"");
            escape_into(&attr.value, Context::Attribute, out);
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&tag) {
            return;
        }

        let raw = RAW_TEXT_ELEMENTS.contains(&tag);
        for (child, node) in tree.children(id) {
            match (&node.data, raw) {
                (NodeData::Text(text), true) => out.push_str(&text.content),
                (_, true) => {}
                _ => self.write_node(tree, child, out),
            }
        }

        out.push_str(&format!("</{tag}>"));
    }
}

fn escape_into(text: &str, context: Context, out: &mut String) {
    for c in text.chars() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '\u{a0}' => "&nbsp;",
            '"' if context == Context::Attribute => "&quot;",
            _ => {
                out.push(c);
                continue;
            }
        };
        out.push_str(entity);
    }
}

/// Escape text content for HTML
pub fn escape_text(text: &str, output: &mut String) {
    escape_into(text, Context::Text, output);
}

/// Escape an attribute value for a double-quoted attribute
pub fn escape_attribute(text: &str, output: &mut String) {
    escape_into(text, Context::Attribute, output);
}

/// innerHTML of a node
pub fn get_inner_html(tree: &DomTree, id: NodeId) -> String {
    HtmlSerializer.serialize_inner(tree, id)
}

/// outerHTML of a node
pub fn get_outer_html(tree: &DomTree, id: NodeId) -> String {
    HtmlSerializer.serialize_outer(tree, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_only_escaped_in_attributes() {
        let mut text = String::new();
        escape_text(r#"<a title="x">&"#, &mut text);
        assert_eq!(text, r#"&lt;a title="x"&gt;&amp;"#);

        let mut attr = String::new();
        escape_attribute(r#"say "hi" & <bye>"#, &mut attr);
        assert_eq!(attr, "say &quot;hi&quot; &amp; &lt;bye&gt;");
    }

    #[test]
    fn test_nbsp_becomes_entity() {
        let mut out = String::new();
        escape_text("a\u{a0}b", &mut out);
        assert_eq!(out, "a&nbsp;b");
    }

    #[test]
    fn test_serialize_elements() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let br = tree.create_element("br");
        let text = tree.create_text("a < b");
        tree.set_attribute(div, "class", "x").unwrap();
        tree.set_attribute(div, "hidden", "").unwrap();
        tree.append_child(div, text).unwrap();
        tree.append_child(div, br).unwrap();

        assert_eq!(get_inner_html(&tree, div), "a &lt; b<br>");
        assert_eq!(get_outer_html(&tree, div), "<div class=\"x\" hidden=\"\">a &lt; b<br></div>");
    }

    #[test]
    fn test_script_is_raw() {
        let mut tree = DomTree::new();
        let script = tree.create_element("script");
        let code = tree.create_text("if (a < b) {}");
        tree.append_child(script, code).unwrap();
        assert_eq!(get_inner_html(&tree, script), "if (a < b) {}");
        assert_eq!(get_outer_html(&tree, script), "<script>if (a < b) {}</script>");
    }

    #[test]
    fn test_comment_and_doctype() {
        let mut tree = DomTree::new();
        let doctype = tree.create_doctype("html");
        let comment = tree.create_comment(" note ");
        tree.append_child(NodeId::ROOT, doctype).unwrap();
        tree.append_child(NodeId::ROOT, comment).unwrap();
        assert_eq!(get_inner_html(&tree, NodeId::ROOT), "<!DOCTYPE html><!-- note -->");
    }
}

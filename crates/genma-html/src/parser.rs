//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the arena tree.

use genma_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// Prefix that puts fragment markup in the "in body" insertion mode
const FRAGMENT_PREFIX: &str = "<!DOCTYPE html><html><head></head><body>";

/// Elements whose whitespace is content
const PRESERVE_WHITESPACE: &[&str] = &["pre", "textarea", "script", "style", "listing"];

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser {
    keep_whitespace: bool,
}

impl HtmlParser {
    /// Create a parser that drops whitespace-only text nodes
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep or drop whitespace-only text nodes outside `<pre>`-like elements
    pub fn keep_whitespace(mut self, keep: bool) -> Self {
        self.keep_whitespace = keep;
        self
    }

    /// Parse an HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty(url);
        self.convert_node(&dom.document, document.tree_mut(), NodeId::ROOT);
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Parse markup as body content into detached nodes of `tree`.
    ///
    /// Returns the top-level nodes in source order. They have no parent
    /// until the caller inserts them.
    pub fn parse_fragment(&self, tree: &mut DomTree, markup: &str) -> Vec<NodeId> {
        let dom = parse_document(RcDom::default(), Default::default())
            .one(format!("{FRAGMENT_PREFIX}{markup}"));

        let Some(body) = find_body(&dom.document) else {
            return Vec::new();
        };

        let holder = tree.create_element("body");
        for child in body.children.borrow().iter() {
            self.convert_node(child, tree, holder);
        }
        let nodes = tree.remove_children(holder);
        tree.free_subtree(holder);

        tracing::trace!("Parsed fragment into {} nodes", nodes.len());
        nodes
    }

    /// Convert an RcDom node and its subtree, appending under `parent`
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
            }
            RcNodeData::Doctype { name, .. } => {
                let id = tree.create_doctype(name);
                attach(tree, parent, id);
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if text.trim().is_empty() && !self.keeps_whitespace_in(tree, parent) {
                    return;
                }
                let id = tree.create_text(&text);
                attach(tree, parent, id);
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                attach(tree, parent, id);
            }
            RcNodeData::Element { name, attrs, template_contents, .. } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    // Freshly created elements always accept attributes
                    let _ = tree.set_attribute(id, &attr.name.local, &attr.value);
                }
                attach(tree, parent, id);

                if let Some(contents) = template_contents.borrow().as_ref() {
                    for child in contents.children.borrow().iter() {
                        self.convert_node(child, tree, id);
                    }
                }
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id);
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {}
        }
    }

    fn keeps_whitespace_in(&self, tree: &DomTree, parent: NodeId) -> bool {
        self.keep_whitespace
            || tree.tag_name(parent).is_some_and(|t| PRESERVE_WHITESPACE.contains(&t))
    }
}

fn attach(tree: &mut DomTree, parent: NodeId, child: NodeId) {
    if let Err(e) = tree.append_child(parent, child) {
        tracing::warn!("Dropping parsed node: {}", e);
    }
}

fn find_body(document: &Handle) -> Option<Handle> {
    let is_element = |h: &Handle, tag: &str| {
        matches!(&h.data, RcNodeData::Element { name, .. } if &*name.local == tag)
    };
    let html = document.children.borrow()
        .iter()
        .find(|h| is_element(h, "html"))
        .cloned()?;
    let body = html.children.borrow()
        .iter()
        .find(|h| is_element(h, "body"))
        .cloned();
    body
}

//! Genma HTML
//!
//! HTML5 parsing built on html5ever, and innerHTML/outerHTML serialization
//! of the arena tree.

mod parser;
pub mod serializer;

pub use parser::HtmlParser;
pub use serializer::{get_inner_html, get_outer_html, HtmlSerializer};

use genma_dom::{Document, DomTree, NodeId};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

/// Parse body-context markup into detached nodes of `tree`
pub fn parse_fragment(tree: &mut DomTree, markup: &str) -> Vec<NodeId> {
    HtmlParser::new().parse_fragment(tree, markup)
}

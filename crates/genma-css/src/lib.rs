//! Genma CSS - selectors and inline styles
//!
//! Selector parsing and matching against a `genma_dom::Document`, element
//! state checks shared by pseudo-classes, and the inline `style`
//! declaration block.

mod selectors;
pub mod state;
pub mod style;

pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorComponent, SelectorList,
};
pub use style::InlineStyle;

use genma_dom::{Document, NodeId};

/// Parse a selector list such as `#app > p.text, span`
pub fn parse_selector(selector: &str) -> Result<SelectorList, CssError> {
    SelectorList::parse(selector)
}

/// Elements below `scope` (exclusive) matching `selector`, in document order
pub fn query_all(document: &Document, scope: NodeId, selector: &SelectorList) -> Vec<NodeId> {
    let tree = document.tree();
    let matched: Vec<NodeId> = tree.descendants(scope)
        .filter(|&id| tree.get(id).is_some_and(|n| n.is_element()))
        .filter(|&id| selector.matches(document, id))
        .collect();
    tracing::trace!("query under {:?} matched {} elements", scope, matched.len());
    matched
}

/// Nearest inclusive ancestor element of `element` matching `selector`
pub fn closest(document: &Document, element: NodeId, selector: &SelectorList) -> Option<NodeId> {
    let tree = document.tree();
    std::iter::once(element)
        .chain(tree.ancestors(element))
        .filter(|&id| tree.get(id).is_some_and(|n| n.is_element()))
        .find(|&id| selector.matches(document, id))
}

/// CSS errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CssError {
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid declarations '{text}': {reason}")]
    InvalidDeclarations { text: String, reason: String },
}

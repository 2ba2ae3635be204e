//! Read-only element view for predicates

use genma_css::SelectorList;
use genma_dom::{properties, Document, NodeId, PropValue};

/// A borrowed view of one node, handed to [`NodeSet::is_with`](crate::NodeSet::is_with)
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    document: &'a Document,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub fn new(document: &'a Document, id: NodeId) -> Self {
        Self { document, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn tag_name(&self) -> Option<&'a str> {
        self.document.tree().tag_name(self.id)
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.document.tree().get_attribute(self.id, name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_whitespace().any(|t| t == name))
    }

    pub fn text(&self) -> String {
        self.document.tree().text_content(self.id).unwrap_or_default()
    }

    pub fn prop(&self, name: &str) -> Option<PropValue> {
        properties::get_property(self.document.tree(), self.id, name).ok()
    }

    pub fn is_connected(&self) -> bool {
        self.document.tree().is_connected(self.id)
    }

    /// Parent element, if any
    pub fn parent(&self) -> Option<ElementRef<'a>> {
        let parent = self.document.tree().get(self.id)?.parent;
        self.document.tree()
            .get(parent)
            .filter(|n| n.is_element())
            .map(|_| ElementRef::new(self.document, parent))
    }

    /// Selector match; invalid selectors never match
    pub fn matches(&self, selector: &str) -> bool {
        SelectorList::parse(selector).is_ok_and(|list| list.matches(self.document, self.id))
    }
}

impl std::fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("tag", &self.tag_name())
            .finish()
    }
}

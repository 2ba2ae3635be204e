//! Markup insertion and list rendering
//!
//! Markup is parsed once per target element so every target receives its
//! own copy of the nodes.

use genma_dom::{Document, NodeId};

use crate::NodeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Last child
    Append,
    /// First child
    Prepend,
    /// Preceding sibling
    Before,
    /// Following sibling
    After,
}

impl NodeSet {
    /// Insert markup as the last child of every element
    pub fn append(&self, markup: &str) -> &Self {
        self.insert_markup(markup, Position::Append)
    }

    /// Insert markup as the first child of every element
    pub fn prepend(&self, markup: &str) -> &Self {
        self.insert_markup(markup, Position::Prepend)
    }

    /// Insert markup right before every element
    pub fn before(&self, markup: &str) -> &Self {
        self.insert_markup(markup, Position::Before)
    }

    /// Insert markup right after every element
    pub fn after(&self, markup: &str) -> &Self {
        self.insert_markup(markup, Position::After)
    }

    /// Detach every element from its parent
    ///
    /// The detached nodes stay usable through this set; once no set refers
    /// to them they are freed with their listeners.
    pub fn remove(&self) -> &Self {
        {
            let mut doc = self.dom().borrow_mut();
            for id in self.iter() {
                if id == NodeId::ROOT || id == NodeId::WINDOW {
                    continue;
                }
                doc.tree_mut().detach(id);
                if doc.focused.is_some_and(|f| doc.tree().contains(id, f)) {
                    doc.focused = None;
                }
            }
        }
        self.dom().release_detached();
        self
    }

    /// Replace the children of every element with `render(item, index)`
    /// concatenated over `items`
    pub fn render_list<T>(&self, items: &[T], mut render: impl FnMut(&T, usize) -> String) -> &Self {
        for element in self.iter() {
            let markup: String = items.iter()
                .enumerate()
                .map(|(index, item)| render(item, index))
                .collect();
            self.dom().select(element).set_html(&markup);
        }
        self
    }

    fn insert_markup(&self, markup: &str, position: Position) -> &Self {
        let parser = self.dom().html_parser();
        {
            let mut doc = self.dom().borrow_mut();
            for id in self.iter() {
                let Some((parent, reference)) = insertion_point(&doc, id, position) else {
                    tracing::debug!("No insertion point {:?} for {:?}", position, id);
                    continue;
                };
                for node in parser.parse_fragment(doc.tree_mut(), markup) {
                    if let Err(e) = doc.tree_mut().insert_before(parent, node, reference) {
                        tracing::warn!("Cannot insert markup: {}", e);
                    }
                }
            }
        }
        self.dom().release_detached();
        self
    }
}

/// Parent and reference child for an insertion relative to `id`
fn insertion_point(doc: &Document, id: NodeId, position: Position) -> Option<(NodeId, NodeId)> {
    let node = doc.tree().get(id)?;
    match position {
        Position::Append | Position::Prepend if !node.is_element() => None,
        Position::Append => Some((id, NodeId::NONE)),
        Position::Prepend => Some((id, node.first_child)),
        Position::Before | Position::After if !node.parent.is_valid() => None,
        Position::Before => Some((node.parent, id)),
        Position::After => Some((node.parent, node.next_sibling)),
    }
}

#[cfg(test)]
mod tests {
    use genma_dom::EventListener;

    use crate::Dom;

    #[test]
    fn test_each_target_gets_its_own_nodes() {
        let dom = Dom::parse("<div class='box'></div><div class='box'></div>");
        dom.select(".box").append("<span>x</span>");
        let spans = dom.select("span");
        assert_eq!(spans.len(), 2);
        assert_ne!(spans.get()[0], spans.get()[1]);
    }

    #[test]
    fn test_before_detached_is_skipped() {
        let dom = Dom::parse("<p id='p'></p>");
        let p = dom.select("#p");
        p.remove();
        p.before("<b>x</b>");
        assert!(dom.select("b").is_empty());
    }

    #[test]
    fn test_rerender_reuses_slots_and_drops_listeners() {
        let dom = Dom::parse("<ul id='list'></ul>");
        let list = dom.select("#list");
        let listener = EventListener::new(|_| {});

        let render = |round: usize| {
            list.render_list(&[round, round + 1, round + 2], |n, _| format!("<li>{n}</li>"));
            dom.select("#list li").on("click", &listener);
        };
        // The first two rounds grow the arena to its working size
        render(0);
        render(1);
        let capacity = dom.borrow().tree().capacity();

        for round in 2..1000 {
            render(round);
        }

        let doc = dom.borrow();
        assert_eq!(doc.tree().capacity(), capacity);
        assert_eq!(doc.listeners.len(), 3);
        assert_eq!(dom.select("li").len(), 3);
    }

    #[test]
    fn test_remove_clears_focus_inside() {
        let dom = Dom::parse("<div id='d'><input id='i'></div>");
        dom.select("#i").focus();
        dom.select("#d").remove();
        assert!(dom.borrow().focused.is_none());
    }
}

//! Document - High-level document API

use crate::{DomTree, ListenerRegistry, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Event listeners of every node, the document and the window
    pub listeners: ListenerRegistry,
    /// Currently focused element
    pub focused: Option<NodeId>,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// Create a document with an empty `<html><head><body>` skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes cannot violate the hierarchy
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            listeners: ListenerRegistry::new(),
            focused: None,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create a document holding only the document node
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            listeners: ListenerRegistry::new(),
            focused: None,
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate `<html>`, `<head>` and `<body>` after the tree was built
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self.tree.element_children(root)
            .find(|&id| self.tree.tag_name(id) == Some("html"))
            .unwrap_or(NodeId::NONE);
        self.head_element = self.child_with_tag(self.html_element, "head");
        self.body_element = self.child_with_tag(self.html_element, "body");
    }

    fn child_with_tag(&self, parent: NodeId, tag: &str) -> NodeId {
        self.tree.element_children(parent)
            .find(|&id| self.tree.tag_name(id) == Some(tag))
            .unwrap_or(NodeId::NONE)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Text of the first `<title>` in `<head>`
    pub fn title(&self) -> String {
        self.tree.element_children(self.head_element)
            .find(|&id| self.tree.tag_name(id) == Some("title"))
            .and_then(|id| self.tree.text_content(id))
            .unwrap_or_default()
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get `<head>` element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// First connected element with the given id, in document order
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.descendants(self.tree.root())
            .find(|&node| self.tree.get_attribute(node, "id") == Some(id))
    }

    /// Whether `id` names the window or a node in the tree
    pub fn is_target(&self, id: NodeId) -> bool {
        id == NodeId::WINDOW || self.tree.get(id).is_some()
    }

    /// Propagation path: the target, its ancestors, then the window when
    /// the target is connected to the document.
    pub fn event_path(&self, target: NodeId) -> Vec<NodeId> {
        if target == NodeId::WINDOW {
            return vec![NodeId::WINDOW];
        }
        if self.tree.get(target).is_none() {
            return Vec::new();
        }

        let mut path = vec![target];
        path.extend(self.tree.ancestors(target));
        if path.last() == Some(&NodeId::ROOT) {
            path.push(NodeId::WINDOW);
        }
        path
    }

    /// Free detached subtrees in which `is_held` accepts no node.
    ///
    /// Freed nodes lose their listeners and focus. Held subtrees are kept
    /// as candidates for the next call. Returns the number of freed nodes.
    pub fn release_detached(&mut self, is_held: impl Fn(NodeId) -> bool) -> usize {
        let mut freed = 0;
        for top in self.tree.take_orphans() {
            let held = std::iter::once(top)
                .chain(self.tree.descendants(top))
                .any(&is_held);
            if held {
                self.tree.keep_orphan(top);
                continue;
            }

            for id in self.tree.free_subtree(top) {
                self.listeners.remove_target(id);
                if self.focused == Some(id) {
                    self.focused = None;
                }
                freed += 1;
            }
        }
        if freed > 0 {
            tracing::trace!("Released {} detached nodes", freed);
        }
        freed
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new("about:blank");
        assert_eq!(doc.tree.tag_name(doc.body()), Some("body"));
        assert_eq!(doc.tree.tag_name(doc.head()), Some("head"));
    }

    #[test]
    fn test_event_path_reaches_window() {
        let mut doc = Document::default();
        let div = doc.tree.create_element("div");
        let body = doc.body();
        doc.tree.append_child(body, div).unwrap();

        let path = doc.event_path(div);
        assert_eq!(path.first(), Some(&div));
        assert_eq!(path[path.len() - 2], NodeId::ROOT);
        assert_eq!(path.last(), Some(&NodeId::WINDOW));
    }

    #[test]
    fn test_detached_path_stops_at_top() {
        let mut doc = Document::default();
        let outer = doc.tree.create_element("div");
        let inner = doc.tree.create_element("span");
        doc.tree.append_child(outer, inner).unwrap();
        assert_eq!(doc.event_path(inner), vec![inner, outer]);
    }

    #[test]
    fn test_release_detached_drops_listeners() {
        let mut doc = Document::default();
        let body = doc.body();
        let kept = doc.tree.create_element("div");
        let gone = doc.tree.create_element("div");
        let child = doc.tree.create_element("span");
        doc.tree.append_child(body, kept).unwrap();
        doc.tree.append_child(body, gone).unwrap();
        doc.tree.append_child(gone, child).unwrap();
        doc.listeners.add(child, "click", crate::EventListener::new(|_| {}));
        doc.focused = Some(child);

        doc.tree.detach(kept);
        doc.tree.detach(gone);
        assert_eq!(doc.release_detached(|id| id == kept), 2);
        assert!(doc.tree.get(child).is_none());
        assert!(doc.listeners.is_empty());
        assert_eq!(doc.focused, None);

        // Still held, so still a candidate
        assert_eq!(doc.release_detached(|_| false), 1);
        assert!(doc.tree.get(kept).is_none());
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::default();
        let div = doc.tree.create_element("div");
        doc.tree.set_attribute(div, "id", "app").unwrap();
        let body = doc.body();
        doc.tree.append_child(body, div).unwrap();
        assert_eq!(doc.get_element_by_id("app"), Some(div));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }
}

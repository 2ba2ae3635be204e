//! DOM Tree (arena-based allocation)
//!
//! Detaching only unlinks. A detached subtree keeps its slots until
//! [`DomTree::free_subtree`] releases them; freed slots are reused by later
//! allocations, so a `NodeId` must not outlive the subtree it named.

use crate::{DomError, DomResult, InternedString, Node, NodeData, NodeId, StringInterner};

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
    /// Roots of subtrees unlinked by `detach`, possibly reattached since
    orphans: Vec<NodeId>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::document())],
            free: Vec::new(),
            orphans: Vec::new(),
            interner: StringInterner::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID. Freed slots read as `None`.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index())?.as_ref()
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.index())?.as_mut()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of arena slots, live or free
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut StringInterner {
        &mut self.interner
    }

    /// Intern a name
    pub fn intern(&mut self, s: &str) -> InternedString {
        self.interner.intern(s)
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.get(id)
    }

    fn push(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = Some(node);
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    /// Create a detached element. The tag name is lowercased.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(&tag.to_ascii_lowercase());
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(Node::doctype(name.to_string()))
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, NodeId::NONE)
    }

    /// Insert `child` before `reference` under `parent`.
    /// A `NONE` reference appends.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> DomResult<NodeId> {
        if self.get(parent).is_none() {
            return Err(DomError::NotFound(parent));
        }
        if self.get(child).is_none() {
            return Err(DomError::NotFound(child));
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if reference.is_valid() {
            let ref_parent = self.get(reference).map(|n| n.parent);
            if ref_parent != Some(parent) {
                return Err(DomError::NotFound(reference));
            }
            if reference == child {
                return Ok(child);
            }
        }

        self.unlink(child);

        let prev = match self.get(reference) {
            Some(node) => node.prev_sibling,
            None => self.get(parent).map_or(NodeId::NONE, |n| n.last_child),
        };

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }

        match self.get_mut(prev) {
            Some(node) => node.next_sibling = child,
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.first_child = child;
                }
            }
        }
        match self.get_mut(reference) {
            Some(node) => node.prev_sibling = child,
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.last_child = child;
                }
            }
        }

        Ok(child)
    }

    /// Unlink a node from its parent. No-op for detached nodes.
    ///
    /// The node is remembered as an orphan root so a later
    /// [`DomTree::take_orphans`] can decide whether to free it.
    pub fn detach(&mut self, id: NodeId) {
        if self.unlink(id) {
            self.orphans.push(id);
        }
    }

    fn unlink(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return false;
        }

        match self.get_mut(prev) {
            Some(node) => node.next_sibling = next,
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.first_child = next;
                }
            }
        }
        match self.get_mut(next) {
            Some(node) => node.prev_sibling = prev,
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.last_child = prev;
                }
            }
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
        true
    }

    /// Detach every child of `id`, returning them in order
    pub fn remove_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = self.child_ids(id);
        for &child in &children {
            self.detach(child);
        }
        children
    }

    /// Orphan roots recorded since the last call that are still detached
    pub fn take_orphans(&mut self) -> Vec<NodeId> {
        let mut orphans = std::mem::take(&mut self.orphans);
        orphans.sort_unstable_by_key(|id| id.0);
        orphans.dedup();
        orphans.retain(|&id| id != NodeId::ROOT && self.get(id).is_some_and(|n| !n.parent.is_valid()));
        orphans
    }

    /// Record a detached root again, for one that could not be freed yet
    pub fn keep_orphan(&mut self, id: NodeId) {
        self.orphans.push(id);
    }

    /// Release a detached subtree's slots for reuse. Returns the freed IDs.
    ///
    /// Attached nodes and the document node are left alone.
    pub fn free_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        if id == NodeId::ROOT || !self.get(id).is_some_and(|n| !n.parent.is_valid()) {
            return Vec::new();
        }
        let freed: Vec<NodeId> = std::iter::once(id).chain(self.descendants(id)).collect();
        for &slot in &freed {
            self.nodes[slot.index()] = None;
        }
        self.free.extend(freed.iter().rev());
        freed
    }

    /// Iterate over children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next }
    }

    /// Child IDs collected into a Vec
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).map(|(child, _)| child).collect()
    }

    /// Element children only
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
    }

    /// Iterate over ancestors, nearest first (excluding `id`)
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.parent);
        Ancestors { tree: self, next }
    }

    /// Iterate over descendants in document order (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Descendants { tree: self, root: id, next }
    }

    /// Whether `node` is `ancestor` or one of its descendants
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !ancestor.is_valid() || !node.is_valid() {
            return false;
        }
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether the node is attached under the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(NodeId::ROOT, id)
    }

    /// Tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)
            .and_then(Node::as_element)
            .map(|e| self.resolve(e.name))
    }

    /// Attribute value of an element
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let elem = self.get(id)?.as_element()?;
        let key = self.interner.lookup(&name.to_ascii_lowercase())?;
        elem.get_attr(key)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute. Names are lowercased, as for HTML elements.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let key = self.interner.intern(&name.to_ascii_lowercase());
        let elem = self.element_mut(id)?;
        elem.set_attr(key, value.to_string());
        Ok(())
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let key = self.interner.lookup(&name.to_ascii_lowercase());
        let elem = self.element_mut(id)?;
        Ok(key.and_then(|k| elem.remove_attr(k)))
    }

    /// All attributes of an element as `(name, value)` pairs
    pub fn attributes(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.get(id)
            .and_then(Node::as_element)
            .map(|e| {
                e.attrs.iter()
                    .map(|a| (self.resolve(a.name), a.value.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Mutable element data, or an error for non-elements
    pub fn element_mut(&mut self, id: NodeId) -> DomResult<&mut crate::ElementData> {
        match self.get_mut(id) {
            Some(node) => node.as_element_mut().ok_or(DomError::NotAnElement(id)),
            None => Err(DomError::NotFound(id)),
        }
    }

    /// `textContent`: concatenated descendant text for elements, own data
    /// for text and comments, `None` for the document and doctypes.
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        match &node.data {
            NodeData::Text(t) => Some(t.content.clone()),
            NodeData::Comment(c) => Some(c.clone()),
            NodeData::Element(_) => {
                let mut out = String::new();
                for desc in self.descendants(id) {
                    if let Some(text) = self.get(desc).and_then(Node::as_text) {
                        out.push_str(text);
                    }
                }
                Some(out)
            }
            NodeData::Document | NodeData::Doctype { .. } => None,
        }
    }

    /// Set `textContent`. Elements lose all children and gain one text
    /// node (none for an empty string); the document ignores the write.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        let node = self.get_mut(id).ok_or(DomError::NotFound(id))?;
        match &mut node.data {
            NodeData::Text(t) => {
                t.content = text.to_string();
                return Ok(());
            }
            NodeData::Comment(c) => {
                *c = text.to_string();
                return Ok(());
            }
            NodeData::Document | NodeData::Doctype { .. } => return Ok(()),
            NodeData::Element(_) => {}
        }

        self.remove_children(id);
        if !text.is_empty() {
            let child = self.create_text(text);
            self.append_child(id, child)?;
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Child iterator
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Ancestor iterator
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.parent;
        Some(id)
    }
}

/// Pre-order descendant iterator bounded by its root
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next;
        let node = self.tree.get(id)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cursor = id;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let Some(current) = self.tree.get(cursor) else {
                    break NodeId::NONE;
                };
                if current.next_sibling.is_valid() {
                    break current.next_sibling;
                }
                cursor = current.parent;
                if !cursor.is_valid() || cursor == self.root {
                    break NodeId::NONE;
                }
            }
        };

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("DIV");
        let p = tree.create_element("p");
        let text = tree.create_text("Hello");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, p).unwrap();
        tree.append_child(p, text).unwrap();
        tree.append_child(div, span).unwrap();
        (tree, div, p, text, span)
    }

    #[test]
    fn test_descendants_document_order() {
        let (tree, div, p, text, span) = sample();
        let order: Vec<_> = tree.descendants(tree.root()).collect();
        assert_eq!(order, vec![div, p, text, span]);

        let inner: Vec<_> = tree.descendants(p).collect();
        assert_eq!(inner, vec![text]);
    }

    #[test]
    fn test_tag_names_lowercased() {
        let (tree, div, ..) = sample();
        assert_eq!(tree.tag_name(div), Some("div"));
    }

    #[test]
    fn test_insert_before_and_detach() {
        let (mut tree, div, p, _, span) = sample();
        let em = tree.create_element("em");
        tree.insert_before(div, em, span).unwrap();
        assert_eq!(tree.child_ids(div), vec![p, em, span]);

        tree.detach(em);
        assert_eq!(tree.child_ids(div), vec![p, span]);
        assert!(!tree.is_connected(em));
        assert!(tree.is_connected(span));
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let (mut tree, div, p, text, span) = sample();
        tree.detach(div);
        assert_eq!(tree.take_orphans(), vec![div]);

        let freed = tree.free_subtree(div);
        assert_eq!(freed, vec![div, p, text, span]);
        assert!(tree.get(p).is_none());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.capacity(), 5);

        let again = tree.create_element("em");
        assert!(freed.contains(&again));
        assert_eq!(tree.capacity(), 5);
        assert_eq!(tree.tag_name(again), Some("em"));
    }

    #[test]
    fn test_attached_subtree_is_not_freed() {
        let (mut tree, div, p, ..) = sample();
        assert!(tree.free_subtree(p).is_empty());
        assert!(tree.free_subtree(NodeId::ROOT).is_empty());

        tree.detach(p);
        tree.append_child(div, p).unwrap();
        assert!(tree.take_orphans().is_empty());
    }

    #[test]
    fn test_hierarchy_error() {
        let (mut tree, div, p, ..) = sample();
        let err = tree.append_child(p, div).unwrap_err();
        assert_eq!(err, DomError::HierarchyRequest { parent: p, child: div });
    }

    #[test]
    fn test_text_content_round_trip() {
        let (mut tree, div, p, ..) = sample();
        assert_eq!(tree.text_content(div).as_deref(), Some("Hello"));
        tree.set_text_content(p, "Changed").unwrap();
        assert_eq!(tree.text_content(p).as_deref(), Some("Changed"));
        assert_eq!(tree.text_content(tree.root()), None);
    }

    #[test]
    fn test_attributes() {
        let (mut tree, div, ..) = sample();
        tree.set_attribute(div, "Data-Id", "1").unwrap();
        assert_eq!(tree.get_attribute(div, "data-id"), Some("1"));
        assert_eq!(tree.remove_attribute(div, "data-id").unwrap().as_deref(), Some("1"));
        assert!(!tree.has_attribute(div, "data-id"));
    }
}

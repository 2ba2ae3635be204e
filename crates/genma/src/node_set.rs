//! NodeSet
//!
//! An ordered set of element handles with chainable reads and writes.
//! Reads look at the first element only; writes apply to every element and
//! return the set. Misuse (an empty set, an unknown property, a bad style
//! payload) is logged and never interrupts the chain.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use genma_css::{state, InlineStyle, SelectorList};
use genma_dom::{dataset, properties, DOMTokenList, Document, DomError, EventListener, NodeId, PropValue};

use crate::{Dom, ElementRef};

/// What to select
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Every element matching a selector, in document order
    Selector(String),
    /// One node
    Node(NodeId),
    /// The document node
    Document,
    /// The window
    Window,
    /// An explicit collection, kept in the given order
    Nodes(Vec<NodeId>),
    /// Nothing at all
    Nothing,
}

impl Target {
    fn describe(&self) -> String {
        match self {
            Target::Selector(s) => s.clone(),
            Target::Node(id) => format!("{id:?}"),
            Target::Document => "document".to_string(),
            Target::Window => "window".to_string(),
            Target::Nodes(ids) => format!("{} nodes", ids.len()),
            Target::Nothing => "nothing".to_string(),
        }
    }
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Target::Selector(selector)
    }
}

impl From<&String> for Target {
    fn from(selector: &String) -> Self {
        Target::Selector(selector.clone())
    }
}

impl From<NodeId> for Target {
    fn from(id: NodeId) -> Self {
        Target::Node(id)
    }
}

impl From<Option<NodeId>> for Target {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Target::Nothing, Target::Node)
    }
}

impl From<Vec<NodeId>> for Target {
    fn from(ids: Vec<NodeId>) -> Self {
        Target::Nodes(ids)
    }
}

impl From<&[NodeId]> for Target {
    fn from(ids: &[NodeId]) -> Self {
        Target::Nodes(ids.to_vec())
    }
}

impl From<&NodeSet> for Target {
    fn from(set: &NodeSet) -> Self {
        Target::Nodes(set.nodes.clone())
    }
}

/// Argument of [`NodeSet::css`]
#[derive(Debug, Clone, PartialEq)]
pub enum CssPayload {
    /// Property/value pairs; names may be camelCase, empty values remove
    Map(Vec<(String, String)>),
    /// Declaration text such as `color: red; width: 10px`
    Text(String),
}

impl From<&str> for CssPayload {
    fn from(text: &str) -> Self {
        CssPayload::Text(text.to_string())
    }
}

impl From<String> for CssPayload {
    fn from(text: String) -> Self {
        CssPayload::Text(text)
    }
}

fn pairs<K: AsRef<str>, V: AsRef<str>>(iter: impl IntoIterator<Item = (K, V)>) -> CssPayload {
    CssPayload::Map(
        iter.into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect(),
    )
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> From<[(K, V); N]> for CssPayload {
    fn from(map: [(K, V); N]) -> Self {
        pairs(map)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> From<Vec<(K, V)>> for CssPayload {
    fn from(map: Vec<(K, V)>) -> Self {
        pairs(map)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> From<HashMap<K, V>> for CssPayload {
    fn from(map: HashMap<K, V>) -> Self {
        pairs(map)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> From<BTreeMap<K, V>> for CssPayload {
    fn from(map: BTreeMap<K, V>) -> Self {
        pairs(map)
    }
}

/// Ordered element handles bound to a document.
///
/// A set keeps its nodes allocated while it lives, even after they are
/// detached. Detached nodes no set refers to are freed.
pub struct NodeSet {
    dom: Dom,
    nodes: Vec<NodeId>,
    input: String,
}

impl NodeSet {
    /// Resolve `target` against the document
    pub fn new(dom: &Dom, target: impl Into<Target>) -> Self {
        let target = target.into();
        let input = target.describe();

        let nodes = {
            let doc = dom.borrow();
            match target {
                Target::Selector(selector) => match SelectorList::parse(&selector) {
                    Ok(list) => genma_css::query_all(&doc, NodeId::ROOT, &list),
                    Err(e) => {
                        tracing::warn!("{}", e);
                        Vec::new()
                    }
                },
                Target::Node(id) => [id].into_iter().filter(|&id| doc.is_target(id)).collect(),
                Target::Document => vec![NodeId::ROOT],
                Target::Window => vec![NodeId::WINDOW],
                Target::Nodes(ids) => ids.into_iter().filter(|&id| doc.is_target(id)).collect(),
                Target::Nothing => Vec::new(),
            }
        };

        if nodes.is_empty() && dom.config().warn_on_empty_selection {
            tracing::warn!("Element {} is not found", input);
        }

        Self::bound(dom, nodes, input)
    }

    fn bound(dom: &Dom, nodes: Vec<NodeId>, input: String) -> Self {
        dom.hold(&nodes);
        Self { dom: dom.clone(), nodes, input }
    }

    /// A derived set; never warns
    fn derive(&self, nodes: Vec<NodeId>, input: String) -> NodeSet {
        NodeSet::bound(&self.dom, nodes, input)
    }

    // ---- Basics ------------------------------------------------------------

    /// The element handles, in set order
    pub fn get(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Call `f` with each element wrapped as its own set
    pub fn each(&self, mut f: impl FnMut(usize, NodeSet)) -> &Self {
        for (index, &id) in self.nodes.iter().enumerate() {
            f(index, self.derive(vec![id], self.input.clone()));
        }
        self
    }

    fn first_id(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Run `f` on the first element, if any
    fn read<R>(&self, f: impl FnOnce(&Document, NodeId) -> Option<R>) -> Option<R> {
        let id = self.first_id()?;
        let doc = self.dom.borrow();
        f(&*doc, id)
    }

    /// Run `f` on every element under one mutable borrow
    fn write(&self, mut f: impl FnMut(&mut Document, NodeId)) -> &Self {
        if self.nodes.is_empty() {
            return self;
        }
        {
            let mut doc = self.dom.borrow_mut();
            for &id in &self.nodes {
                f(&mut *doc, id);
            }
        }
        self.dom.release_detached();
        self
    }

    // ---- Reads ---------------------------------------------------------------

    /// Text content of the first element
    pub fn text(&self) -> Option<String> {
        self.read(|doc, id| doc.tree().text_content(id))
    }

    /// Markup of the first element's children
    pub fn html(&self) -> Option<String> {
        self.read(|doc, id| {
            let node = doc.tree().get(id)?;
            (node.is_element() || id == NodeId::ROOT)
                .then(|| genma_html::get_inner_html(doc.tree(), id))
        })
    }

    /// Current value of the first form control
    pub fn val(&self) -> Option<String> {
        self.read(|doc, id| {
            properties::get_property(doc.tree(), id, "value")
                .ok()
                .map(|v| v.to_string())
        })
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.read(|doc, id| doc.tree().get_attribute(id, name).map(str::to_string))
    }

    /// Live property of the first element
    pub fn prop(&self, name: &str) -> Option<PropValue> {
        self.read(|doc, id| properties::get_property(doc.tree(), id, name).ok())
    }

    /// Dataset entry by camelCase key
    pub fn data(&self, key: &str) -> Option<String> {
        self.read(|doc, id| dataset::get(doc.tree(), id, key).map(str::to_string))
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.read(|doc, id| {
            let classes = DOMTokenList::from_string(doc.tree().get_attribute(id, "class")?);
            Some(classes.contains(name))
        })
        .unwrap_or(false)
    }

    /// Inline style value of the first element
    pub fn css_value(&self, name: &str) -> Option<String> {
        self.read(|doc, id| {
            InlineStyle::from_element(doc.tree(), id)
                .get(name)
                .map(str::to_string)
        })
    }

    // ---- Writes --------------------------------------------------------------

    pub fn set_text(&self, text: &str) -> &Self {
        self.write(|doc, id| {
            if let Err(e) = doc.tree_mut().set_text_content(id, text) {
                tracing::warn!("Cannot set text: {}", e);
            }
        })
    }

    /// Replace every element's children with parsed markup
    pub fn set_html(&self, markup: &str) -> &Self {
        let parser = self.dom.html_parser();
        self.write(|doc, id| {
            if !doc.tree().get(id).is_some_and(|n| n.is_element()) {
                return;
            }
            doc.tree_mut().remove_children(id);
            for node in parser.parse_fragment(doc.tree_mut(), markup) {
                if let Err(e) = doc.tree_mut().append_child(id, node) {
                    tracing::warn!("Cannot insert markup: {}", e);
                }
            }
        })
    }

    pub fn set_val(&self, value: &str) -> &Self {
        self.set_prop("value", value)
    }

    pub fn set_attr(&self, name: &str, value: &str) -> &Self {
        self.write(|doc, id| {
            if let Err(e) = doc.tree_mut().set_attribute(id, name, value) {
                tracing::warn!("Cannot set attribute '{}': {}", name, e);
            }
        })
    }

    pub fn remove_attr(&self, name: &str) -> &Self {
        self.write(|doc, id| {
            let _ = doc.tree_mut().remove_attribute(id, name);
        })
    }

    /// Write a live property. Elements without the property are skipped.
    pub fn set_prop(&self, name: &str, value: impl Into<PropValue>) -> &Self {
        let value = value.into();
        self.write(|doc, id| {
            match properties::set_property(doc.tree_mut(), id, name, value.clone()) {
                Ok(()) => {}
                Err(DomError::UnknownProperty { tag, name }) => {
                    tracing::warn!("Property '{}' does not exist on <{}>", name, tag);
                }
                Err(e) => tracing::warn!("Cannot set property '{}': {}", name, e),
            }
        })
    }

    /// Write a dataset entry by camelCase key
    pub fn set_data(&self, key: &str, value: &str) -> &Self {
        self.write(|doc, id| {
            if let Err(e) = dataset::set(doc.tree_mut(), id, key, value) {
                tracing::warn!("Cannot set data '{}': {}", key, e);
            }
        })
    }

    fn edit_classes(&self, edit: impl Fn(&mut DOMTokenList)) -> &Self {
        self.write(|doc, id| {
            let tree = doc.tree_mut();
            if !tree.get(id).is_some_and(|n| n.is_element()) {
                return;
            }
            let mut classes = DOMTokenList::from_string(tree.get_attribute(id, "class").unwrap_or(""));
            edit(&mut classes);
            let _ = tree.set_attribute(id, "class", &classes.value());
        })
    }

    /// Add classes; `"a b"` adds both
    pub fn add_class(&self, names: &str) -> &Self {
        self.edit_classes(|classes| names.split_whitespace().for_each(|n| classes.add(n)))
    }

    pub fn remove_class(&self, names: &str) -> &Self {
        self.edit_classes(|classes| names.split_whitespace().for_each(|n| classes.remove(n)))
    }

    /// Toggle classes, or force them on/off
    pub fn toggle_class(&self, names: &str, force: Option<bool>) -> &Self {
        self.edit_classes(|classes| {
            for name in names.split_whitespace() {
                classes.toggle(name, force);
            }
        })
    }

    /// Merge declarations into every element's inline style
    pub fn css(&self, payload: impl Into<CssPayload>) -> &Self {
        let declarations = match payload.into() {
            CssPayload::Map(pairs) => pairs,
            CssPayload::Text(text) => match InlineStyle::parse(&text) {
                Ok(style) if !style.is_empty() => style.iter()
                    .map(|d| {
                        let value = if d.important { format!("{} !important", d.value) } else { d.value.clone() };
                        (d.name.clone(), value)
                    })
                    .collect(),
                Ok(_) => {
                    tracing::warn!("css() expects declarations, got '{}'", text);
                    return self;
                }
                Err(e) => {
                    tracing::warn!("css() payload rejected: {}", e);
                    return self;
                }
            },
        };

        self.write(|doc, id| {
            if !doc.tree().get(id).is_some_and(|n| n.is_element()) {
                return;
            }
            let mut style = InlineStyle::from_element(doc.tree(), id);
            for (name, value) in &declarations {
                style.set(name, value);
            }
            if let Err(e) = style.apply(doc.tree_mut(), id) {
                tracing::warn!("Cannot write style: {}", e);
            }
        })
    }

    // ---- Events --------------------------------------------------------------

    /// Attach a listener to every element. Attaching twice runs it twice.
    pub fn on(&self, event: &str, listener: &EventListener) -> &Self {
        self.write(|doc, id| doc.listeners.add(id, event, listener.clone()))
    }

    /// Detach one registration of `listener` from every element
    pub fn off(&self, event: &str, listener: &EventListener) -> &Self {
        self.write(|doc, id| {
            doc.listeners.remove(id, event, listener);
        })
    }

    /// Dispatch `event` at every element in turn
    pub fn trigger(&self, event: &str) -> &Self {
        for &id in &self.nodes {
            self.dom.dispatch(id, event);
        }
        self
    }

    /// Focus the first element, blurring the previously focused one
    pub fn focus(&self) -> &Self {
        let Some(id) = self.first_id() else {
            return self;
        };
        let previous = {
            let mut doc = self.dom.borrow_mut();
            if !doc.tree().get(id).is_some_and(|n| n.is_element()) {
                return self;
            }
            doc.focused.replace(id)
        };
        if let Some(previous) = previous.filter(|&p| p != id) {
            self.dom.dispatch(previous, "blur");
        }
        if previous != Some(id) {
            self.dom.dispatch(id, "focus");
        }
        self
    }

    // ---- Traversal -----------------------------------------------------------

    pub fn first(&self) -> NodeSet {
        self.eq(0)
    }

    pub fn last(&self) -> NodeSet {
        self.eq(-1)
    }

    /// Element at `index`; negative indexes count from the end
    pub fn eq(&self, index: isize) -> NodeSet {
        let len = self.nodes.len() as isize;
        let resolved = if index < 0 { len + index } else { index };
        let nodes = if (0..len).contains(&resolved) {
            vec![self.nodes[resolved as usize]]
        } else {
            Vec::new()
        };
        self.derive(nodes, format!("{}:eq({})", self.input, index))
    }

    fn parse_or_warn(&self, selector: &str) -> Option<SelectorList> {
        SelectorList::parse(selector)
            .map_err(|e| tracing::warn!("{}", e))
            .ok()
    }

    /// Descendants of each element matching `selector`, concatenated in set
    /// order. A node reachable from two elements appears twice.
    pub fn find(&self, selector: &str) -> NodeSet {
        let nodes = match self.parse_or_warn(selector) {
            Some(list) => {
                let doc = self.dom.borrow();
                self.nodes.iter()
                    .flat_map(|&id| genma_css::query_all(&doc, id, &list))
                    .collect()
            }
            None => Vec::new(),
        };
        self.derive(nodes, format!("{} {}", self.input, selector))
    }

    /// Nearest inclusive ancestor of each element matching `selector`.
    /// Elements without a match contribute nothing; duplicates are kept.
    pub fn closest(&self, selector: &str) -> NodeSet {
        let nodes = match self.parse_or_warn(selector) {
            Some(list) => {
                let doc = self.dom.borrow();
                self.nodes.iter()
                    .filter_map(|&id| genma_css::closest(&doc, id, &list))
                    .collect()
            }
            None => Vec::new(),
        };
        self.derive(nodes, format!("closest({selector})"))
    }

    // ---- Predicates ----------------------------------------------------------

    /// Test the first element against a state name (`disabled`, `enabled`,
    /// `checked`, `visible`, `hidden`, `empty`, `focus`, with or without a
    /// leading colon) or any selector.
    pub fn is(&self, test: &str) -> bool {
        let Some(id) = self.first_id() else {
            return false;
        };
        let doc = self.dom.borrow();
        let name = test.trim();

        match name.strip_prefix(':').unwrap_or(name) {
            "disabled" => state::is_disabled(&doc, id),
            "enabled" => state::is_enabled(&doc, id),
            "checked" => state::is_checked(&doc, id),
            "visible" => state::is_visible(&doc, id),
            "hidden" => state::is_hidden(&doc, id),
            "empty" => doc.tree().get(id).is_some_and(|n| n.is_element()) && state::is_empty(&doc, id),
            "focus" => state::is_focused(&doc, id),
            _ => match SelectorList::parse(name) {
                Ok(list) => list.matches(&doc, id),
                Err(e) => {
                    tracing::warn!("{}", e);
                    false
                }
            },
        }
    }

    /// Test the first element with a predicate.
    ///
    /// The document is borrowed while `predicate` runs, so it must not
    /// write through the DOM.
    pub fn is_with(&self, predicate: impl FnOnce(ElementRef<'_>) -> bool) -> bool {
        let Some(id) = self.first_id() else {
            return false;
        };
        let doc = self.dom.borrow();
        predicate(ElementRef::new(&doc, id))
    }
}

impl Clone for NodeSet {
    fn clone(&self) -> Self {
        NodeSet::bound(&self.dom, self.nodes.clone(), self.input.clone())
    }
}

impl Drop for NodeSet {
    fn drop(&mut self) {
        self.dom.unhold(&self.nodes);
        self.dom.release_detached();
    }
}

impl fmt::Debug for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSet")
            .field("input", &self.input)
            .field("nodes", &self.nodes)
            .finish()
    }
}

impl PartialEq for NodeSet {
    fn eq(&self, other: &Self) -> bool {
        self.dom.ptr_eq(&other.dom) && self.nodes == other.nodes
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

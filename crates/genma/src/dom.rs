//! Shared document handle

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use genma_dom::{Document, NodeId};
use genma_html::HtmlParser;

use crate::{Config, Error, NodeSet, Target};

/// A shared handle to one document.
///
/// Clones refer to the same document. Listeners that need the document
/// should capture a [`WeakDom`] so the document does not keep itself alive.
#[derive(Clone)]
pub struct Dom {
    document: Rc<RefCell<Document>>,
    config: Rc<Config>,
    holds: Rc<Holds>,
}

/// Non-owning counterpart of [`Dom`]
#[derive(Clone)]
pub struct WeakDom {
    document: Weak<RefCell<Document>>,
    config: Rc<Config>,
    holds: Rc<Holds>,
}

/// Number of live handles per node. Detached nodes with no entry here
/// may be freed.
#[derive(Debug, Default)]
struct Holds(RefCell<HashMap<NodeId, usize>>);

impl Holds {
    fn add(&self, ids: &[NodeId]) {
        let mut counts = self.0.borrow_mut();
        for &id in ids {
            *counts.entry(id).or_default() += 1;
        }
    }

    fn remove(&self, ids: &[NodeId]) {
        let mut counts = self.0.borrow_mut();
        for id in ids {
            if let Some(count) = counts.get_mut(id) {
                *count -= 1;
                if *count == 0 {
                    counts.remove(id);
                }
            }
        }
    }
}

impl Dom {
    /// An empty `<html><head><body>` document
    pub fn new() -> Self {
        Self::parse_with_config("", Config::default())
    }

    /// Parse a full HTML document
    pub fn parse(html: &str) -> Self {
        Self::parse_with_config(html, Config::default())
    }

    pub fn parse_with_config(html: &str, config: Config) -> Self {
        let document = HtmlParser::new()
            .keep_whitespace(config.keep_whitespace_text)
            .parse_with_url(html, &config.url);
        Self::from_document(document, config)
    }

    /// Wrap an already built document
    pub fn from_document(document: Document, config: Config) -> Self {
        Self {
            document: Rc::new(RefCell::new(document)),
            config: Rc::new(config),
            holds: Rc::default(),
        }
    }

    /// Select elements; see [`Target`] for the accepted inputs
    pub fn select(&self, target: impl Into<Target>) -> NodeSet {
        NodeSet::new(self, target)
    }

    /// Select by selector, surfacing an invalid selector as an error
    pub fn try_select(&self, selector: &str) -> Result<NodeSet, Error> {
        let list = genma_css::parse_selector(selector)?;
        let nodes = genma_css::query_all(&self.borrow(), NodeId::ROOT, &list);
        Ok(self.select(nodes))
    }

    /// The `<body>` element
    pub fn body(&self) -> NodeSet {
        let body = self.borrow().body();
        self.select(body)
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        genma_html::get_inner_html(self.borrow().tree(), NodeId::ROOT)
    }

    /// Dispatch an event at a node or the window.
    /// Returns `false` if a listener prevented the default.
    pub fn dispatch(&self, target: NodeId, event_type: &str) -> bool {
        // Listeners may detach nodes on the path; keep them until bubbling ends
        let path = self.borrow().event_path(target);
        self.hold(&path);
        let result = genma_dom::dispatch(&self.document, target, event_type);
        self.unhold(&path);
        self.release_detached();
        result
    }

    /// Free detached nodes that no node set refers to, along with their
    /// listeners. Returns the number of freed nodes, or 0 while the
    /// document is borrowed.
    ///
    /// Writes through a [`NodeSet`] and dropping a set already do this.
    pub fn release_detached(&self) -> usize {
        let Ok(mut doc) = self.document.try_borrow_mut() else {
            return 0;
        };
        // Freed listeners may own node sets that unhold as they drop
        let held: HashSet<NodeId> = self.holds.0.borrow().keys().copied().collect();
        doc.release_detached(|id| held.contains(&id))
    }

    /// Whether a live node set or subscription refers to `id`
    pub fn is_held(&self, id: NodeId) -> bool {
        self.holds.0.borrow().contains_key(&id)
    }

    pub(crate) fn hold(&self, ids: &[NodeId]) {
        self.holds.add(ids);
    }

    pub(crate) fn unhold(&self, ids: &[NodeId]) {
        self.holds.remove(ids);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Borrow the document. Panics if it is mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    /// Mutably borrow the document. Panics if it is already borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Document> {
        self.document.borrow_mut()
    }

    pub(crate) fn cell(&self) -> &RefCell<Document> {
        &self.document
    }

    pub(crate) fn html_parser(&self) -> HtmlParser {
        HtmlParser::new().keep_whitespace(self.config.keep_whitespace_text)
    }

    pub fn downgrade(&self) -> WeakDom {
        WeakDom {
            document: Rc::downgrade(&self.document),
            config: self.config.clone(),
            holds: self.holds.clone(),
        }
    }

    /// Whether both handles refer to the same document
    pub fn ptr_eq(&self, other: &Dom) -> bool {
        Rc::ptr_eq(&self.document, &other.document)
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dom")
            .field("url", &self.config.url)
            .field("nodes", &self.document.try_borrow().map(|d| d.tree().len()).ok())
            .finish()
    }
}

impl WeakDom {
    pub fn upgrade(&self) -> Option<Dom> {
        Some(Dom {
            document: self.document.upgrade()?,
            config: self.config.clone(),
            holds: self.holds.clone(),
        })
    }

    pub(crate) fn unhold(&self, ids: &[NodeId]) {
        self.holds.remove(ids);
    }
}

impl fmt::Debug for WeakDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakDom")
            .field("alive", &(self.document.strong_count() > 0))
            .finish()
    }
}

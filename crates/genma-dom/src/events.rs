//! DOM Events
//!
//! Listener registration and dispatch with bubbling.
//!
//! Listener lists are append-only per (node, type): registering the same
//! listener twice makes it run twice.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{Document, NodeId};

/// Event types that do not bubble
const NON_BUBBLING: &[&str] = &["focus", "blur", "load", "unload", "mouseenter", "mouseleave"];

/// A dispatched event
#[derive(Debug)]
pub struct Event {
    event_type: String,
    target: NodeId,
    current_target: Cell<NodeId>,
    bubbles: bool,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl Event {
    /// Create an event; bubbling follows the DOM default for the type
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: Cell::new(target),
            bubbles: !NON_BUBBLING.contains(&event_type),
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The node the event was dispatched to
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listener is currently running
    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Event handler handle.
///
/// Clones share one closure; identity for removal is that closure's
/// allocation, so `off` must be given a clone of the handle passed to `on`.
#[derive(Clone)]
pub struct EventListener(Rc<dyn Fn(&Event)>);

impl EventListener {
    pub fn new(handler: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    /// Whether both handles refer to the same closure
    pub fn same(&self, other: &EventListener) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for EventListener {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventListener({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

impl<F: Fn(&Event) + 'static> From<F> for EventListener {
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

/// Listeners by target, then event type
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: HashMap<NodeId, HashMap<String, Vec<EventListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; duplicates are kept
    pub fn add(&mut self, target: NodeId, event_type: &str, listener: EventListener) {
        let by_type = self.listeners.entry(target).or_default();
        match by_type.get_mut(event_type) {
            Some(list) => list.push(listener),
            None => {
                by_type.insert(event_type.to_string(), vec![listener]);
            }
        }
    }

    /// Remove the first registration of `listener`. Returns whether one was found.
    pub fn remove(&mut self, target: NodeId, event_type: &str, listener: &EventListener) -> bool {
        let Some(by_type) = self.listeners.get_mut(&target) else {
            return false;
        };
        let Some(list) = by_type.get_mut(event_type) else {
            return false;
        };
        let Some(pos) = list.iter().position(|l| l.same(listener)) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            by_type.remove(event_type);
        }
        if by_type.is_empty() {
            self.listeners.remove(&target);
        }
        true
    }

    /// Drop every listener of a target, returning how many were registered
    pub fn remove_target(&mut self, target: NodeId) -> usize {
        self.listeners
            .remove(&target)
            .map_or(0, |by_type| by_type.values().map(Vec::len).sum())
    }

    /// Snapshot of the listeners for a target, in registration order
    pub fn snapshot(&self, target: NodeId, event_type: &str) -> Vec<EventListener> {
        self.listeners
            .get(&target)
            .and_then(|by_type| by_type.get(event_type))
            .cloned()
            .unwrap_or_default()
    }

    /// Number of registrations for a target and type
    pub fn count(&self, target: NodeId, event_type: &str) -> usize {
        self.listeners
            .get(&target)
            .and_then(|by_type| by_type.get(event_type))
            .map_or(0, Vec::len)
    }

    /// Number of registrations across all targets and types
    pub fn len(&self) -> usize {
        self.listeners
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Dispatch `event_type` at `target`.
///
/// The document is only borrowed while collecting the propagation path and
/// each listener snapshot, never while a listener runs, so listeners may
/// mutate the document. Returns `false` if a listener prevented the default.
pub fn dispatch(document: &RefCell<Document>, target: NodeId, event_type: &str) -> bool {
    let event = Event::new(event_type, target);
    let path = document.borrow().event_path(target);

    tracing::debug!("dispatch '{}' at {:?} along {} nodes", event_type, target, path.len());

    for (depth, node) in path.into_iter().enumerate() {
        if depth > 0 && !event.bubbles {
            break;
        }
        event.current_target.set(node);

        let listeners = document.borrow().listeners.snapshot(node, event_type);
        for listener in listeners {
            listener.call(&event);
        }

        if event.propagation_stopped.get() {
            break;
        }
    }

    !event.is_default_prevented()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_registration_kept() {
        let mut registry = ListenerRegistry::new();
        let listener = EventListener::new(|_| {});
        registry.add(NodeId(1), "click", listener.clone());
        registry.add(NodeId(1), "click", listener.clone());
        assert_eq!(registry.count(NodeId(1), "click"), 2);

        assert!(registry.remove(NodeId(1), "click", &listener));
        assert_eq!(registry.count(NodeId(1), "click"), 1);
    }

    #[test]
    fn test_remove_needs_same_handle() {
        let mut registry = ListenerRegistry::new();
        registry.add(NodeId(1), "click", EventListener::new(|_| {}));
        let other = EventListener::new(|_| {});
        assert!(!registry.remove(NodeId(1), "click", &other));
        assert_eq!(registry.count(NodeId(1), "click"), 1);
    }

    #[test]
    fn test_remove_target_drops_every_type() {
        let mut registry = ListenerRegistry::new();
        let listener = EventListener::new(|_| {});
        registry.add(NodeId(1), "click", listener.clone());
        registry.add(NodeId(1), "input", listener.clone());
        registry.add(NodeId(2), "click", listener.clone());
        assert_eq!(registry.len(), 3);

        assert_eq!(registry.remove_target(NodeId(1)), 2);
        assert_eq!(registry.count(NodeId(1), "click"), 0);
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(NodeId(2), "click", &listener));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_bubbling_defaults() {
        assert!(Event::new("click", NodeId(1)).bubbles());
        assert!(!Event::new("focus", NodeId(1)).bubbles());
    }
}

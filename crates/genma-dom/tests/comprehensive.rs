//! Comprehensive tests for genma-dom
//!
//! Tree structure, attributes, properties and event dispatch together.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use genma_dom::{dispatch, properties, Document, DomTree, EventListener, NodeId, PropValue};

fn document_with_button() -> (RefCell<Document>, NodeId, NodeId) {
    let mut doc = Document::default();
    let body = doc.body();
    let div = doc.tree.create_element("div");
    let button = doc.tree.create_element("button");
    doc.tree.append_child(body, div).unwrap();
    doc.tree.append_child(div, button).unwrap();
    (RefCell::new(doc), div, button)
}

#[test]
fn test_dom_tree_siblings() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    let a = tree.create_element("p");
    let b = tree.create_element("p");
    tree.append_child(tree.root(), div).unwrap();
    tree.append_child(div, a).unwrap();
    tree.append_child(div, b).unwrap();

    let node_a = tree.get(a).unwrap();
    assert_eq!(node_a.next_sibling, b);
    assert!(!node_a.prev_sibling.is_valid());
    assert_eq!(tree.get(div).unwrap().last_child, b);
}

#[test]
fn test_moving_node_relinks_both_parents() {
    let mut tree = DomTree::new();
    let left = tree.create_element("div");
    let right = tree.create_element("div");
    let item = tree.create_element("span");
    tree.append_child(left, item).unwrap();
    tree.append_child(right, item).unwrap();

    assert!(tree.child_ids(left).is_empty());
    assert_eq!(tree.child_ids(right), vec![item]);
    assert_eq!(tree.get(item).unwrap().parent, right);
}

#[test]
fn test_dispatch_bubbles_to_window() {
    let (doc, div, button) = document_with_button();
    let order = Rc::new(RefCell::new(Vec::new()));

    for target in [button, div, NodeId::ROOT, NodeId::WINDOW] {
        let order = order.clone();
        doc.borrow_mut().listeners.add(target, "click", EventListener::new(move |e| {
            order.borrow_mut().push(e.current_target());
        }));
    }

    assert!(dispatch(&doc, button, "click"));
    assert_eq!(*order.borrow(), vec![button, div, NodeId::ROOT, NodeId::WINDOW]);
}

#[test]
fn test_stop_propagation() {
    let (doc, div, button) = document_with_button();
    let outer = Rc::new(Cell::new(0));

    doc.borrow_mut().listeners.add(button, "click", EventListener::new(|e| e.stop_propagation()));
    let counter = outer.clone();
    doc.borrow_mut().listeners.add(div, "click", EventListener::new(move |_| {
        counter.set(counter.get() + 1);
    }));

    dispatch(&doc, button, "click");
    assert_eq!(outer.get(), 0);
}

#[test]
fn test_listener_may_mutate_document() {
    let (doc, _, button) = document_with_button();
    let doc = Rc::new(doc);

    let weak = Rc::downgrade(&doc);
    doc.borrow_mut().listeners.add(button, "click", EventListener::new(move |e| {
        if let Some(doc) = weak.upgrade() {
            let _ = doc.borrow_mut().tree.set_attribute(e.target(), "data-clicked", "yes");
        }
    }));

    dispatch(&doc, button, "click");
    assert_eq!(doc.borrow().tree.get_attribute(button, "data-clicked"), Some("yes"));
}

#[test]
fn test_prevent_default_reported() {
    let (doc, _, button) = document_with_button();
    doc.borrow_mut().listeners.add(button, "submit", EventListener::new(|e| e.prevent_default()));
    assert!(!dispatch(&doc, button, "submit"));
}

#[test]
fn test_button_disabled_property() {
    let (doc, _, button) = document_with_button();
    let mut doc = doc.borrow_mut();
    properties::set_property(&mut doc.tree, button, "disabled", PropValue::Bool(true)).unwrap();
    assert_eq!(doc.tree.get_attribute(button, "disabled"), Some(""));
}

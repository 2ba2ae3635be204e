//! DOMStringMap (dataset)
//!
//! Maps camelCase dataset keys to `data-*` attribute names and back.

use crate::{DomResult, DomTree, NodeId};

/// `userId` -> `data-user-id`
pub fn attribute_name(key: &str) -> String {
    format!("data-{}", to_kebab_case(key))
}

/// Read `dataset[key]`
pub fn get<'a>(tree: &'a DomTree, id: NodeId, key: &str) -> Option<&'a str> {
    tree.get_attribute(id, &attribute_name(key))
}

/// Write `dataset[key] = value`
pub fn set(tree: &mut DomTree, id: NodeId, key: &str, value: &str) -> DomResult<()> {
    tree.set_attribute(id, &attribute_name(key), value)
}

/// All dataset entries of an element, keyed in camelCase
pub fn entries(tree: &DomTree, id: NodeId) -> Vec<(String, String)> {
    tree.attributes(id)
        .into_iter()
        .filter_map(|(name, value)| {
            name.strip_prefix("data-")
                .map(|key| (to_camel_case(key), value.to_string()))
        })
        .collect()
}

/// Convert kebab-case to camelCase
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Convert camelCase to kebab-case
pub fn to_kebab_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

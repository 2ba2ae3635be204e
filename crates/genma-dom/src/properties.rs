//! Live element properties
//!
//! The named IDL properties an element exposes (`value`, `checked`,
//! `disabled`, ...). Each tag has a fixed table; a name outside it is an
//! `UnknownProperty` instead of an ad-hoc expando.

use std::fmt;

use crate::{DomError, DomResult, DomTree, NodeId};

/// A property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropValue {
    /// ECMAScript ToBoolean
    pub fn truthy(&self) -> bool {
        match self {
            PropValue::Null => false,
            PropValue::Bool(b) => *b,
            PropValue::Number(n) => *n != 0.0 && !n.is_nan(),
            PropValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => Ok(()),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Number(n) => write!(f, "{n}"),
            PropValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        PropValue::Number(n as f64)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(PropValue::Null, Into::into)
    }
}

/// How a property is backed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropKind {
    /// Reflects a string content attribute, with a default when absent
    StringAttr(&'static str, &'static str),
    /// Reflects a boolean content attribute (presence)
    BoolAttr(&'static str),
    /// Reflects an integer content attribute
    LongAttr(&'static str, i64),
    /// Current value of a control
    Value,
    /// Checkedness of a checkbox/radio
    Checked,
    /// Selectedness of an option
    Selected,
    TextContent,
    TagName,
}

const FORM_CONTROLS: &[&str] = &["button", "fieldset", "input", "optgroup", "option", "select", "textarea"];
const FOCUSABLE: &[&str] = &["a", "button", "input", "select", "textarea"];

fn property_kind(tag: &str, name: &str) -> Option<PropKind> {
    use PropKind::*;

    let global = match name {
        "id" => Some(StringAttr("id", "")),
        "className" => Some(StringAttr("class", "")),
        "title" => Some(StringAttr("title", "")),
        "lang" => Some(StringAttr("lang", "")),
        "dir" => Some(StringAttr("dir", "")),
        "hidden" => Some(BoolAttr("hidden")),
        "tabIndex" => Some(LongAttr("tabindex", if FOCUSABLE.contains(&tag) { 0 } else { -1 })),
        "textContent" => Some(TextContent),
        "tagName" => Some(TagName),
        _ => None,
    };
    if global.is_some() {
        return global;
    }

    if name == "disabled" && FORM_CONTROLS.contains(&tag) {
        return Some(BoolAttr("disabled"));
    }

    match (tag, name) {
        ("input", "value") | ("textarea", "value") | ("select", "value") => Some(Value),
        ("input", "defaultValue") => Some(StringAttr("value", "")),
        ("input", "checked") => Some(Checked),
        ("input", "defaultChecked") => Some(BoolAttr("checked")),
        ("input", "type") => Some(StringAttr("type", "text")),
        ("input", "placeholder") | ("textarea", "placeholder") => Some(StringAttr("placeholder", "")),
        ("input" | "textarea", "readOnly") => Some(BoolAttr("readonly")),
        ("input" | "textarea" | "select", "required") => Some(BoolAttr("required")),
        ("input" | "textarea" | "select" | "button", "name") => Some(StringAttr("name", "")),
        ("textarea", "defaultValue") => Some(TextContent),
        ("button", "value") => Some(StringAttr("value", "")),
        ("button", "type") => Some(StringAttr("type", "submit")),
        ("option", "value") => Some(Value),
        ("option", "selected") => Some(Selected),
        ("option", "defaultSelected") => Some(BoolAttr("selected")),
        ("option", "text") => Some(TextContent),
        ("a", "href") => Some(StringAttr("href", "")),
        ("a", "target") => Some(StringAttr("target", "")),
        ("a", "rel") => Some(StringAttr("rel", "")),
        ("img", "src") => Some(StringAttr("src", "")),
        ("img", "alt") => Some(StringAttr("alt", "")),
        ("label", "htmlFor") => Some(StringAttr("for", "")),
        ("form", "action") => Some(StringAttr("action", "")),
        ("form", "method") => Some(StringAttr("method", "get")),
        _ => None,
    }
}

fn lookup(tree: &DomTree, id: NodeId, name: &str) -> DomResult<(String, PropKind)> {
    let tag = tree.tag_name(id).ok_or(DomError::NotAnElement(id))?.to_string();
    match property_kind(&tag, name) {
        Some(kind) => Ok((tag, kind)),
        None => Err(DomError::UnknownProperty { tag, name: name.to_string() }),
    }
}

/// Whether the element exposes a property called `name`
pub fn has_property(tree: &DomTree, id: NodeId, name: &str) -> bool {
    lookup(tree, id, name).is_ok()
}

/// Read a property
pub fn get_property(tree: &DomTree, id: NodeId, name: &str) -> DomResult<PropValue> {
    let (tag, kind) = lookup(tree, id, name)?;

    let value = match kind {
        PropKind::StringAttr(attr, default) => {
            PropValue::Text(tree.get_attribute(id, attr).unwrap_or(default).to_string())
        }
        PropKind::BoolAttr(attr) => PropValue::Bool(tree.has_attribute(id, attr)),
        PropKind::LongAttr(attr, default) => {
            let n = tree.get_attribute(id, attr)
                .and_then(|v| v.trim().parse::<i64>().ok())
                .unwrap_or(default);
            PropValue::Number(n as f64)
        }
        PropKind::Value => PropValue::Text(control_value(tree, id, &tag)),
        PropKind::Checked => PropValue::Bool(checkedness(tree, id)),
        PropKind::Selected => PropValue::Bool(selectedness(tree, id)),
        PropKind::TextContent => {
            PropValue::Text(tree.text_content(id).unwrap_or_default())
        }
        PropKind::TagName => PropValue::Text(tag.to_ascii_uppercase()),
    };

    Ok(value)
}

/// Write a property. Unknown names are rejected, never created.
pub fn set_property(tree: &mut DomTree, id: NodeId, name: &str, value: PropValue) -> DomResult<()> {
    let (tag, kind) = lookup(tree, id, name)?;

    match kind {
        PropKind::StringAttr(attr, _) => tree.set_attribute(id, attr, &value.to_string()),
        PropKind::BoolAttr(attr) => {
            if value.truthy() {
                tree.set_attribute(id, attr, "")
            } else {
                tree.remove_attribute(id, attr).map(|_| ())
            }
        }
        PropKind::LongAttr(attr, _) => {
            let n = match &value {
                PropValue::Number(n) => *n as i64,
                other => other.to_string().trim().parse::<i64>().unwrap_or(0),
            };
            tree.set_attribute(id, attr, &n.to_string())
        }
        PropKind::Value => set_control_value(tree, id, &tag, value.to_string()),
        PropKind::Checked => {
            tree.element_mut(id)?.control.checked = Some(value.truthy());
            Ok(())
        }
        PropKind::Selected => {
            tree.element_mut(id)?.control.selected = Some(value.truthy());
            Ok(())
        }
        PropKind::TextContent => tree.set_text_content(id, &value.to_string()),
        PropKind::TagName => Err(DomError::ReadOnlyProperty { name: name.to_string() }),
    }
}

/// Checkedness: the dirty state, falling back to the `checked` attribute
pub fn checkedness(tree: &DomTree, id: NodeId) -> bool {
    let dirty = tree.get(id)
        .and_then(|n| n.as_element())
        .and_then(|e| e.control.checked);
    dirty.unwrap_or_else(|| tree.has_attribute(id, "checked"))
}

/// Selectedness of an `<option>`
pub fn selectedness(tree: &DomTree, id: NodeId) -> bool {
    let dirty = tree.get(id)
        .and_then(|n| n.as_element())
        .and_then(|e| e.control.selected);
    dirty.unwrap_or_else(|| tree.has_attribute(id, "selected"))
}

fn dirty_value(tree: &DomTree, id: NodeId) -> Option<String> {
    tree.get(id)
        .and_then(|n| n.as_element())
        .and_then(|e| e.control.value.clone())
}

fn option_value(tree: &DomTree, id: NodeId) -> String {
    match tree.get_attribute(id, "value") {
        Some(v) => v.to_string(),
        None => tree.text_content(id).unwrap_or_default().trim().to_string(),
    }
}

fn options(tree: &DomTree, select: NodeId) -> Vec<NodeId> {
    tree.descendants(select)
        .filter(|&d| tree.tag_name(d) == Some("option"))
        .collect()
}

fn control_value(tree: &DomTree, id: NodeId, tag: &str) -> String {
    match tag {
        "input" => dirty_value(tree, id).unwrap_or_else(|| {
            let is_toggle = matches!(tree.get_attribute(id, "type"), Some("checkbox" | "radio"));
            match tree.get_attribute(id, "value") {
                Some(v) => v.to_string(),
                None if is_toggle => "on".to_string(),
                None => String::new(),
            }
        }),
        "textarea" => dirty_value(tree, id)
            .unwrap_or_else(|| tree.text_content(id).unwrap_or_default()),
        "select" => {
            let opts = options(tree, id);
            opts.iter()
                .copied()
                .find(|&o| selectedness(tree, o))
                .or_else(|| opts.first().copied())
                .map(|o| option_value(tree, o))
                .unwrap_or_default()
        }
        "option" => option_value(tree, id),
        _ => String::new(),
    }
}

fn set_control_value(tree: &mut DomTree, id: NodeId, tag: &str, value: String) -> DomResult<()> {
    match tag {
        "select" => {
            for option in options(tree, id) {
                let matches = option_value(tree, option) == value;
                tree.element_mut(option)?.control.selected = Some(matches);
            }
            Ok(())
        }
        "option" => tree.set_attribute(id, "value", &value),
        _ => {
            tree.element_mut(id)?.control.value = Some(value);
            Ok(())
        }
    }
}

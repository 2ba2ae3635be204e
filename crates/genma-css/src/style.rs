//! Inline styles
//!
//! The `style` attribute as an ordered declaration list. Declarations are
//! validated with lightningcss; values are kept as written so a value read
//! back is the value that was set.

use genma_dom::{DomResult, DomTree, NodeId};
use lightningcss::stylesheet::{ParserOptions, StyleAttribute};

use crate::CssError;

/// A single `name: value` declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    pub important: bool,
}

/// Declarations of one `style` attribute, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    declarations: Vec<Declaration>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse declaration text, rejecting anything lightningcss cannot parse
    pub fn parse(text: &str) -> Result<Self, CssError> {
        validate(text)?;
        Ok(Self::parse_lenient(text))
    }

    /// Parse declaration text, skipping malformed declarations
    pub fn parse_lenient(text: &str) -> Self {
        let mut style = Self::new();
        for piece in split_declarations(text) {
            let Some((name, value)) = piece.split_once(':') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let (value, important) = strip_important(value.trim());
            style.insert(Declaration {
                name: normalize_property_name(name),
                value: value.to_string(),
                important,
            });
        }
        style
    }

    /// Current inline style of an element
    pub fn from_element(tree: &DomTree, element: NodeId) -> Self {
        tree.get_attribute(element, "style")
            .map(Self::parse_lenient)
            .unwrap_or_default()
    }

    /// Value of a property, by CSS or camelCase name
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = normalize_property_name(name);
        self.declarations.iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    /// Set a property. An empty value removes it.
    pub fn set(&mut self, name: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.remove(name);
            return;
        }
        let (value, important) = strip_important(value);
        self.insert(Declaration {
            name: normalize_property_name(name),
            value: value.to_string(),
            important,
        });
    }

    fn insert(&mut self, declaration: Declaration) {
        match self.declarations.iter_mut().find(|d| d.name == declaration.name) {
            Some(existing) => *existing = declaration,
            None => self.declarations.push(declaration),
        }
    }

    /// Remove a property. Returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let name = normalize_property_name(name);
        let before = self.declarations.len();
        self.declarations.retain(|d| d.name != name);
        self.declarations.len() != before
    }

    /// Apply every declaration of `other` over this style
    pub fn merge(&mut self, other: InlineStyle) {
        for declaration in other.declarations {
            self.insert(declaration);
        }
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Serialize as `name: value;` pairs
    pub fn to_css_text(&self) -> String {
        self.declarations.iter()
            .map(|d| {
                if d.important {
                    format!("{}: {} !important;", d.name, d.value)
                } else {
                    format!("{}: {};", d.name, d.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Write back to the element's `style` attribute, removing the
    /// attribute when no declarations remain
    pub fn apply(&self, tree: &mut DomTree, element: NodeId) -> DomResult<()> {
        if self.is_empty() {
            tree.remove_attribute(element, "style").map(|_| ())
        } else {
            tree.set_attribute(element, "style", &self.to_css_text())
        }
    }
}

/// Check that declaration text parses as a style attribute
pub fn validate(text: &str) -> Result<(), CssError> {
    let options = ParserOptions {
        error_recovery: false,
        ..ParserOptions::default()
    };
    StyleAttribute::parse(text, options)
        .map(|_| ())
        .map_err(|e| CssError::InvalidDeclarations {
            text: text.to_string(),
            reason: format!("{:?}", e.kind),
        })
}

/// Check a single `name: value` pair
pub fn validate_declaration(name: &str, value: &str) -> Result<(), CssError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate(&format!("{}: {}", normalize_property_name(name), value))
}

/// CSS property name for `name`: camelCase becomes kebab-case
/// (`backgroundColor` -> `background-color`, `WebkitTransform` ->
/// `-webkit-transform`); custom properties are left untouched.
pub fn normalize_property_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn strip_important(value: &str) -> (&str, bool) {
    let lower = value.to_ascii_lowercase();
    match lower.rfind('!') {
        Some(pos) if lower[pos + 1..].trim() == "important" => (value[..pos].trim_end(), true),
        _ => (value, false),
    }
}

/// Split on `;` outside of strings and parentheses
fn split_declarations(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                pieces.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);
    pieces.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

//! CSS Selectors
//!
//! Parses selector lists and matches them right-to-left against the DOM.

use genma_dom::{Document, NodeId};

use crate::CssError;
use crate::state;

/// A comma-separated list of complex selectors
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

/// Compound selectors joined by combinators.
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

/// Components that must all match one element
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSelector(pub Vec<SelectorComponent>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// A component of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (lowercase tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :checked, :nth-child(), etc.
    PseudoClass(PseudoClass),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (matcher, value) = match (&self.matcher, value) {
            (_, None) => return false,
            (None, Some(_)) => return true,
            (Some(matcher), Some(value)) => (matcher, value),
        };

        let fold = |s: &str| {
            if self.case_insensitive { s.to_lowercase() } else { s.to_string() }
        };
        let value = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => value == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                value.split_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                value == expected || value.starts_with(&format!("{expected}-"))
            }
            AttributeMatcher::Prefix(expected) => {
                !expected.is_empty() && value.starts_with(&fold(expected))
            }
            AttributeMatcher::Suffix(expected) => {
                !expected.is_empty() && value.ends_with(&fold(expected))
            }
            AttributeMatcher::Substring(expected) => {
                !expected.is_empty() && value.contains(&fold(expected))
            }
        }
    }
}

/// Pseudo-class type
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    // Link and user action
    Link,
    Visited,
    Hover,
    Active,
    Focus,
    FocusWithin,

    // Input
    Enabled,
    Disabled,
    Checked,
    Required,
    Optional,
    ReadOnly,
    ReadWrite,

    // Tree-structural
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),

    // Logical
    Not(SelectorList),
    Is(SelectorList),
    Has(SelectorList),

    // Rendering state (non-standard, as in jQuery)
    Visible,
    Hidden,
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, PartialEq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3"
    ///
    /// Whitespace is allowed only around the argument and around the sign
    /// before B.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::new(2, 1)),
            "even" => return Some(Self::new(2, 0)),
            _ => {}
        }

        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::new(0, n));
        }

        let (a, rest) = s.split_once('n')?;
        let a = match a {
            "" | "+" => 1,
            "-" => -1,
            a => a.parse().ok()?,
        };

        let rest = rest.trim_start();
        let b = if rest.is_empty() {
            0
        } else {
            let (negative, digits) = match (rest.strip_prefix('+'), rest.strip_prefix('-')) {
                (Some(digits), _) => (false, digits),
                (_, Some(digits)) => (true, digits),
                _ => return None,
            };
            let digits = digits.trim_start();
            if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let b: i64 = digits.parse().ok()?;
            i32::try_from(if negative { -b } else { b }).ok()?
        };

        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        let (a, b, n) = (i64::from(self.a), i64::from(self.b), i64::from(n));
        if a == 0 {
            return n == b;
        }

        let diff = n - b;
        if a > 0 {
            diff >= 0 && diff % a == 0
        } else {
            diff <= 0 && diff % a == 0
        }
    }
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, CssError> {
        let mut parser = Parser::new(input);
        let list = parser.selector_list()?;
        parser.skip_whitespace();
        if !parser.at_end() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(list)
    }

    /// Whether any selector in the list matches the element
    pub fn matches(&self, document: &Document, element: NodeId) -> bool {
        self.0.iter().any(|s| s.matches(document, element))
    }
}

impl ComplexSelector {
    pub fn matches(&self, document: &Document, element: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_at(document, n - 1, element),
        }
    }

    fn matches_at(&self, document: &Document, index: usize, element: NodeId) -> bool {
        if !self.compounds[index].matches(document, element) {
            return false;
        }
        if index == 0 {
            return true;
        }

        let tree = document.tree();
        let next = index - 1;
        match self.combinators[next] {
            Combinator::Child => parent_element(document, element)
                .is_some_and(|p| self.matches_at(document, next, p)),
            Combinator::Descendant => tree.ancestors(element)
                .filter(|&a| is_element(document, a))
                .any(|a| self.matches_at(document, next, a)),
            Combinator::NextSibling => previous_element_siblings(document, element)
                .next()
                .is_some_and(|s| self.matches_at(document, next, s)),
            Combinator::SubsequentSibling => previous_element_siblings(document, element)
                .any(|s| self.matches_at(document, next, s)),
        }
    }
}

impl CompoundSelector {
    pub fn matches(&self, document: &Document, element: NodeId) -> bool {
        is_element(document, element)
            && self.0.iter().all(|c| match_component(c, document, element))
    }
}

fn is_element(document: &Document, id: NodeId) -> bool {
    document.tree().get(id).is_some_and(|n| n.is_element())
}

fn parent_element(document: &Document, id: NodeId) -> Option<NodeId> {
    let parent = document.tree().get(id)?.parent;
    is_element(document, parent).then_some(parent)
}

fn previous_element_siblings<'a>(document: &'a Document, id: NodeId) -> impl Iterator<Item = NodeId> + 'a {
    let tree = document.tree();
    let first = tree.get(id).map_or(NodeId::NONE, |n| n.prev_sibling);
    std::iter::successors(tree.get(first).map(|_| first), move |&cur| {
        tree.get(cur).map(|n| n.prev_sibling).filter(|p| p.is_valid())
    })
    .filter(move |&s| is_element(document, s))
}

/// (1-based index, count) of an element among its element siblings,
/// optionally only those with the same tag
fn sibling_position(document: &Document, element: NodeId, same_type: bool) -> (i32, i32) {
    let tree = document.tree();
    let parent = tree.get(element).map_or(NodeId::NONE, |n| n.parent);
    if !parent.is_valid() {
        return (1, 1);
    }
    let tag = tree.tag_name(element);
    let siblings: Vec<NodeId> = tree.element_children(parent)
        .filter(|&s| !same_type || tree.tag_name(s) == tag)
        .collect();
    let index = siblings.iter().position(|&s| s == element).map_or(0, |p| p + 1);
    (index as i32, siblings.len() as i32)
}

/// Match a selector component against an element
pub fn match_component(component: &SelectorComponent, document: &Document, element: NodeId) -> bool {
    let tree = document.tree();
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => tree.tag_name(element) == Some(tag.as_str()),
        SelectorComponent::Id(id) => tree.get_attribute(element, "id") == Some(id.as_str()),
        SelectorComponent::Class(class) => tree.get_attribute(element, "class")
            .is_some_and(|c| c.split_whitespace().any(|t| t == class)),
        SelectorComponent::Attribute(attr) => attr.matches(tree.get_attribute(element, &attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match_pseudo_class(pseudo, document, element),
    }
}

/// Match a pseudo-class against an element
pub fn match_pseudo_class(pseudo: &PseudoClass, document: &Document, element: NodeId) -> bool {
    let tree = document.tree();
    match pseudo {
        PseudoClass::Link => state::is_link(document, element),
        PseudoClass::Visited | PseudoClass::Hover | PseudoClass::Active => false,
        PseudoClass::Focus => state::is_focused(document, element),
        PseudoClass::FocusWithin => document.focused
            .is_some_and(|f| tree.contains(element, f)),

        PseudoClass::Enabled => state::is_enabled(document, element),
        PseudoClass::Disabled => state::is_disabled(document, element),
        PseudoClass::Checked => state::is_checked(document, element),
        PseudoClass::Required => tree.has_attribute(element, "required"),
        PseudoClass::Optional => state::is_form_control(document, element)
            && !tree.has_attribute(element, "required"),
        PseudoClass::ReadOnly => !state::is_writable(document, element),
        PseudoClass::ReadWrite => state::is_writable(document, element),

        PseudoClass::Root => parent_element(document, element).is_none()
            && tree.get(element).is_some_and(|n| n.parent == NodeId::ROOT),
        PseudoClass::Empty => state::is_empty(document, element),
        PseudoClass::FirstChild => sibling_position(document, element, false).0 == 1,
        PseudoClass::LastChild => {
            let (index, count) = sibling_position(document, element, false);
            index == count
        }
        PseudoClass::OnlyChild => sibling_position(document, element, false).1 == 1,
        PseudoClass::FirstOfType => sibling_position(document, element, true).0 == 1,
        PseudoClass::LastOfType => {
            let (index, count) = sibling_position(document, element, true);
            index == count
        }
        PseudoClass::OnlyOfType => sibling_position(document, element, true).1 == 1,
        PseudoClass::NthChild(expr) => expr.matches(sibling_position(document, element, false).0),
        PseudoClass::NthLastChild(expr) => {
            let (index, count) = sibling_position(document, element, false);
            expr.matches(count - index + 1)
        }
        PseudoClass::NthOfType(expr) => expr.matches(sibling_position(document, element, true).0),
        PseudoClass::NthLastOfType(expr) => {
            let (index, count) = sibling_position(document, element, true);
            expr.matches(count - index + 1)
        }

        PseudoClass::Not(list) => !list.matches(document, element),
        PseudoClass::Is(list) => list.matches(document, element),
        PseudoClass::Has(list) => tree.descendants(element)
            .any(|d| list.matches(document, d)),

        PseudoClass::Visible => state::is_visible(document, element),
        PseudoClass::Hidden => !state::is_visible(document, element),
    }
}

/// Recursive-descent selector parser
struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, chars: input.chars().collect(), pos: 0 }
    }

    fn error(&self, reason: &str) -> CssError {
        CssError::InvalidSelector {
            selector: self.input.to_string(),
            reason: format!("{reason} at offset {}", self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn selector_list(&mut self) -> Result<SelectorList, CssError> {
        let mut selectors = vec![self.complex()?];
        loop {
            self.skip_whitespace();
            if !self.eat(',') {
                break;
            }
            selectors.push(self.complex()?);
        }
        Ok(SelectorList(selectors))
    }

    fn complex(&mut self) -> Result<ComplexSelector, CssError> {
        self.skip_whitespace();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(',') | Some(')') | None => break,
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.error("expected combinator")),
            };
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn compound(&mut self) -> Result<CompoundSelector, CssError> {
        let mut components = Vec::new();

        if self.eat('*') {
            components.push(SelectorComponent::Universal);
        } else if self.peek().is_some_and(is_ident_start) {
            components.push(SelectorComponent::Type(self.ident()?.to_ascii_lowercase()));
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Id(self.ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Class(self.ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Attribute(self.attribute()?));
                }
                Some(':') => {
                    self.pos += 1;
                    if self.peek() == Some(':') {
                        return Err(self.error("pseudo-elements never match elements"));
                    }
                    components.push(SelectorComponent::PseudoClass(self.pseudo_class()?));
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return Err(self.error("expected selector"));
        }
        Ok(CompoundSelector(components))
    }

    fn ident(&mut self) -> Result<String, CssError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                match self.peek() {
                    Some(escaped) => {
                        out.push(escaped);
                        self.pos += 1;
                    }
                    None => return Err(self.error("dangling escape")),
                }
            } else if is_ident_char(c) {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(self.error("expected identifier"));
        }
        Ok(out)
    }

    fn string(&mut self, quote: char) -> Result<String, CssError> {
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some('\\') => {
                    self.pos += 1;
                    if let Some(c) = self.peek() {
                        out.push(c);
                        self.pos += 1;
                    }
                }
                Some(c) => {
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn attribute(&mut self) -> Result<AttributeSelector, CssError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.eat(']') {
            return Ok(AttributeSelector { name, matcher: None, case_insensitive: false });
        }

        let op = match self.peek() {
            Some('=') => None,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.pos += 1;
                Some(c)
            }
            _ => return Err(self.error("expected attribute operator")),
        };
        if !self.eat('=') {
            return Err(self.error("expected '='"));
        }
        self.skip_whitespace();

        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                self.string(q)?
            }
            _ => self.ident()?,
        };
        self.skip_whitespace();

        let mut case_insensitive = false;
        if let Some(flag) = self.peek().filter(|c| matches!(c, 'i' | 'I' | 's' | 'S')) {
            case_insensitive = flag.eq_ignore_ascii_case(&'i');
            self.pos += 1;
            self.skip_whitespace();
        }
        if !self.eat(']') {
            return Err(self.error("expected ']'"));
        }

        let matcher = match op {
            None => AttributeMatcher::Exact(value),
            Some('~') => AttributeMatcher::Contains(value),
            Some('|') => AttributeMatcher::DashMatch(value),
            Some('^') => AttributeMatcher::Prefix(value),
            Some('$') => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };
        Ok(AttributeSelector { name, matcher: Some(matcher), case_insensitive })
    }

    /// Raw text up to the matching ')', which is consumed
    fn argument(&mut self) -> Result<String, CssError> {
        let mut depth = 0usize;
        let mut out = String::new();
        let mut quote = None;
        while let Some(c) = self.peek() {
            self.pos += 1;
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '(') => depth += 1,
                (None, ')') if depth == 0 => return Ok(out),
                (None, ')') => depth -= 1,
                _ => {}
            }
            out.push(c);
        }
        Err(self.error("unbalanced parentheses"))
    }

    fn pseudo_class(&mut self) -> Result<PseudoClass, CssError> {
        let name = self.ident()?.to_ascii_lowercase();

        if self.eat('(') {
            let arg = self.argument()?;
            let nth = || NthExpression::parse(&arg).ok_or_else(|| self.error("invalid An+B expression"));
            return match name.as_str() {
                "nth-child" => Ok(PseudoClass::NthChild(nth()?)),
                "nth-last-child" => Ok(PseudoClass::NthLastChild(nth()?)),
                "nth-of-type" => Ok(PseudoClass::NthOfType(nth()?)),
                "nth-last-of-type" => Ok(PseudoClass::NthLastOfType(nth()?)),
                "not" => Ok(PseudoClass::Not(SelectorList::parse(&arg)?)),
                "is" | "where" | "matches" => Ok(PseudoClass::Is(SelectorList::parse(&arg)?)),
                "has" => Ok(PseudoClass::Has(SelectorList::parse(&arg)?)),
                _ => Err(self.error(&format!("unknown functional pseudo-class ':{name}()'"))),
            };
        }

        let pseudo = match name.as_str() {
            "link" | "any-link" => PseudoClass::Link,
            "visited" => PseudoClass::Visited,
            "hover" => PseudoClass::Hover,
            "active" => PseudoClass::Active,
            "focus" => PseudoClass::Focus,
            "focus-within" => PseudoClass::FocusWithin,
            "enabled" => PseudoClass::Enabled,
            "disabled" => PseudoClass::Disabled,
            "checked" => PseudoClass::Checked,
            "required" => PseudoClass::Required,
            "optional" => PseudoClass::Optional,
            "read-only" => PseudoClass::ReadOnly,
            "read-write" => PseudoClass::ReadWrite,
            "root" => PseudoClass::Root,
            "empty" => PseudoClass::Empty,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "only-of-type" => PseudoClass::OnlyOfType,
            "visible" => PseudoClass::Visible,
            "hidden" => PseudoClass::Hidden,
            _ => return Err(self.error(&format!("unknown pseudo-class ':{name}'"))),
        };
        Ok(pseudo)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '\\' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_expression_parse() {
        assert_eq!(NthExpression::parse("odd"), Some(NthExpression::new(2, 1)));
        assert_eq!(NthExpression::parse("even"), Some(NthExpression::new(2, 0)));
        assert_eq!(NthExpression::parse("3"), Some(NthExpression::new(0, 3)));
        assert_eq!(NthExpression::parse("2n"), Some(NthExpression::new(2, 0)));
        assert_eq!(NthExpression::parse("2n+1"), Some(NthExpression::new(2, 1)));
        assert_eq!(NthExpression::parse("-n+3"), Some(NthExpression::new(-1, 3)));
        assert_eq!(NthExpression::parse("n-1"), Some(NthExpression::new(1, -1)));
        assert_eq!(NthExpression::parse("x"), None);
    }

    #[test]
    fn test_nth_expression_whitespace() {
        assert_eq!(NthExpression::parse(" 2n + 1 "), Some(NthExpression::new(2, 1)));
        assert_eq!(NthExpression::parse("-n - 2"), Some(NthExpression::new(-1, -2)));
        assert_eq!(NthExpression::parse("2 n + 1 0"), None);
        assert_eq!(NthExpression::parse("2n + 1 0"), None);
        assert_eq!(NthExpression::parse("2n+ -1"), None);
        assert_eq!(NthExpression::parse("2n 1"), None);
    }

    #[test]
    fn test_nth_expression_extreme_offsets() {
        let low = NthExpression::parse("2n-2147483648").unwrap();
        assert_eq!(low, NthExpression::new(2, i32::MIN));
        assert!(low.matches(2));
        assert!(!low.matches(1));

        let high = NthExpression::new(-1, i32::MAX);
        assert!(high.matches(1));
        assert!(NthExpression::new(-1, i32::MIN).matches(i32::MIN));
        assert!(!NthExpression::new(-1, i32::MIN).matches(1));
        assert_eq!(NthExpression::parse("n+2147483648"), None);
    }

    #[test]
    fn test_nth_expression_matches() {
        let odd = NthExpression::new(2, 1);
        assert!(odd.matches(1));
        assert!(!odd.matches(2));
        let first_three = NthExpression::new(-1, 3);
        assert!(first_three.matches(3));
        assert!(!first_three.matches(4));
    }

    #[test]
    fn test_parse_compound() {
        let list = SelectorList::parse("div#app.main[data-id='1']:first-child").unwrap();
        let compound = &list.0[0].compounds[0].0;
        assert_eq!(compound[0], SelectorComponent::Type("div".into()));
        assert_eq!(compound[1], SelectorComponent::Id("app".into()));
        assert_eq!(compound[2], SelectorComponent::Class("main".into()));
        assert!(matches!(compound[3], SelectorComponent::Attribute(_)));
        assert_eq!(compound[4], SelectorComponent::PseudoClass(PseudoClass::FirstChild));
    }

    #[test]
    fn test_parse_combinators() {
        let list = SelectorList::parse("ul > li + li ~ p a").unwrap();
        assert_eq!(
            list.0[0].combinators,
            vec![
                Combinator::Child,
                Combinator::NextSibling,
                Combinator::SubsequentSibling,
                Combinator::Descendant,
            ]
        );
    }

    #[test]
    fn test_parse_list_and_not() {
        let list = SelectorList::parse("a, :not(.x, .y) ,b").unwrap();
        assert_eq!(list.0.len(), 3);
        assert!(matches!(
            list.0[1].compounds[0].0[0],
            SelectorComponent::PseudoClass(PseudoClass::Not(_))
        ));
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "#", "div >", "[x=", "a::before", ":bogus", ":nth-child(x)", "a)"] {
            assert!(SelectorList::parse(bad).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_attribute_selector_matchers() {
        let sel = |m: AttributeMatcher| AttributeSelector {
            name: "x".into(),
            matcher: Some(m),
            case_insensitive: false,
        };
        assert!(sel(AttributeMatcher::Prefix("btn-".into())).matches(Some("btn-primary")));
        assert!(!sel(AttributeMatcher::Prefix("btn-".into())).matches(Some("button")));
        assert!(sel(AttributeMatcher::Contains("b".into())).matches(Some("a b c")));
        assert!(sel(AttributeMatcher::DashMatch("en".into())).matches(Some("en-US")));
        assert!(!sel(AttributeMatcher::Exact("text".into())).matches(Some("TEXT")));
        assert!(!sel(AttributeMatcher::Exact("text".into())).matches(None));

        let insensitive = AttributeSelector {
            name: "x".into(),
            matcher: Some(AttributeMatcher::Exact("text".into())),
            case_insensitive: true,
        };
        assert!(insensitive.matches(Some("TEXT")));
    }
}

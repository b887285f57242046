//! Searching a subtree by attribute predicates.
use std::cmp::Ordering;

use crate::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How an attribute's value is compared with the value searched for.
pub enum Condition {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// Any other operator. The starting node isn't evaluated and it's descendants are searched
    /// with [`Condition::Equal`].
    DescendantsOnly,
}

impl From<&str> for Condition {
    fn from(value: &str) -> Self {
        match value.trim() {
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            ">" => Self::Greater,
            ">=" => Self::GreaterOrEqual,
            "<" => Self::Less,
            "<=" => Self::LessOrEqual,
            other => {
                log::warn!("unknown comparison `{other}`, only descendants will be searched");
                Self::DescendantsOnly
            }
        }
    }
}

impl Condition {
    /// Compares the `actual` value of an attribute against the `expected` value.
    ///
    /// Always false for [`Condition::DescendantsOnly`].
    pub fn evaluate(self, actual: &str, expected: &str) -> bool {
        let ordering = loose_cmp(actual, expected);
        match self {
            Self::Equal => ordering.is_eq(),
            Self::NotEqual => ordering.is_ne(),
            Self::Greater => ordering.is_gt(),
            Self::GreaterOrEqual => ordering.is_ge(),
            Self::Less => ordering.is_lt(),
            Self::LessOrEqual => ordering.is_le(),
            Self::DescendantsOnly => false,
        }
    }
}

/// Compares two values as numbers when both are numeric, otherwise by their bytes.
pub fn loose_cmp(a: &str, b: &str) -> Ordering {
    match (parse_numeric(a), parse_numeric(b)) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// Parses a decimal number with optional surrounding whitespace, sign, fraction and exponent.
///
/// Unlike [`str::parse`], words such as `inf` or `NaN` are not numbers.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let value = value.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let bytes = value.as_bytes();
    let mut i = 0;
    let digits = |i: &mut usize| {
        let start = *i;
        while bytes.get(*i).is_some_and(u8::is_ascii_digit) {
            *i += 1;
        }
        *i - start
    };

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let mut mantissa = digits(&mut i);
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        mantissa += digits(&mut i);
    }
    if mantissa == 0 {
        return None;
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if digits(&mut i) == 0 {
            return None;
        }
    }
    if i != bytes.len() {
        return None;
    }
    value.parse().ok()
}

impl Node {
    /// Returns the first element, searching depth-first from this node, whose attribute loosely
    /// equals `value`.
    ///
    /// An empty `value` matches elements without the attribute.
    pub fn find_first_by_attribute(&self, attr: &str, value: &str) -> Option<Node> {
        if !self.is_element() {
            return None;
        }
        if Condition::Equal.evaluate(&self.get_attribute(attr), value) {
            log::trace!("found <{}> where {attr}={value}", self.node_name());
            return Some(self.clone());
        }
        self.children()
            .iter()
            .find_map(|child| child.find_first_by_attribute(attr, value))
    }

    /// Returns the first element with the given `id`
    ///
    /// [MDN | getElementById](https://developer.mozilla.org/en-US/docs/Web/API/Document/getElementById)
    pub fn find_by_id(&self, id: &str) -> Option<Node> {
        self.find_first_by_attribute("id", id)
    }

    /// Returns every element of the subtree, in document order, whose attribute satisfies the
    /// condition against `value`.
    ///
    /// An unrecognized condition skips this node and searches it's descendants for equality.
    ///
    /// ```
    /// use svgdoc_ast::{document::Document, query::Condition};
    ///
    /// let document = Document::parse(
    ///     r#"<svg><rect width="5"/><rect width="10"/><rect width="20"/></svg>"#,
    /// ).unwrap();
    /// let wide = document.root().find_all_by_attribute("width", "9", ">=");
    /// assert_eq!(wide.len(), 2);
    /// ```
    pub fn find_all_by_attribute(
        &self,
        attr: &str,
        value: &str,
        condition: impl Into<Condition>,
    ) -> Vec<Node> {
        let mut matches = vec![];
        self.collect_by_attribute(attr, value, condition.into(), &mut matches);
        matches
    }

    fn collect_by_attribute(
        &self,
        attr: &str,
        value: &str,
        condition: Condition,
        matches: &mut Vec<Node>,
    ) {
        if !self.is_element() {
            return;
        }
        let condition = match condition {
            Condition::DescendantsOnly => Condition::Equal,
            condition => {
                if condition.evaluate(&self.get_attribute(attr), value) {
                    matches.push(self.clone());
                }
                condition
            }
        };
        for child in self.children() {
            child.collect_by_attribute(attr, value, condition, matches);
        }
    }
}

#[cfg(test)]
use crate::document::Document;

#[test]
fn numeric_and_lexical_comparison() {
    assert!(Condition::Greater.evaluate("10", "9"));
    assert!(Condition::Greater.evaluate("b", "a"));
    assert!(Condition::Less.evaluate("10", "9a"), "mixed values compare lexically");
    assert!(Condition::Equal.evaluate("1.0", "1"));
    assert!(Condition::Equal.evaluate(" 1e1", "10"));
    assert!(Condition::NotEqual.evaluate("inf", "1"));
    assert!(!Condition::DescendantsOnly.evaluate("a", "a"));

    assert_eq!(parse_numeric("-.5"), Some(-0.5));
    assert_eq!(parse_numeric("5."), Some(5.0));
    assert_eq!(parse_numeric("NaN"), None);
    assert_eq!(parse_numeric("1e"), None);
    assert_eq!(parse_numeric("."), None);
    assert_eq!(parse_numeric(""), None);
}

#[test]
fn condition_from_operator() {
    assert_eq!(Condition::from("=="), Condition::Equal);
    assert_eq!(Condition::from(" <= "), Condition::LessOrEqual);
    assert_eq!(Condition::from("="), Condition::DescendantsOnly);
    assert_eq!(Condition::from("~="), Condition::DescendantsOnly);
}

#[test]
fn find_by_class() -> anyhow::Result<()> {
    let document = Document::parse(
        r#"<svg><rect id="1" class="a"/><g><rect id="2" class="b"/><rect id="3" class="a"/></g></svg>"#,
    )?;
    let ids = |nodes: Vec<Node>| nodes.iter().map(Node::id).collect::<Vec<_>>();

    assert_eq!(
        ids(document.root().find_all_by_attribute("class", "a", "==")),
        vec!["1", "3"]
    );
    assert_eq!(
        document
            .root()
            .find_first_by_attribute("class", "a")
            .map(|node| node.id()),
        Some("1".into())
    );
    assert_eq!(
        ids(document.root().find_all_by_attribute("class", "a", "!=")),
        vec!["", "", "2"],
        "svg and g have no class"
    );
    assert_eq!(document.root().find_first_by_attribute("class", "c"), None);
    assert!(document
        .root()
        .find_all_by_attribute("class", "c", "==")
        .is_empty());
    Ok(())
}

#[test]
fn empty_value_matches_absent() -> anyhow::Result<()> {
    let document = Document::parse(r#"<svg><rect fill="red"/><circle/></svg>"#)?;
    let names: Vec<_> = document
        .root()
        .find_all_by_attribute("fill", "", "==")
        .iter()
        .map(Node::node_name)
        .collect();
    assert_eq!(names, vec!["svg", "circle"], "each node is only matched once");
    Ok(())
}

#[test]
fn unknown_condition_skips_starting_node() -> anyhow::Result<()> {
    let document =
        Document::parse(r#"<svg class="a"><g class="a"><rect class="a"/></g></svg>"#)?;
    let names: Vec<_> = document
        .root()
        .find_all_by_attribute("class", "a", "=")
        .iter()
        .map(Node::node_name)
        .collect();
    assert_eq!(names, vec!["g", "rect"]);

    let names: Vec<_> = document
        .root()
        .find_all_by_attribute("class", "a", Condition::Equal)
        .iter()
        .map(Node::node_name)
        .collect();
    assert_eq!(names, vec!["svg", "g", "rect"]);
    Ok(())
}

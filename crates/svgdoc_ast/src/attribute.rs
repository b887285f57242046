//! Attribute storage for elements.
use std::fmt::Display;

use crate::name::QualName;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Represents one of an element's attributes.
///
/// [MDN | Attr](https://developer.mozilla.org/en-US/docs/Web/API/Attr)
pub struct Attr {
    /// The qualified name of the attribute
    pub name: QualName,
    /// The value of the attribute, which is never empty while stored
    pub value: String,
}

impl Attr {
    /// Creates an attribute from a name and value
    pub fn new(name: QualName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    /// Returns the local part of the qualified name of an attribute.
    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    /// Returns the namespace of the attribute, if any
    pub fn namespace(&self) -> Option<&str> {
        self.name.ns.as_deref()
    }

    /// Returns a formatter that writes the attribute as `name=value`
    pub fn formatter(&self) -> Formatter<'_> {
        Formatter(self)
    }
}

/// Formats an attribute as `name=value`
pub struct Formatter<'a>(&'a Attr);

impl Display for Formatter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}={}", self.0.name, self.0.value))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// An ordered collection of [Attr] keyed by namespace and local-name.
///
/// A plain attribute and a namespaced attribute sharing a local-name are separate entries.
/// Empty values are never stored; setting one removes the attribute instead.
///
/// [MDN | NamedNodeMap](https://developer.mozilla.org/en-US/docs/Web/API/NamedNodeMap)
pub struct Attributes(Vec<Attr>);

impl Attributes {
    /// Creates an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of attributes stored in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are any attributes stored in the collection
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value of the attribute with the given namespace and local-name
    pub fn get(&self, ns: Option<&str>, local: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|attr| attr.name.matches(ns, local))
            .map(|attr| attr.value.as_str())
    }

    /// Puts the attribute in the collection, replacing the value of an existing attribute with
    /// the same namespace and local-name while keeping it's position.
    ///
    /// An empty value removes the attribute.
    pub fn set(&mut self, name: QualName, value: &str) -> Option<Attr> {
        if value.is_empty() {
            return self.remove(name.ns.as_deref(), &name.local);
        }
        if let Some(existing) = self
            .0
            .iter_mut()
            .find(|attr| attr.name.matches(name.ns.as_deref(), &name.local))
        {
            let old = existing.clone();
            existing.name.prefix = name.prefix;
            existing.value = value.into();
            return Some(old);
        }
        self.0.push(Attr::new(name, value));
        None
    }

    /// Removes the attribute, returning it if it was present
    pub fn remove(&mut self, ns: Option<&str>, local: &str) -> Option<Attr> {
        let index = self
            .0
            .iter()
            .position(|attr| attr.name.matches(ns, local))?;
        Some(self.0.remove(index))
    }

    /// Returns an iterator over each attribute in the collection.
    pub fn iter(&self) -> std::slice::Iter<'_, Attr> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attr;
    type IntoIter = std::slice::Iter<'a, Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[test]
fn set_overwrites_in_place() {
    let mut attrs = Attributes::new();
    attrs.set(QualName::local("x"), "1");
    attrs.set(QualName::local("y"), "2");
    assert_eq!(attrs.set(QualName::local("x"), "3").map(|a| a.value), Some("1".into()));

    let order: Vec<_> = attrs.iter().map(|a| a.formatter().to_string()).collect();
    assert_eq!(order, vec!["x=3", "y=2"]);
}

#[test]
fn empty_value_removes() {
    let mut attrs = Attributes::new();
    attrs.set(QualName::local("fill"), "red");
    attrs.set(QualName::local("fill"), "");
    assert_eq!(attrs.get(None, "fill"), None);
    assert!(attrs.is_empty());

    // removing an absent attribute is a no-op
    assert_eq!(attrs.remove(None, "fill"), None);
}

#[test]
fn namespaced_and_plain_are_distinct() {
    let mut attrs = Attributes::new();
    attrs.set(QualName::local("href"), "plain");
    attrs.set(
        QualName::new(Some("xlink"), "href", Some(crate::name::XLINK_NS)),
        "linked",
    );
    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs.get(None, "href"), Some("plain"));
    assert_eq!(attrs.get(Some(crate::name::XLINK_NS), "href"), Some("linked"));

    attrs.set(QualName::local("href"), "");
    assert_eq!(attrs.get(None, "href"), None);
    assert_eq!(attrs.get(Some(crate::name::XLINK_NS), "href"), Some("linked"));
}

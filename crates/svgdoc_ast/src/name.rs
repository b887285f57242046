//! XML qualified name types.
use std::fmt::Display;

/// The namespace of SVG elements
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
/// The namespace of `xlink:*` attributes
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
/// The namespace implicitly bound to the `xml` prefix
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
/// The namespace of `xmlns` declarations
pub const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// A qualified name used for the names of tags and attributes.
///
/// Two names refer to the same attribute when their namespace and local part match; the
/// prefix is only kept so the name can be written back out.
pub struct QualName {
    /// The prefix (e.g. `xlink` of `xlink:href`) of a qualified name.
    pub prefix: Option<String>,
    /// The local name (e.g. the `href` of `xlink:href`) of a qualified name.
    pub local: String,
    /// The resolved uri of the name
    pub ns: Option<String>,
}

impl QualName {
    /// Creates a qualified name without a namespace
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
            ns: None,
        }
    }

    /// Creates a qualified name from each of it's parts
    pub fn new(prefix: Option<&str>, local: &str, ns: Option<&str>) -> Self {
        Self {
            prefix: prefix.map(String::from),
            local: local.into(),
            ns: ns.map(String::from),
        }
    }

    /// Splits a string on the first `:` into a prefix and local-name.
    ///
    /// The namespace is left unresolved.
    pub fn parse(value: &str) -> Self {
        match split_prefix(value) {
            (Some(prefix), local) => Self::new(Some(prefix), local, None),
            (None, local) => Self::local(local),
        }
    }

    /// Whether the name refers to the given namespace and local-name
    pub fn matches(&self, ns: Option<&str>, local: &str) -> bool {
        self.ns.as_deref() == ns && self.local == local
    }

    /// returns a formatter to implement [Display] for a name
    pub fn formatter(&self) -> Formatter<'_> {
        Formatter(self)
    }
}

/// Splits a name on the first `:`, returning the prefix if there is one.
pub fn split_prefix(value: &str) -> (Option<&str>, &str) {
    match value.split_once(':') {
        Some((prefix, local)) if !prefix.is_empty() => (Some(prefix), local),
        _ => (None, value),
    }
}

/// Formats the contained qualified name
pub struct Formatter<'a>(&'a QualName);

impl Display for Formatter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0.prefix {
            Some(p) => f.write_fmt(format_args!("{p}:{}", self.0.local)),
            None => f.write_str(&self.0.local),
        }
    }
}

impl Display for QualName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.formatter().fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// A namespace declared on an element, such as `xmlns:xlink="http://www.w3.org/1999/xlink"`
pub struct Namespace {
    /// The declared prefix, or [None] for the default namespace
    pub prefix: Option<String>,
    /// The uri the prefix is bound to
    pub uri: String,
}

impl Namespace {
    /// Creates a namespace declaration
    pub fn new(prefix: Option<&str>, uri: &str) -> Self {
        Self {
            prefix: prefix.map(String::from),
            uri: uri.into(),
        }
    }

    /// The name of the attribute used to declare the namespace, e.g. `xmlns:xlink`
    pub fn attribute_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => String::from("xmlns"),
        }
    }
}

#[test]
fn parse() {
    assert_eq!(QualName::parse("xlink:href"), QualName::new(Some("xlink"), "href", None));
    assert_eq!(QualName::parse("href"), QualName::local("href"));
    assert_eq!(QualName::parse(":href"), QualName::local(":href"));
    assert_eq!(
        QualName::parse("a:b:c"),
        QualName::new(Some("a"), "b:c", None),
        "only the first colon separates the prefix"
    );
    assert_eq!(QualName::parse("xlink:href").to_string(), "xlink:href");
}

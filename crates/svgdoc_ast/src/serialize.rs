//! Writing trees as XML text.
use std::{fmt::Display, io::Write};

use crate::{
    name::{Namespace, XML_NS},
    node::{Node, NodeData},
    xmlwriter::{self, Indent, XmlWriter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a tree is written as XML.
pub struct Options {
    /// Whether each element is written on it's own line, indented by two spaces.
    ///
    /// Whitespace-only text is dropped, and elements containing text are written on a single
    /// line so their text is kept exactly.
    ///
    /// Default: disabled
    pub pretty: bool,
    /// Whether the `<?xml version="1.0" encoding="UTF-8"?>` declaration is written first.
    ///
    /// Default: enabled
    pub prolog: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pretty: false,
            prolog: true,
        }
    }
}

impl From<Options> for xmlwriter::Options {
    fn from(value: Options) -> Self {
        Self {
            indent: if value.pretty {
                Indent::Spaces(2)
            } else {
                Indent::None
            },
            ..Self::default()
        }
    }
}

impl Node {
    /// Serializes the node and it's descendants as an XML string.
    ///
    /// # Errors
    ///
    /// If the node isn't an element
    pub fn to_xml(&self, options: Options) -> Result<String, xmlwriter::Error> {
        let bytes = self.serialize_into(Vec::new(), options)?;
        String::from_utf8(bytes).map_err(xmlwriter::Error::UTF8)
    }

    /// Serializes the node and it's descendants into the writer, returning the writer once
    /// done.
    ///
    /// Namespaces used by the subtree but declared by the node's ancestors are declared on the
    /// node, so the output can be parsed on it's own.
    ///
    /// # Errors
    ///
    /// If the node isn't an element, or if writing fails
    pub fn serialize_into<W: Write>(
        &self,
        writer: W,
        options: Options,
    ) -> Result<W, xmlwriter::Error> {
        let mut xml = XmlWriter::new(writer, options.into());
        if options.prolog {
            xml.write_declaration()?;
        }
        let inherited = self.inherited_namespaces();
        self.write_node(&mut xml, options.pretty, &inherited)?;
        xml.end_document()
    }

    fn write_node<W: Write>(
        &self,
        xml: &mut XmlWriter<W>,
        pretty: bool,
        inherited: &[Namespace],
    ) -> xmlwriter::Result {
        match self.data() {
            NodeData::Text(text) => {
                let text = text.borrow();
                if pretty && !xml.preserve_whitespaces() && text.trim().is_empty() {
                    return Ok(());
                }
                xml.write_text(text.as_str())
            }
            NodeData::Comment(comment) => xml.write_comment(&comment.borrow()),
            NodeData::Element(data) => {
                xml.start_element(&data.name.to_string())?;
                for ns in inherited.iter().chain(data.namespaces.borrow().iter()) {
                    xml.write_attribute(&ns.attribute_name(), &ns.uri)?;
                }
                for attr in data.attributes.borrow().iter() {
                    xml.write_attribute(&attr.name.to_string(), &attr.value)?;
                }

                let preserve = xml.preserve_whitespaces();
                if pretty && !preserve && self.keeps_whitespace() {
                    xml.set_preserve_whitespaces(true);
                }
                for child in self.child_nodes() {
                    child.write_node(xml, pretty, &[])?;
                }
                xml.end_element()?;
                xml.set_preserve_whitespaces(preserve);
                Ok(())
            }
        }
    }

    /// Returns the namespaces used in the subtree which are only bound outside of it
    fn inherited_namespaces(&self) -> Vec<Namespace> {
        let mut inherited = vec![];
        self.collect_inherited_namespaces(self, &mut inherited);
        inherited
    }

    fn collect_inherited_namespaces(&self, top: &Node, inherited: &mut Vec<Namespace>) {
        let Some(data) = self.element_data() else {
            return;
        };
        let used: Vec<_> = std::iter::once(data.name.clone())
            .chain(data.attributes.borrow().iter().map(|attr| attr.name.clone()))
            .filter_map(|name| Some((name.prefix, name.ns?)))
            .filter(|(prefix, uri)| prefix.as_deref() != Some("xml") && uri != XML_NS)
            .collect();
        for (prefix, uri) in used {
            if self.declared_within(top, prefix.as_deref())
                || inherited.iter().any(|ns| ns.prefix == prefix)
            {
                continue;
            }
            inherited.push(Namespace::new(prefix.as_deref(), &uri));
        }
        for child in self.children() {
            child.collect_inherited_namespaces(top, inherited);
        }
    }

    /// Whether the prefix is declared by this node or an ancestor up to and including `top`
    fn declared_within(&self, top: &Node, prefix: Option<&str>) -> bool {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node.namespaces().iter().any(|ns| ns.prefix.as_deref() == prefix) {
                return true;
            }
            if node.ptr_eq(top) {
                return false;
            }
            current = node.parent_node();
        }
        false
    }

    /// Whether the children are written inline, as they are when text is content
    fn keeps_whitespace(&self) -> bool {
        matches!(self.local_name(), "text" | "tspan" | "textPath")
            || self.get_attribute_ns(Some(XML_NS), "space") == "preserve"
            || self.child_nodes().iter().any(|child| {
                matches!(child.data(), NodeData::Text(text) if !text.borrow().trim().is_empty())
            })
    }
}

impl Display for Node {
    /// Writes the node compactly, without the xml declaration
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let xml = self
            .to_xml(Options {
                pretty: false,
                prolog: false,
            })
            .map_err(|_| std::fmt::Error)?;
        f.write_str(&xml)
    }
}

#[cfg(test)]
use crate::document::Document;

#[test]
fn compact() -> anyhow::Result<()> {
    let document = Document::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
    <g fill="red">
        <text x="1">  spaced  </text>
        <!-- note -->
    </g>
</svg>"#,
    )?;
    insta::assert_snapshot!(
        document.to_xml(Options::default())?,
        @r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <svg xmlns="http://www.w3.org/2000/svg"><g fill="red"><text x="1">  spaced  </text><!-- note --></g></svg>
    "#
    );
    assert_eq!(
        document.root().to_string(),
        r#"<svg xmlns="http://www.w3.org/2000/svg"><g fill="red"><text x="1">  spaced  </text><!-- note --></g></svg>"#
    );
    Ok(())
}

#[test]
fn pretty() -> anyhow::Result<()> {
    let document = Document::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><g fill="red"><text x="1">Hello <tspan>world</tspan></text><!-- note --><rect/></g></svg>"#,
    )?;
    assert_eq!(
        document.to_xml(Options {
            pretty: true,
            prolog: false
        })?,
        r#"<svg xmlns="http://www.w3.org/2000/svg">
  <g fill="red">
    <text x="1">Hello <tspan>world</tspan></text>
    <!-- note -->
    <rect/>
  </g>
</svg>
"#
    );

    let source = r#"<svg><text><tspan>a</tspan> <tspan>b</tspan></text><g xml:space="preserve"> <rect/></g></svg>"#;
    let pretty = Document::parse(source)?.to_xml(Options {
        pretty: true,
        prolog: false,
    })?;
    assert_eq!(
        pretty,
        r#"<svg>
  <text><tspan>a</tspan> <tspan>b</tspan></text>
  <g xml:space="preserve"> <rect/></g>
</svg>
"#
    );
    assert_eq!(Document::parse(&pretty)?.root().to_string(), source);
    Ok(())
}

#[test]
fn namespaces_written_first() -> anyhow::Result<()> {
    let document = Document::new();
    let root = document.root();
    root.set_attribute_ns(Some(crate::name::XLINK_NS), "xlink:title", "a\nb");
    insta::assert_snapshot!(
        root.to_string(),
        @r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="210mm" height="297mm" version="1.1" xlink:title="a&#10;b"/>"#
    );
    Ok(())
}

#[test]
fn subtree_declares_inherited_namespaces() -> anyhow::Result<()> {
    let document = Document::parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><g><use xlink:href="#a" xml:space="preserve"/></g></svg>"##,
    )?;
    let g = document.root().children()[0].clone();
    let xml = g.to_string();
    insta::assert_snapshot!(
        xml,
        @r##"<g xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a" xml:space="preserve"/></g>"##
    );

    let reparsed = Document::parse(&xml)?;
    assert_eq!(reparsed.root().to_string(), xml);
    assert_eq!(
        document.root().to_string(),
        r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><g><use xlink:href="#a" xml:space="preserve"/></g></svg>"##,
        "declarations aren't repeated below the node being written"
    );
    Ok(())
}

//! Parsing methods using roxmltree
//!
//! # Quirks
//!
//! Roxmltree has some notable quirks
//!
//! - Processing instructions and the doctype are skipped
//! - Duplicate namespace uris are merged
use std::rc::Rc;

use crate::{
    arena::Allocator,
    error::ParseError,
    name::{QualName, XML_NS},
    node::Node,
};

const MAX_DEPTH: u32 = 1024;

/// parse an xml document using roxmltree as the parser.
///
/// # Errors
///
/// If the string cannot be parsed
pub(crate) fn parse(source: &str, allocator: &Rc<Allocator>) -> Result<Node, ParseError> {
    let xml = roxmltree::Document::parse_with_options(
        source,
        roxmltree::ParsingOptions {
            // WARN: DOS risk
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        },
    )
    .map_err(ParseError::ROXML)?;
    parse_roxmltree(&xml, allocator)
}

/// parse an xml document already in roxmltree representation
///
/// # Errors
///
/// If the depth of the tree is too deep
fn parse_roxmltree(
    xml: &roxmltree::Document,
    allocator: &Rc<Allocator>,
) -> Result<Node, ParseError> {
    let Some(xml_root) = xml.root().children().find(roxmltree::Node::is_element) else {
        return Err(ParseError::NoElementInDocument);
    };
    let root = parse_element(allocator, xml_root);
    parse_xml_node_children(&root, allocator, xml_root, 1)?;
    log::debug!("parsed document with root <{}>", root.node_name());
    Ok(root)
}

/// Whether whitespace between the children of the element is content, as it is within text
/// elements or an `xml:space="preserve"` scope
fn is_whitespace_significant(element: roxmltree::Node<'_, '_>) -> bool {
    let in_text = element.ancestors().any(|n| {
        n.is_element() && matches!(n.tag_name().name(), "text" | "tspan" | "textPath")
    });
    in_text
        || element
            .ancestors()
            .find_map(|n| n.attribute((XML_NS, "space")))
            .is_some_and(|space| space == "preserve")
}

fn parse_xml_node_children(
    node: &Node,
    allocator: &Rc<Allocator>,
    parent: roxmltree::Node<'_, '_>,
    depth: u32,
) -> Result<(), ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::NodesLimitReached);
    }

    let preserve_whitespace = allocator.options().preserve_whitespace
        || !parent.children().any(|n| n.is_element())
        || is_whitespace_significant(parent);
    for xml_child in parent.children() {
        match xml_child.node_type() {
            roxmltree::NodeType::Element => {
                let child = parse_element(allocator, xml_child);
                node.attach(child.clone());
                parse_xml_node_children(&child, allocator, xml_child, depth + 1)?;
            }
            roxmltree::NodeType::Text => {
                let text = xml_child.text().unwrap_or_default();
                if preserve_whitespace || !text.trim().is_empty() {
                    node.attach(Node::new_text(text, allocator));
                }
            }
            roxmltree::NodeType::Comment => {
                let comment = xml_child.text().unwrap_or_default();
                node.attach(Node::new_comment(comment, allocator));
            }
            roxmltree::NodeType::PI => {
                if let Some(pi) = xml_child.pi() {
                    log::warn!("dropping processing instruction <?{}?>", pi.target);
                }
            }
            roxmltree::NodeType::Root => {}
        }
    }

    Ok(())
}

fn parse_element(allocator: &Rc<Allocator>, xml_node: roxmltree::Node<'_, '_>) -> Node {
    let element = Node::new_element(parse_expanded_name(xml_node), allocator);
    for ns in xml_node.namespaces().filter(|ns| is_new_xmlns(ns, xml_node)) {
        element.declare_namespace(ns.name(), ns.uri());
    }
    if let Some(data) = element.element_data() {
        let mut attributes = data.attributes.borrow_mut();
        for attr in xml_node.attributes() {
            attributes.set(parse_attr_name(attr, xml_node), attr.value());
        }
    }
    element
}

fn parse_attr_name(attr: roxmltree::Attribute, xml_node: roxmltree::Node<'_, '_>) -> QualName {
    match attr.namespace() {
        Some(ns) => QualName::new(lookup_prefix(xml_node, ns).as_deref(), attr.name(), Some(ns)),
        None => QualName::local(attr.name()),
    }
}

fn parse_expanded_name(xml_node: roxmltree::Node<'_, '_>) -> QualName {
    let name = xml_node.tag_name();
    match name.namespace().filter(|ns| !ns.is_empty()) {
        Some(ns) => {
            let default_namespace = xml_node
                .namespaces()
                .find(|ns| ns.name().is_none())
                .map(roxmltree::Namespace::uri);
            let prefix = if default_namespace == Some(ns) {
                None
            } else {
                lookup_prefix(xml_node, ns)
            };
            QualName::new(prefix.as_deref(), name.name(), Some(ns))
        }
        None => QualName::local(name.name()),
    }
}

fn lookup_prefix(xml_node: roxmltree::Node<'_, '_>, uri: &str) -> Option<String> {
    if uri == XML_NS {
        return Some(String::from("xml"));
    }
    xml_node
        .namespaces()
        .filter(|ns| ns.uri() == uri)
        .find_map(roxmltree::Namespace::name)
        .map(String::from)
}

/// Whether the namespace is declared by this element, rather than inherited from it's parent.
fn is_new_xmlns(ns: &roxmltree::Namespace, xml_node: roxmltree::Node<'_, '_>) -> bool {
    if ns.name() == Some("xml") || (ns.name().is_none() && ns.uri().is_empty()) {
        return false;
    }
    !xml_node.parent_element().is_some_and(|parent| {
        parent
            .namespaces()
            .any(|parent_ns| parent_ns.name() == ns.name() && parent_ns.uri() == ns.uri())
    })
}

#[cfg(test)]
use crate::{arena::DocumentOptions, document::Document, name::XLINK_NS};

#[test]
fn namespaces() -> anyhow::Result<()> {
    let document = Document::parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
    <g xmlns:a="urn:a">
        <use xlink:href="#b" a:label="c" xml:space="preserve"/>
    </g>
</svg>"##,
    )?;
    let root = document.root();
    assert_eq!(root.namespaces().len(), 2);
    let g = root.first_element_child().ok_or(anyhow::anyhow!("missing <g>"))?;
    assert_eq!(g.namespaces().len(), 1, "inherited namespaces aren't redeclared");
    assert_eq!(g.qual_name().map(|name| name.to_string()), Some("g".into()));

    let r#use = g.first_element_child().ok_or(anyhow::anyhow!("missing <use>"))?;
    assert_eq!(r#use.get_attribute_ns(Some(XLINK_NS), "href"), "#b");
    assert_eq!(r#use.get_attribute_ns(Some("urn:a"), "label"), "c");
    assert_eq!(r#use.get_attribute("xml:space"), "preserve");
    insta::assert_snapshot!(
        r#use.to_string(),
        @r##"<use xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" xmlns:a="urn:a" xlink:href="#b" a:label="c" xml:space="preserve"/>"##
    );
    Ok(())
}

#[test]
fn whitespace() -> anyhow::Result<()> {
    let source = "<svg>\n  <text> a </text>\n  <text>  </text>\n</svg>";
    let document = Document::parse(source)?;
    assert_eq!(document.root().child_nodes().len(), 2);
    let texts = document.root().children();
    assert_eq!(texts[0].text_content(), " a ");
    assert_eq!(
        texts[1].text_content(),
        "  ",
        "whitespace is kept when there are no sibling elements"
    );

    let document = Document::parse_with_options(
        source,
        DocumentOptions {
            preserve_whitespace: true,
            ..DocumentOptions::default()
        },
    )?;
    assert_eq!(document.root().child_nodes().len(), 5);
    Ok(())
}

#[test]
fn skipped_nodes() -> anyhow::Result<()> {
    let document = Document::parse(
        r#"<?xml version="1.0" standalone="no"?>
<!DOCTYPE svg [<!ENTITY name "value">]>
<?xml-stylesheet href="style.css"?>
<svg><?pi?><desc>&name;</desc></svg>"#,
    )?;
    assert_eq!(document.root().to_string(), "<svg><desc>value</desc></svg>");
    Ok(())
}

#[test]
fn errors() {
    assert!(matches!(
        Document::parse("<svg><g></svg>"),
        Err(ParseError::ROXML(_))
    ));
    assert!(matches!(Document::parse(""), Err(ParseError::ROXML(_))));

    // roxmltree may refuse the nesting before we do
    let deep = format!("{}{}", "<g>".repeat(1100), "</g>".repeat(1100));
    assert!(matches!(
        Document::parse(&deep),
        Err(ParseError::NodesLimitReached | ParseError::ROXML(_))
    ));
    let shallow = format!("{}{}", "<g>".repeat(1000), "</g>".repeat(1000));
    assert!(Document::parse(&shallow).is_ok());
}

#[test]
fn whitespace_in_text_content() -> anyhow::Result<()> {
    let source = r#"<svg><text><tspan>a</tspan> <tspan>b</tspan></text><g xml:space="preserve"> <rect/></g></svg>"#;
    let document = Document::parse(source)?;
    let text = document.root().children()[0].clone();
    assert_eq!(text.text_content(), "a b");
    assert_eq!(document.root().to_string(), source);

    let document =
        Document::parse(r#"<svg><g xml:space="default"> <rect/></g><g> <rect/></g></svg>"#)?;
    assert_eq!(
        document.root().to_string(),
        r#"<svg><g xml:space="default"><rect/></g><g><rect/></g></svg>"#
    );
    Ok(())
}

//! SVG documents
use std::{fmt::Display, path::Path};

use crate::{
    arena::{Allocator, DocumentOptions},
    compress,
    error::{ParseError, SaveError, TreeError},
    name::{split_prefix, QualName, SVG_NS},
    node::Node,
    parse,
    query::Condition,
    serialize::Options,
    xmlwriter,
};

/// The default width of a new document, A4
pub const DEFAULT_WIDTH: &str = "210mm";
/// The default height of a new document, A4
pub const DEFAULT_HEIGHT: &str = "297mm";
/// The SVG version written to new documents
pub const VERSION: &str = "1.1";

#[derive(Debug)]
/// An SVG document, owning a root element and the counter used for generated ids.
///
/// Every node created for the document, whether parsed or through [`Document::create_element`],
/// shares the document's options and counter. Appending a node created by another document
/// copies it.
///
/// [MDN | Document](https://developer.mozilla.org/en-US/docs/Web/API/Document)
pub struct Document {
    root: Node,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty A4 document, like
    /// `<svg xmlns="http://www.w3.org/2000/svg" width="210mm" height="297mm" version="1.1"/>`
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    /// Creates an empty A4 document with the given options
    pub fn with_options(options: DocumentOptions) -> Self {
        let allocator = Allocator::new(options);
        let root = Node::new_element(QualName::new(None, "svg", Some(SVG_NS)), &allocator);
        root.declare_namespace(None, SVG_NS);
        root.set_attribute("width", DEFAULT_WIDTH);
        root.set_attribute("height", DEFAULT_HEIGHT);
        root.set_attribute("version", VERSION);
        Self { root }
    }

    /// Parses a document from XML text
    ///
    /// # Errors
    ///
    /// If the text isn't well-formed XML
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Self::parse_with_options(source, DocumentOptions::default())
    }

    /// Parses a document from XML text with the given options
    ///
    /// # Errors
    ///
    /// If the text isn't well-formed XML
    pub fn parse_with_options(source: &str, options: DocumentOptions) -> Result<Self, ParseError> {
        let allocator = Allocator::new(options);
        let root = parse::parse(source, &allocator)?;
        Ok(Self { root })
    }

    /// Reads and parses a document from a file. Files with the `svgz` extension are
    /// decompressed.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or parsed
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        Self::open_with_options(path, DocumentOptions::default())
    }

    /// Reads and parses a document from a file with the given options
    ///
    /// # Errors
    ///
    /// If the file cannot be read or parsed
    pub fn open_with_options(
        path: impl AsRef<Path>,
        options: DocumentOptions,
    ) -> Result<Self, ParseError> {
        let path = path.as_ref();
        log::debug!("opening {}", path.display());
        Self::parse_with_options(&compress::read_to_string(path)?, options)
    }

    /// Returns the options the document was created with
    pub fn options(&self) -> DocumentOptions {
        self.root.document_options()
    }

    /// Returns the root element of the document
    ///
    /// [MDN | documentElement](https://developer.mozilla.org/en-US/docs/Web/API/Document/documentElement)
    pub fn root(&self) -> Node {
        self.root.clone()
    }

    /// Returns the next number of the document's counter. Numbers are never reused.
    pub fn next_unique_id(&self) -> usize {
        self.root.next_unique_id()
    }

    /// Creates a detached element for the document.
    ///
    /// The namespace of the element is resolved from the prefix of the name, or the default
    /// namespace, declared on the root.
    ///
    /// [MDN | createElement](https://developer.mozilla.org/en-US/docs/Web/API/Document/createElement)
    pub fn create_element(&self, name: &str) -> Node {
        let (prefix, local) = split_prefix(name);
        let ns = self.root.lookup_namespace_uri(prefix);
        Node::new_element(
            QualName::new(prefix, local, ns.as_deref()),
            self.root.allocator(),
        )
    }

    /// Creates a detached text node for the document
    ///
    /// [MDN | createTextNode](https://developer.mozilla.org/en-US/docs/Web/API/Document/createTextNode)
    pub fn create_text_node(&self, text: &str) -> Node {
        Node::new_text(text, self.root.allocator())
    }

    /// Creates a detached comment for the document
    pub fn create_comment(&self, comment: &str) -> Node {
        Node::new_comment(comment, self.root.allocator())
    }

    /// Serializes the document as an XML string
    ///
    /// # Errors
    ///
    /// If serialization fails
    pub fn to_xml(&self, options: Options) -> Result<String, xmlwriter::Error> {
        self.root.to_xml(options)
    }

    /// Writes the document, with the xml declaration, to a file. Paths with the `svgz` extension
    /// are compressed.
    ///
    /// Returns the number of bytes of XML written, before compression.
    ///
    /// # Errors
    ///
    /// If serialization or writing fails, or if compression isn't available
    pub fn save(&self, path: impl AsRef<Path>, pretty: bool) -> Result<usize, SaveError> {
        let path = path.as_ref();
        let xml = self.root.serialize_into(
            Vec::new(),
            Options {
                pretty,
                prolog: true,
            },
        )?;
        compress::write(path, &xml)?;
        log::debug!("saved {} bytes to {}", xml.len(), path.display());
        Ok(xml.len())
    }

    /// Returns the `width` of the root
    pub fn width(&self) -> String {
        self.root.get_attribute("width")
    }

    /// Sets the `width` of the root
    pub fn set_width(&self, width: impl Display) {
        self.root.set_attribute("width", &width.to_string());
    }

    /// Returns the `height` of the root
    pub fn height(&self) -> String {
        self.root.get_attribute("height")
    }

    /// Sets the `height` of the root
    pub fn set_height(&self, height: impl Display) {
        self.root.set_attribute("height", &height.to_string());
    }

    /// Returns the `version` of the root
    pub fn version(&self) -> String {
        self.root.get_attribute("version")
    }

    /// Sets the `version` of the root
    pub fn set_version(&self, version: &str) {
        self.root.set_attribute("version", version);
    }

    /// Returns the `viewBox` of the root
    pub fn view_box(&self) -> String {
        self.root.get_attribute("viewBox")
    }

    /// Sets the `viewBox` of the root, removing any `%` or `px` units
    pub fn set_view_box(
        &self,
        x: impl Display,
        y: impl Display,
        width: impl Display,
        height: impl Display,
    ) {
        let view_box = format!("{x} {y} {width} {height}")
            .replace('%', "")
            .replace("px", "");
        self.root.set_attribute("viewBox", &view_box);
    }

    /// Sets the `viewBox` of the root to start at the origin and match it's width and height
    pub fn set_default_view_box(&self) {
        self.set_view_box(0, 0, self.width(), self.height());
    }

    /// Appends a shape to the root. A shape of another document is copied.
    ///
    /// # Errors
    ///
    /// If the shape is the root
    pub fn add_shape(&self, shape: &Node) -> Result<Node, TreeError> {
        self.root.append_child(shape)
    }

    /// Returns the first `<defs>` child of the root
    pub fn defs(&self) -> Option<Node> {
        self.root
            .children()
            .into_iter()
            .find(|child| child.local_name() == "defs")
    }

    /// Appends an element to the `<defs>` of the root, adding `<defs>` first if needed
    ///
    /// # Errors
    ///
    /// If the element is the root
    pub fn add_defs(&self, element: &Node) -> Result<Node, TreeError> {
        let defs = match self.defs() {
            Some(defs) => defs,
            None => self.root.append_child(&self.create_element("defs"))?,
        };
        defs.append_child(element)
    }

    /// Appends a `<script>` containing the given text to the root
    ///
    /// # Errors
    ///
    /// If the root cannot hold children
    pub fn add_script(&self, script: &str) -> Result<Node, TreeError> {
        let element = self.create_element("script");
        element.set_text_content(script);
        self.root.append_child(&element)
    }

    /// Returns the first element with the given `id`
    pub fn find_by_id(&self, id: &str) -> Option<Node> {
        self.root.find_by_id(id)
    }

    /// Returns the first element whose attribute loosely equals `value`
    pub fn find_first_by_attribute(&self, attr: &str, value: &str) -> Option<Node> {
        self.root.find_first_by_attribute(attr, value)
    }

    /// Returns every element whose attribute satisfies the condition against `value`
    pub fn find_all_by_attribute(
        &self,
        attr: &str,
        value: &str,
        condition: impl Into<Condition>,
    ) -> Vec<Node> {
        self.root.find_all_by_attribute(attr, value, condition)
    }

    /// Removes the first element with the given `id`, returning whether one was removed
    pub fn remove_element_by_id(&self, id: &str) -> bool {
        self.find_by_id(id).is_some_and(|element| element.remove())
    }
}

#[test]
fn new() {
    insta::assert_snapshot!(
        Document::new().to_xml(Options::default()).unwrap_or_default(),
        @r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <svg xmlns="http://www.w3.org/2000/svg" width="210mm" height="297mm" version="1.1"/>
    "#
    );
}

#[test]
fn rect_and_circle() -> anyhow::Result<()> {
    let document = Document::new();
    let rect = document.create_element("rect");
    for (name, value) in [("x", "10"), ("y", "10"), ("width", "50"), ("height", "20")] {
        rect.set_attribute(name, value);
    }
    let circle = document.create_element("circle");
    for (name, value) in [("cx", "40"), ("cy", "40"), ("r", "15")] {
        circle.set_attribute(name, value);
    }
    document.add_shape(&rect)?;
    document.add_shape(&circle)?;

    let xml = document.to_xml(Options::default())?;
    insta::assert_snapshot!(xml, @r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <svg xmlns="http://www.w3.org/2000/svg" width="210mm" height="297mm" version="1.1"><rect x="10" y="10" width="50" height="20"/><circle cx="40" cy="40" r="15"/></svg>
    "#);

    let parsed = Document::parse(&xml)?;
    let names: Vec<_> = parsed.root().children().iter().map(Node::node_name).collect();
    assert_eq!(names, vec!["rect", "circle"]);
    assert_eq!(parsed.to_xml(Options::default())?, xml);
    Ok(())
}

#[test]
fn pretty_round_trip() -> anyhow::Result<()> {
    let source = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><defs><linearGradient id="g"><stop offset="0"/></linearGradient></defs><text x="1">a &lt; b</text><use xlink:href="#g"/></svg>"##;
    let document = Document::parse(source)?;
    let pretty = Options {
        pretty: true,
        prolog: true,
    };
    let xml = document.to_xml(pretty)?;
    let reparsed = Document::parse(&xml)?;
    assert_eq!(reparsed.to_xml(pretty)?, xml);
    assert_eq!(
        reparsed.to_xml(Options {
            pretty: false,
            prolog: false
        })?,
        source
    );
    Ok(())
}

#[test]
fn unique_ids() -> anyhow::Result<()> {
    let document = Document::new();
    let ids: Vec<_> = (0..3)
        .map(|_| {
            let rect = document.create_element("rect");
            rect.set_id(None);
            document.add_shape(&rect).map(|rect| rect.id())
        })
        .collect::<Result<_, _>>()?;
    assert_eq!(ids, vec!["rect0", "rect1", "rect2"]);

    assert!(document.remove_element_by_id("rect2"));
    assert!(!document.remove_element_by_id("rect2"));
    let circle = document.create_element("circle");
    circle.set_id(None);
    assert_eq!(circle.id(), "circle3", "ids are not reused");

    let other = Document::new();
    let circle = other.create_element("circle");
    circle.set_id(None);
    assert_eq!(circle.id(), "circle0", "each document counts separately");
    Ok(())
}

#[test]
fn attribute_idempotence() -> anyhow::Result<()> {
    let document = Document::new();
    let root = document.root();
    root.set_attribute("data-label", "x");
    assert_eq!(root.get_attribute("data-label"), "x");
    root.set_attribute("data-label", "");
    assert_eq!(root.get_attribute("data-label"), "");
    assert!(!document.to_xml(Options::default())?.contains("data-label"));
    Ok(())
}

#[test]
fn view_box() {
    let document = Document::new();
    document.set_width("100px");
    document.set_height("50%");
    document.set_default_view_box();
    assert_eq!(document.view_box(), "0 0 100 50");
    assert_eq!(document.width(), "100px");
}

#[test]
fn defs_and_script() -> anyhow::Result<()> {
    let document = Document::new();
    assert_eq!(document.defs(), None);
    document.add_defs(&document.create_element("linearGradient"))?;
    document.add_defs(&document.create_element("clipPath"))?;
    document.add_script("alert('<hi>')")?;

    let defs = document.defs().ok_or(anyhow::anyhow!("missing <defs>"))?;
    assert_eq!(defs.child_element_count(), 2);
    insta::assert_snapshot!(
        document.root().to_string(),
        @r#"<svg xmlns="http://www.w3.org/2000/svg" width="210mm" height="297mm" version="1.1"><defs><linearGradient/><clipPath/></defs><script>alert('&lt;hi&gt;')</script></svg>"#
    );
    Ok(())
}

#[test]
fn save_and_open() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let document = Document::new();
    let text = document.create_element("text");
    text.set_text_content("Ünïcode & more");
    document.add_shape(&text)?;

    let path = dir.path().join("drawing.svg");
    let written = document.save(&path, true)?;
    let contents = std::fs::read_to_string(&path)?;
    assert_eq!(written, contents.len());
    assert_eq!(
        Document::open(&path)?.to_xml(Options::default())?,
        document.to_xml(Options::default())?
    );

    assert!(matches!(
        Document::open(dir.path().join("missing.svg")),
        Err(ParseError::IO(_))
    ));
    Ok(())
}

#[test]
#[cfg(feature = "gzip")]
fn compressed_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let document = Document::parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><g id="a"><use xlink:href="#a"/></g></svg>"##,
    )?;
    let path = dir.path().join("drawing.svgz");
    let written = document.save(&path, false)?;
    assert_eq!(written, document.to_xml(Options::default())?.len());

    let opened = Document::open(&path)?;
    assert_eq!(
        opened.to_xml(Options::default())?,
        document.to_xml(Options::default())?
    );
    Ok(())
}

#[test]
fn factories() -> anyhow::Result<()> {
    let document = Document::new();
    document.set_version("2.0");
    assert_eq!(document.version(), "2.0");

    let desc = document.create_element("desc");
    desc.append_child(&document.create_text_node("a < b"))?;
    desc.append_child(&document.create_comment("note"))?;
    document.add_shape(&desc)?;
    assert_eq!(desc.text_content(), "a < b");
    assert_eq!(
        desc.to_string(),
        r#"<desc xmlns="http://www.w3.org/2000/svg">a &lt; b<!--note--></desc>"#
    );
    assert_eq!(document.next_unique_id(), 0);
    assert_eq!(document.next_unique_id(), 1);
    Ok(())
}

//! XML tree nodes.
use std::{
    cell::RefCell,
    fmt::Debug,
    rc::{Rc, Weak},
};

use crate::{
    arena::{Allocator, DocumentOptions},
    attribute::{Attr, Attributes},
    error::TreeError,
    name::{split_prefix, Namespace, QualName, XMLNS_NS, XML_NS},
};

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
/// An enum which specifies the type of node.
///
/// [MDN | nodeType](https://developer.mozilla.org/en-US/docs/Web/API/Node/nodeType)
pub enum Type {
    /// An element node like `<svg>` or `<rect>`
    Element,
    /// The actual text inside an element
    Text,
    /// A `Comment` node, such as `<!-- ... -->`
    Comment,
}

#[derive(derive_more::Debug)]
pub(crate) struct ElementData {
    pub(crate) name: QualName,
    pub(crate) attributes: RefCell<Attributes>,
    pub(crate) namespaces: RefCell<Vec<Namespace>>,
}

#[derive(derive_more::Debug)]
pub(crate) enum NodeData {
    Element(ElementData),
    Text(RefCell<String>),
    Comment(RefCell<String>),
}

#[derive(derive_more::Debug)]
pub(crate) struct Inner {
    data: NodeData,
    #[debug(skip)]
    parent: RefCell<Weak<Inner>>,
    children: RefCell<Vec<Node>>,
    #[debug(skip)]
    allocator: Rc<Allocator>,
}

#[derive(Clone)]
/// A handle to a node of a document tree.
///
/// Cloning a node only clones the handle; both handles refer to the same node. A node owns it's
/// children, and only holds a weak reference to it's parent.
///
/// [MDN | Node](https://developer.mozilla.org/en-US/docs/Web/API/Node)
pub struct Node(Rc<Inner>);

impl Node {
    pub(crate) fn new(data: NodeData, allocator: &Rc<Allocator>) -> Self {
        Self(Rc::new(Inner {
            data,
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(vec![]),
            allocator: Rc::clone(allocator),
        }))
    }

    pub(crate) fn new_element(name: QualName, allocator: &Rc<Allocator>) -> Self {
        Self::new(
            NodeData::Element(ElementData {
                name,
                attributes: RefCell::new(Attributes::new()),
                namespaces: RefCell::new(vec![]),
            }),
            allocator,
        )
    }

    pub(crate) fn new_text(content: &str, allocator: &Rc<Allocator>) -> Self {
        Self::new(NodeData::Text(RefCell::new(content.into())), allocator)
    }

    pub(crate) fn new_comment(content: &str, allocator: &Rc<Allocator>) -> Self {
        Self::new(NodeData::Comment(RefCell::new(comment_text(content))), allocator)
    }

    pub(crate) fn allocator(&self) -> &Rc<Allocator> {
        &self.0.allocator
    }

    pub(crate) fn data(&self) -> &NodeData {
        &self.0.data
    }

    pub(crate) fn element_data(&self) -> Option<&ElementData> {
        match &self.0.data {
            NodeData::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Returns an enum that identifies what the node is.
    pub fn node_type(&self) -> Type {
        match &self.0.data {
            NodeData::Element(_) => Type::Element,
            NodeData::Text(_) => Type::Text,
            NodeData::Comment(_) => Type::Comment,
        }
    }

    /// Whether the node is an element
    pub fn is_element(&self) -> bool {
        self.node_type() == Type::Element
    }

    /// Whether both handles refer to the same node
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether both nodes were created by the same document
    pub fn same_document(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0.allocator, &other.0.allocator)
    }

    /// The options of the document the node was created by
    pub fn document_options(&self) -> DocumentOptions {
        self.0.allocator.options()
    }

    /// Returns the qualified name of an element
    pub fn qual_name(&self) -> Option<&QualName> {
        self.element_data().map(|data| &data.name)
    }

    /// Returns the local part of an element's name, or an empty string for other nodes.
    ///
    /// [MDN | localName](https://developer.mozilla.org/en-US/docs/Web/API/Element/localName)
    pub fn local_name(&self) -> &str {
        self.qual_name().map_or("", |name| name.local.as_str())
    }

    /// Returns the qualified name of an element, `#text` for text or `#comment` for comments.
    ///
    /// [MDN | nodeName](https://developer.mozilla.org/en-US/docs/Web/API/Node/nodeName)
    pub fn node_name(&self) -> String {
        match &self.0.data {
            NodeData::Element(data) => data.name.to_string(),
            NodeData::Text(_) => String::from("#text"),
            NodeData::Comment(_) => String::from("#comment"),
        }
    }

    /// Returns the node that is the parent of this node, or [None] for the root of a tree.
    ///
    /// [MDN | parentNode](https://developer.mozilla.org/en-US/docs/Web/API/Node/parentNode)
    pub fn parent_node(&self) -> Option<Node> {
        self.0.parent.borrow().upgrade().map(Node)
    }

    /// Returns all the children of this node, in document order
    ///
    /// [MDN | childNodes](https://developer.mozilla.org/en-US/docs/Web/API/Node/childNodes)
    pub fn child_nodes(&self) -> Vec<Node> {
        self.0.children.borrow().clone()
    }

    /// Returns whether the node has any children
    pub fn has_child_nodes(&self) -> bool {
        !self.0.children.borrow().is_empty()
    }

    /// Returns the child elements of this node, in document order
    ///
    /// [MDN | children](https://developer.mozilla.org/en-US/docs/Web/API/Element/children)
    pub fn children(&self) -> Vec<Node> {
        self.0
            .children
            .borrow()
            .iter()
            .filter(|child| child.is_element())
            .cloned()
            .collect()
    }

    /// Returns the number of child elements of this node.
    pub fn child_element_count(&self) -> usize {
        self.0
            .children
            .borrow()
            .iter()
            .filter(|child| child.is_element())
            .count()
    }

    /// Returns the first child element of this node.
    pub fn first_element_child(&self) -> Option<Node> {
        self.0
            .children
            .borrow()
            .iter()
            .find(|child| child.is_element())
            .cloned()
    }

    /// Returns whether some node is a descendant of the current node.
    ///
    /// [MDN | contains](https://developer.mozilla.org/en-US/docs/Web/API/Node/contains)
    pub fn contains(&self, other: &Node) -> bool {
        let mut current = other.parent_node();
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent_node();
        }
        false
    }

    /// Returns the value of a text or comment node
    pub fn node_value(&self) -> Option<String> {
        match &self.0.data {
            NodeData::Element(_) => None,
            NodeData::Text(value) | NodeData::Comment(value) => Some(value.borrow().clone()),
        }
    }

    /// Returns the text of the node and it's descendants, excluding comments
    ///
    /// [MDN | textContent](https://developer.mozilla.org/en-US/docs/Web/API/Node/textContent)
    pub fn text_content(&self) -> String {
        match &self.0.data {
            NodeData::Text(value) | NodeData::Comment(value) => value.borrow().clone(),
            NodeData::Element(_) => {
                let mut content = String::new();
                self.collect_text(&mut content);
                content
            }
        }
    }

    fn collect_text(&self, content: &mut String) {
        for child in self.0.children.borrow().iter() {
            match &child.0.data {
                NodeData::Text(value) => content.push_str(&value.borrow()),
                NodeData::Element(_) => child.collect_text(content),
                NodeData::Comment(_) => {}
            }
        }
    }

    /// Replaces all child nodes with a text node of the given content, or sets the value of a
    /// text or comment node.
    ///
    /// The `--` sequence can't appear in a comment, so it's separated by a space, as is a
    /// trailing `-`.
    pub fn set_text_content(&self, content: &str) {
        match &self.0.data {
            NodeData::Text(value) => {
                content.clone_into(&mut value.borrow_mut());
            }
            NodeData::Comment(value) => {
                *value.borrow_mut() = comment_text(content);
            }
            NodeData::Element(_) => {
                self.empty();
                if !content.is_empty() {
                    self.attach(Node::new_text(content, &self.0.allocator));
                }
            }
        }
    }

    /// Removes all child nodes
    pub fn empty(&self) {
        let children = std::mem::take(&mut *self.0.children.borrow_mut());
        for child in children {
            *child.0.parent.borrow_mut() = Weak::new();
        }
    }

    /// Points the node at a parent which doesn't list it as a child yet
    pub(crate) fn link_parent(&self, parent: &Node) {
        *self.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
    }

    pub(crate) fn attach(&self, child: Node) {
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child);
    }

    /// Adds a node to the end of the list of children of this element.
    ///
    /// A node of the same document is moved from it's current position. A node of another
    /// document is copied with all of it's descendants, see [`Node::merge_into`], and the copy
    /// is returned.
    ///
    /// [MDN | appendChild](https://developer.mozilla.org/en-US/docs/Web/API/Node/appendChild)
    ///
    /// # Errors
    ///
    /// If this node is not an element, or if the child is this node or one of it's ancestors
    pub fn append_child(&self, child: &Node) -> Result<Node, TreeError> {
        if !self.is_element() {
            return Err(TreeError::NotAnElement);
        }
        if !self.same_document(child) {
            return Ok(child.merge_into(self));
        }
        if child.ptr_eq(self) || child.contains(self) {
            return Err(TreeError::HierarchyRequest);
        }

        child.remove();
        self.attach(child.clone());
        Ok(child.clone())
    }

    /// Creates an element of the same document and appends it to this element.
    ///
    /// The namespace of the new element is resolved from this element's scope.
    ///
    /// # Errors
    ///
    /// If this node is not an element
    pub fn append_element(&self, name: &str) -> Result<Node, TreeError> {
        if !self.is_element() {
            return Err(TreeError::NotAnElement);
        }
        let (prefix, local) = split_prefix(name);
        let ns = self.lookup_namespace_uri(prefix);
        let element = Node::new_element(
            QualName::new(prefix, local, ns.as_deref()),
            &self.0.allocator,
        );
        self.attach(element.clone());
        Ok(element)
    }

    /// Removes the current node from it's parent and removes the reference to the parent.
    ///
    /// Returns `false` when the node had no parent, such as the root of a document.
    ///
    /// [MDN | remove](https://developer.mozilla.org/en-US/docs/Web/API/Element/remove)
    pub fn remove(&self) -> bool {
        let Some(parent) = self.parent_node() else {
            return false;
        };
        parent
            .0
            .children
            .borrow_mut()
            .retain(|sibling| !sibling.ptr_eq(self));
        *self.0.parent.borrow_mut() = Weak::new();
        true
    }

    /// Returns the next unique number of the node's document
    pub fn next_unique_id(&self) -> usize {
        self.0.allocator.next_unique_id()
    }

    /// Sets the `id` attribute of the element.
    ///
    /// When the document generates ids and no id is given, an id is made of the element's
    /// local-name followed by the document's next unique number, e.g. `rect3`.
    pub fn set_id(&self, id: Option<&str>) {
        match id.filter(|id| !id.is_empty()) {
            Some(id) => self.set_attribute("id", id),
            None if self.document_options().auto_id => {
                let id = format!("{}{}", self.local_name(), self.next_unique_id());
                self.set_attribute("id", &id);
            }
            None => self.remove_attribute("id"),
        }
    }

    /// Returns the `id` attribute of the element
    pub fn id(&self) -> String {
        self.get_attribute("id")
    }

    /// Returns a copy of the element's attributes
    ///
    /// [MDN | attributes](https://developer.mozilla.org/en-US/docs/Web/API/Element/attributes)
    pub fn attributes(&self) -> Vec<Attr> {
        self.element_data()
            .map(|data| data.attributes.borrow().iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the value of an attribute by it's qualified name, or an empty string when absent.
    ///
    /// A name like `xlink:href` reads the attribute in the namespace bound to `xlink` when one is
    /// in scope and the attribute exists; otherwise the plain attribute `href` is read.
    ///
    /// [MDN | getAttribute](https://developer.mozilla.org/en-US/docs/Web/API/Element/getAttribute)
    pub fn get_attribute(&self, name: &str) -> String {
        let Some(data) = self.element_data() else {
            return String::new();
        };
        if let Some(declaration) = declared_prefix(name) {
            return data
                .namespaces
                .borrow()
                .iter()
                .find(|ns| ns.prefix.as_deref() == declaration)
                .map(|ns| ns.uri.clone())
                .unwrap_or_default();
        }

        let (prefix, local) = split_prefix(name);
        let attributes = data.attributes.borrow();
        if let Some(uri) = prefix.and_then(|prefix| self.lookup_namespace_uri(Some(prefix))) {
            if let Some(value) = attributes.get(Some(&uri), local) {
                return value.to_owned();
            }
        }
        attributes.get(None, local).unwrap_or_default().to_owned()
    }

    /// Returns the value of an attribute by it's namespace and local-name, or an empty string
    /// when absent.
    ///
    /// [MDN | getAttributeNS](https://developer.mozilla.org/en-US/docs/Web/API/Element/getAttributeNS)
    pub fn get_attribute_ns(&self, ns: Option<&str>, local: &str) -> String {
        self.element_data()
            .and_then(|data| data.attributes.borrow().get(ns, local).map(String::from))
            .unwrap_or_default()
    }

    /// Returns whether the attribute, resolved as with [`Node::get_attribute`], is present
    pub fn has_attribute(&self, name: &str) -> bool {
        !self.get_attribute(name).is_empty()
    }

    /// Sets the value of an attribute by it's qualified name. An empty value removes it.
    ///
    /// A prefix bound to a namespace in scope sets the namespaced attribute, an unknown prefix is
    /// dropped and the plain attribute is set. `xmlns` and `xmlns:*` names declare namespaces.
    ///
    /// [MDN | setAttribute](https://developer.mozilla.org/en-US/docs/Web/API/Element/setAttribute)
    pub fn set_attribute(&self, name: &str, value: &str) {
        let Some(data) = self.element_data() else {
            return;
        };
        if let Some(declaration) = declared_prefix(name) {
            if value.is_empty() {
                self.undeclare_namespace(declaration);
            } else {
                self.declare_namespace(declaration, value);
            }
            return;
        }

        let (prefix, local) = split_prefix(name);
        let qual_name = match prefix
            .and_then(|prefix| Some((prefix, self.lookup_namespace_uri(Some(prefix))?)))
        {
            Some((prefix, uri)) => QualName::new(Some(prefix), local, Some(&uri)),
            None => QualName::local(local),
        };
        data.attributes.borrow_mut().set(qual_name, value);
    }

    /// Sets the value of an attribute in the given namespace. An empty value removes it.
    ///
    /// The prefix of `name` is declared on the element if it isn't already bound to the namespace.
    /// Without a prefix, a prefix bound to the namespace in scope is reused or a new one is made.
    ///
    /// [MDN | setAttributeNS](https://developer.mozilla.org/en-US/docs/Web/API/Element/setAttributeNS)
    pub fn set_attribute_ns(&self, ns: Option<&str>, name: &str, value: &str) {
        let Some(uri) = ns.filter(|ns| !ns.is_empty()) else {
            self.set_attribute(name, value);
            return;
        };
        let Some(data) = self.element_data() else {
            return;
        };

        let (prefix, local) = split_prefix(name);
        if value.is_empty() {
            data.attributes.borrow_mut().remove(Some(uri), local);
            return;
        }
        let prefix = match prefix {
            Some(prefix) => prefix.to_owned(),
            None => self
                .lookup_prefix(uri)
                .unwrap_or_else(|| self.generate_prefix()),
        };
        self.ensure_namespace(Some(&prefix), uri);
        data.attributes
            .borrow_mut()
            .set(QualName::new(Some(&prefix), local, Some(uri)), value);
    }

    /// Removes an attribute by it's qualified name, resolved as with [`Node::set_attribute`].
    ///
    /// [MDN | removeAttribute](https://developer.mozilla.org/en-US/docs/Web/API/Element/removeAttribute)
    pub fn remove_attribute(&self, name: &str) {
        self.set_attribute(name, "");
    }

    /// Removes an attribute by it's namespace and local-name.
    pub fn remove_attribute_ns(&self, ns: Option<&str>, local: &str) {
        if let Some(data) = self.element_data() {
            data.attributes.borrow_mut().remove(ns, local);
        }
    }

    /// Returns the namespaces declared on this element
    pub fn namespaces(&self) -> Vec<Namespace> {
        self.element_data()
            .map(|data| data.namespaces.borrow().clone())
            .unwrap_or_default()
    }

    /// Declares a namespace on this element, replacing any declaration of the same prefix
    pub fn declare_namespace(&self, prefix: Option<&str>, uri: &str) {
        let Some(data) = self.element_data() else {
            return;
        };
        if prefix == Some("xml") || prefix == Some("xmlns") {
            return;
        }
        let mut namespaces = data.namespaces.borrow_mut();
        match namespaces
            .iter_mut()
            .find(|ns| ns.prefix.as_deref() == prefix)
        {
            Some(existing) => uri.clone_into(&mut existing.uri),
            None => namespaces.push(Namespace::new(prefix, uri)),
        }
    }

    fn undeclare_namespace(&self, prefix: Option<&str>) {
        if let Some(data) = self.element_data() {
            data.namespaces
                .borrow_mut()
                .retain(|ns| ns.prefix.as_deref() != prefix);
        }
    }

    /// Declares the namespace on this element, unless the prefix is already bound to it in scope
    pub(crate) fn ensure_namespace(&self, prefix: Option<&str>, uri: &str) {
        if self.lookup_namespace_uri(prefix).as_deref() != Some(uri) {
            self.declare_namespace(prefix, uri);
        }
    }

    /// Returns the namespace uri bound to the prefix on this element or it's ancestors.
    ///
    /// [MDN | lookupNamespaceURI](https://developer.mozilla.org/en-US/docs/Web/API/Node/lookupNamespaceURI)
    pub fn lookup_namespace_uri(&self, prefix: Option<&str>) -> Option<String> {
        match prefix {
            Some("xml") => return Some(XML_NS.into()),
            Some("xmlns") => return Some(XMLNS_NS.into()),
            _ => {}
        }
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if let Some(data) = node.element_data() {
                if let Some(ns) = data
                    .namespaces
                    .borrow()
                    .iter()
                    .find(|ns| ns.prefix.as_deref() == prefix)
                {
                    return Some(ns.uri.clone()).filter(|uri| !uri.is_empty());
                }
            }
            current = node.parent_node();
        }
        None
    }

    /// Returns a prefix bound to the namespace uri on this element or it's ancestors.
    ///
    /// [MDN | lookupPrefix](https://developer.mozilla.org/en-US/docs/Web/API/Node/lookupPrefix)
    pub fn lookup_prefix(&self, uri: &str) -> Option<String> {
        if uri == XML_NS {
            return Some(String::from("xml"));
        }
        let mut current = Some(self.clone());
        while let Some(node) = current {
            let candidate = node
                .namespaces()
                .into_iter()
                .filter(|ns| ns.uri == uri)
                .find_map(|ns| ns.prefix)
                .filter(|prefix| self.lookup_namespace_uri(Some(prefix)).as_deref() == Some(uri));
            if candidate.is_some() {
                return candidate;
            }
            current = node.parent_node();
        }
        None
    }

    fn generate_prefix(&self) -> String {
        (0..)
            .map(|n| format!("ns{n}"))
            .find(|prefix| self.lookup_namespace_uri(Some(prefix)).is_none())
            .unwrap_or_default()
    }
}

/// Separates each `--` and a trailing `-`, which would otherwise end or break a comment
fn comment_text(content: &str) -> String {
    let mut text = content.to_string();
    while text.contains("--") {
        text = text.replace("--", "- -");
    }
    if text.ends_with('-') {
        text.push(' ');
    }
    text
}

/// Returns the prefix declared by an `xmlns` or `xmlns:*` attribute name
fn declared_prefix(name: &str) -> Option<Option<&str>> {
    if name == "xmlns" {
        return Some(None);
    }
    name.strip_prefix("xmlns:").map(Some)
}

impl Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

#[cfg(test)]
fn element(name: &str) -> (Node, Rc<Allocator>) {
    let allocator = Allocator::new(DocumentOptions::default());
    (Node::new_element(QualName::parse(name), &allocator), allocator)
}

#[test]
fn absent_attribute_is_empty() {
    let (rect, _) = element("rect");
    assert_eq!(rect.get_attribute("x"), "");
    assert_eq!(rect.get_attribute("xlink:href"), "");

    rect.set_attribute("x", "10");
    assert_eq!(rect.get_attribute("x"), "10");
    rect.set_attribute("x", "");
    assert_eq!(rect.get_attribute("x"), "");
    assert!(rect.attributes().is_empty());
}

#[test]
fn prefixed_attribute_resolution() {
    let (root, allocator) = element("svg");
    let image = Node::new_element(QualName::local("image"), &allocator);
    root.set_attribute("xmlns:xlink", crate::name::XLINK_NS);
    root.attach(image.clone());

    image.set_attribute("xlink:href", "#a");
    assert_eq!(
        image.get_attribute_ns(Some(crate::name::XLINK_NS), "href"),
        "#a",
        "prefix declared on an ancestor should resolve"
    );
    assert_eq!(image.get_attribute("xlink:href"), "#a");
    assert_eq!(image.get_attribute("href"), "", "plain attribute is distinct");

    image.set_attribute("href", "#b");
    assert_eq!(image.get_attribute("xlink:href"), "#a");
    assert_eq!(image.get_attribute("href"), "#b");

    image.remove_attribute("xlink:href");
    assert_eq!(
        image.get_attribute("xlink:href"),
        "#b",
        "falls back to the plain attribute"
    );
}

#[test]
fn unknown_prefix_sets_plain_attribute() {
    let (path, _) = element("path");
    path.set_attribute("sodipodi:type", "arc");
    assert_eq!(path.get_attribute_ns(None, "type"), "arc");
    assert_eq!(path.get_attribute("sodipodi:type"), "arc");
}

#[test]
fn set_attribute_ns_declares_prefix() {
    let (image, _) = element("image");
    image.set_attribute_ns(Some(crate::name::XLINK_NS), "xlink:href", "a.png");
    assert_eq!(
        image.namespaces(),
        vec![Namespace::new(Some("xlink"), crate::name::XLINK_NS)]
    );
    assert_eq!(image.get_attribute("xlink:href"), "a.png");
    assert_eq!(image.get_attribute("xmlns:xlink"), crate::name::XLINK_NS);

    image.set_attribute_ns(Some("urn:example"), "label", "x");
    assert_eq!(image.get_attribute("ns0:label"), "x");
}

#[test]
fn append_moves_within_document() -> anyhow::Result<()> {
    let (svg, allocator) = element("svg");
    let g = Node::new_element(QualName::local("g"), &allocator);
    let rect = Node::new_element(QualName::local("rect"), &allocator);
    svg.append_child(&g)?;
    svg.append_child(&rect)?;
    g.append_child(&rect)?;

    assert_eq!(svg.children(), vec![g.clone()]);
    assert_eq!(g.children(), vec![rect.clone()]);
    assert_eq!(rect.parent_node(), Some(g.clone()));

    assert_eq!(rect.append_child(&svg), Err(TreeError::HierarchyRequest));
    assert_eq!(g.append_child(&g), Err(TreeError::HierarchyRequest));
    Ok(())
}

#[test]
fn remove_detaches_root_of_subtree_only() -> anyhow::Result<()> {
    let (svg, allocator) = element("svg");
    let g = Node::new_element(QualName::local("g"), &allocator);
    let rect = Node::new_element(QualName::local("rect"), &allocator);
    svg.append_child(&g)?;
    g.append_child(&rect)?;

    assert!(g.remove());
    assert!(!g.remove());
    assert!(!svg.remove(), "a root has no parent to be removed from");
    assert_eq!(g.parent_node(), None);
    assert_eq!(rect.parent_node(), Some(g.clone()));
    assert!(svg.children().is_empty());
    Ok(())
}

#[test]
fn set_id() {
    let (rect, allocator) = element("rect");
    let circle = Node::new_element(QualName::local("circle"), &allocator);
    rect.set_id(None);
    circle.set_id(Some(""));
    assert_eq!(rect.id(), "rect0");
    assert_eq!(circle.id(), "circle1");

    rect.set_id(Some("explicit"));
    assert_eq!(rect.id(), "explicit");

    let allocator = Allocator::new(DocumentOptions {
        auto_id: false,
        ..DocumentOptions::default()
    });
    let rect = Node::new_element(QualName::local("rect"), &allocator);
    rect.set_id(None);
    assert!(!rect.has_attribute("id"));
}

#[test]
fn text_content() {
    let (text, allocator) = element("text");
    text.set_text_content("Hello ");
    let tspan = Node::new_element(QualName::local("tspan"), &allocator);
    tspan.set_text_content("world");
    text.attach(tspan);
    text.attach(Node::new_comment("ignored", &allocator));
    assert_eq!(text.text_content(), "Hello world");

    text.set_text_content("replaced");
    assert_eq!(text.child_nodes().len(), 1);
    assert_eq!(text.text_content(), "replaced");
}

#[test]
fn comments_stay_well_formed() -> anyhow::Result<()> {
    let (root, allocator) = element("svg");
    let comment = Node::new_comment("a--b", &allocator);
    root.append_child(&comment)?;
    assert_eq!(comment.node_value().as_deref(), Some("a- -b"));

    comment.set_text_content("--->");
    assert_eq!(comment.node_value().as_deref(), Some("- - ->"));
    comment.set_text_content("end-");
    assert_eq!(root.to_string(), "<svg><!--end- --></svg>");
    Ok(())
}

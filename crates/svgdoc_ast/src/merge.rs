//! Copying subtrees between documents.
use crate::node::{Node, NodeData};

impl Node {
    /// Appends a deep copy of this node and it's descendants to `parent`, allocated by the
    /// document of `parent`, and returns the copy.
    ///
    /// Namespace declarations, plain attributes and namespaced attributes are all carried over,
    /// redeclaring any prefix the destination doesn't bind to the same namespace. The copy shares
    /// no state with the original, so either can be changed without affecting the other.
    ///
    /// Merging into the node itself or one of it's descendants copies the subtree as it was
    /// before the copy was added.
    pub fn merge_into(&self, parent: &Node) -> Node {
        let copy = self.copy_within(parent);
        if parent.is_element() {
            parent.attach(copy.clone());
        } else {
            log::warn!("cannot merge into {}, leaving copy detached", parent.node_name());
        }
        copy
    }

    /// Copies the subtree, resolving namespaces in the scope of `parent`. The copy isn't added
    /// to the children of `parent`, so it's never reached while the source is walked.
    fn copy_within(&self, parent: &Node) -> Node {
        let allocator = parent.allocator();
        let copy = match self.data() {
            NodeData::Text(text) => Node::new_text(&text.borrow(), allocator),
            NodeData::Comment(comment) => Node::new_comment(&comment.borrow(), allocator),
            NodeData::Element(data) => Node::new_element(data.name.clone(), allocator),
        };
        if parent.is_element() {
            copy.link_parent(parent);
        }

        let NodeData::Element(data) = self.data() else {
            return copy;
        };
        log::trace!("merging <{}>", data.name);

        for ns in data.namespaces.borrow().iter() {
            copy.ensure_namespace(ns.prefix.as_deref(), &ns.uri);
        }
        if let Some(uri) = &data.name.ns {
            copy.ensure_namespace(data.name.prefix.as_deref(), uri);
        }

        for attr in data.attributes.borrow().iter() {
            match (attr.namespace(), copy.element_data()) {
                (None, Some(copy_data)) => {
                    copy_data
                        .attributes
                        .borrow_mut()
                        .set(attr.name.clone(), &attr.value);
                }
                (Some(uri), _) => {
                    copy.set_attribute_ns(Some(uri), &attr.name.to_string(), &attr.value);
                }
                (None, None) => {}
            }
        }

        for child in self.child_nodes() {
            copy.attach(child.copy_within(&copy));
        }
        copy
    }
}

#[cfg(test)]
use crate::{document::Document, name::XLINK_NS, serialize::Options};

#[test]
fn merge_is_independent() -> anyhow::Result<()> {
    let source = Document::parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
  <g id="outer" class="a">
    <g id="inner">
      <use xlink:href="#shape" x="1"/>
      <text>Tom &amp; "Jerry"</text>
    </g>
  </g>
</svg>"##,
    )?;
    let destination = Document::new();
    let outer = source.find_by_id("outer").ok_or(anyhow::anyhow!("missing #outer"))?;

    let copy = destination.root().append_child(&outer)?;
    assert!(!copy.ptr_eq(&outer));
    assert_eq!(outer.parent_node(), Some(source.root()), "source is left in place");

    let copied_use = destination
        .find_first_by_attribute("x", "1")
        .ok_or(anyhow::anyhow!("missing <use>"))?;
    assert_eq!(copied_use.get_attribute("xlink:href"), "#shape");
    assert_eq!(copied_use.get_attribute_ns(Some(XLINK_NS), "href"), "#shape");

    // changes to one tree are never seen by the other
    outer.set_attribute("class", "changed");
    copied_use.set_attribute("x", "2");
    source
        .find_by_id("inner")
        .ok_or(anyhow::anyhow!("missing #inner"))?
        .set_text_content("");
    assert_eq!(copy.get_attribute("class"), "a");
    assert_eq!(
        source
            .find_first_by_attribute("xlink:href", "#shape")
            .map(|node| node.get_attribute("x")),
        None,
        "emptied in source"
    );
    assert_eq!(destination.find_by_id("inner").map(|n| n.children().len()), Some(2));

    insta::assert_snapshot!(
        copy.to_xml(Options { pretty: false, prolog: false })?,
        @r##"<g xmlns="http://www.w3.org/2000/svg" id="outer" class="a"><g id="inner"><use xmlns:xlink="http://www.w3.org/1999/xlink" xlink:href="#shape" x="2"/><text>Tom &amp; "Jerry"</text></g></g>"##
    );
    Ok(())
}

#[test]
fn merge_redeclares_conflicting_prefix() -> anyhow::Result<()> {
    let source = Document::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:a="urn:first"><rect a:label="x"/></svg>"#,
    )?;
    let destination = Document::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:a="urn:second"/>"#,
    )?;
    let rect = source
        .root()
        .first_element_child()
        .ok_or(anyhow::anyhow!("missing <rect>"))?;

    let copy = destination.root().append_child(&rect)?;
    assert_eq!(copy.get_attribute_ns(Some("urn:first"), "label"), "x");
    assert_eq!(copy.get_attribute("a:label"), "x");
    assert_eq!(destination.root().lookup_namespace_uri(Some("a")).as_deref(), Some("urn:second"));
    Ok(())
}

#[test]
fn merge_into_own_descendant() -> anyhow::Result<()> {
    let document = Document::parse(r#"<svg><g id="g"><rect id="r"/></g></svg>"#)?;
    let g = document.find_by_id("g").ok_or(anyhow::anyhow!("missing <g>"))?;
    let rect = document.find_by_id("r").ok_or(anyhow::anyhow!("missing <rect>"))?;

    let copy = g.merge_into(&rect);
    assert!(!copy.ptr_eq(&g));
    assert_eq!(copy.parent_node(), Some(rect.clone()));
    assert_eq!(
        document.root().to_string(),
        r#"<svg><g id="g"><rect id="r"><g id="g"><rect id="r"/></g></rect></g></svg>"#
    );

    let copy = g.merge_into(&g);
    assert_eq!(g.child_element_count(), 2);
    assert_eq!(copy.child_element_count(), 1, "the copy doesn't contain itself");
    Ok(())
}

//! The allocator shared by every node of a document
use std::{cell::Cell, rc::Rc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Settings which are fixed for the lifetime of a document
pub struct DocumentOptions {
    /// Whether [`crate::node::Node::set_id`] generates an id when none is given.
    ///
    /// Default: enabled
    pub auto_id: bool,
    /// Whether whitespace-only text between elements is kept while parsing.
    ///
    /// Default: disabled
    pub preserve_whitespace: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            auto_id: true,
            preserve_whitespace: false,
        }
    }
}

/// The allocator which every node of a document refers back to.
///
/// Nodes created by the same allocator belong to the same document, which decides whether
/// appending a node moves it or copies it.
#[derive(Debug)]
pub(crate) struct Allocator {
    options: DocumentOptions,
    /// Incrementally counts the number of generated ids, never going backwards
    current_unique_id: Cell<usize>,
}

impl Allocator {
    pub(crate) fn new(options: DocumentOptions) -> Rc<Self> {
        Rc::new(Self {
            options,
            current_unique_id: Cell::new(0),
        })
    }

    pub(crate) fn options(&self) -> DocumentOptions {
        self.options
    }

    /// Returns the next unique number for the document
    pub(crate) fn next_unique_id(&self) -> usize {
        let id = self.current_unique_id.get();
        self.current_unique_id.set(id + 1);
        id
    }
}

#[test]
fn unique_ids_increase() {
    let allocator = Allocator::new(DocumentOptions::default());
    assert_eq!(allocator.next_unique_id(), 0);
    assert_eq!(allocator.next_unique_id(), 1);
    assert_eq!(allocator.next_unique_id(), 2);
}

//! A namespace-aware XML tree for building, querying and serializing SVG documents.
//!
//! ```
//! use svgdoc_ast::{document::Document, serialize::Options};
//!
//! let document = Document::new();
//! let rect = document.create_element("rect");
//! rect.set_attribute("width", "10");
//! rect.set_id(None);
//! document.add_shape(&rect).unwrap();
//!
//! assert_eq!(
//!     document.find_by_id("rect0").map(|rect| rect.get_attribute("width")),
//!     Some(String::from("10")),
//! );
//! assert!(document.to_xml(Options::default()).unwrap().starts_with("<?xml"));
//! ```
pub mod arena;
pub mod attribute;
pub mod compress;
pub mod document;
pub mod error;
mod merge;
pub mod name;
pub mod node;
mod parse;
pub mod query;
pub mod serialize;
pub mod xmlwriter;

pub use arena::DocumentOptions;
pub use document::Document;
pub use node::Node;

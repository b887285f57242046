//! Typed SVG shapes, style strings and embedded images built on [`svgdoc_ast`].
//!
//! ```
//! use svgdoc_ast::Document;
//! use svgdoc_shapes::{shape::{Rect, Shape}, style::Style};
//!
//! let document = Document::new();
//! let mut style = Style::new();
//! style.set_fill("red");
//!
//! let rect = Rect::new(&document, 10, 10, 50, 20, Some("box")).with_style(&style);
//! rect.rotate(45.0, 0.0, 0.0);
//! document.add_shape(rect.node()).unwrap();
//!
//! assert_eq!(
//!     rect.node().to_string(),
//!     r#"<rect xmlns="http://www.w3.org/2000/svg" x="10" y="10" width="50" height="20" id="box" style="fill:red;" transform="rotate(45)"/>"#,
//! );
//! ```
pub mod image;
pub mod shape;
pub mod style;

pub use image::ImageError;
pub use shape::{Dimensioned, Event, Positioned, Shape};
pub use style::Style;

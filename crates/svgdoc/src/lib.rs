//! The `svgdoc` command line: formatting, searching and exporting SVG documents.
pub mod args;
pub mod commands;
pub mod config;
pub mod export;
pub mod walk;

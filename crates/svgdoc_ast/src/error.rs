//! Error types.
use std::fmt::Display;

use crate::xmlwriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// An optional capability of the crate, enabled through cargo features
pub enum Capability {
    /// Reading and writing gzip compressed documents, enabled by the `gzip` feature
    Gzip,
}

impl Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gzip => f.write_str("gzip compression (enable the `gzip` feature)"),
        }
    }
}

#[derive(Debug)]
/// The errors which may occur while loading a document.
pub enum ParseError {
    /// The document parsed had a depth greater than 1024 elements
    NodesLimitReached,
    /// The document couldn't be parsed by roxmltree
    ROXML(roxmltree::Error),
    /// The document couldn't be read due to an IO issue
    IO(std::io::Error),
    /// The document is compressed but decompression isn't available
    MissingCapability(Capability),
    /// The document has no root element
    NoElementInDocument,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodesLimitReached => f.write_str("the maximum depth of 1024 nodes was reached"),
            Self::ROXML(err) => err.fmt(f),
            Self::IO(err) => err.fmt(f),
            Self::MissingCapability(capability) => {
                f.write_fmt(format_args!("cannot read document without {capability}"))
            }
            Self::NoElementInDocument => f.write_str("no element in document"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ROXML(err) => Some(err),
            Self::IO(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug)]
/// The errors which may occur while writing a document to a file.
pub enum SaveError {
    /// The document couldn't be serialized
    Serialize(xmlwriter::Error),
    /// The file couldn't be written
    IO(std::io::Error),
    /// The destination is compressed but compression isn't available
    MissingCapability(Capability),
}

impl Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => err.fmt(f),
            Self::IO(err) => err.fmt(f),
            Self::MissingCapability(capability) => {
                f.write_fmt(format_args!("cannot write document without {capability}"))
            }
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::IO(err) => Some(err),
            Self::MissingCapability(_) => None,
        }
    }
}

impl From<xmlwriter::Error> for SaveError {
    fn from(value: xmlwriter::Error) -> Self {
        Self::Serialize(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The errors which may occur while changing the structure of a tree.
pub enum TreeError {
    /// A node cannot be appended to itself or to one of it's descendants
    HierarchyRequest,
    /// Only elements can have children appended
    NotAnElement,
}

impl Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HierarchyRequest => {
                f.write_str("cannot append a node to itself or to one of it's descendants")
            }
            Self::NotAnElement => f.write_str("only elements can contain child nodes"),
        }
    }
}

impl std::error::Error for TreeError {}

//! Reading and writing documents which may be gzip compressed.
use std::{ffi::OsStr, io::Read, path::Path};

use crate::error::{ParseError, SaveError};

/// The extension of gzip compressed documents
pub const COMPRESSED_EXTENSION: &str = "svgz";

/// Whether the path has the `svgz` extension, ignoring case
pub fn is_compressed(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|extension| extension.eq_ignore_ascii_case(COMPRESSED_EXTENSION))
}

/// Reads the file to a string, decompressing it when the path is [compressed](is_compressed)
///
/// # Errors
///
/// If the file cannot be read, or if it's compressed and the `gzip` feature is disabled
pub fn read_to_string(path: &Path) -> Result<String, ParseError> {
    if !is_compressed(path) {
        return std::fs::read_to_string(path).map_err(ParseError::IO);
    }
    let file = std::fs::File::open(path).map_err(ParseError::IO)?;
    decompress(file)
}

/// Writes the bytes to the file, compressing them when the path is [compressed](is_compressed)
///
/// # Errors
///
/// If the file cannot be written, or if it's compressed and the `gzip` feature is disabled, in
/// which case no file is created
pub fn write(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    if !is_compressed(path) {
        return std::fs::write(path, bytes).map_err(SaveError::IO);
    }
    compress(path, bytes)
}

#[cfg(feature = "gzip")]
fn decompress(reader: impl Read) -> Result<String, ParseError> {
    let mut text = String::new();
    flate2::read::GzDecoder::new(reader)
        .read_to_string(&mut text)
        .map_err(ParseError::IO)?;
    Ok(text)
}

#[cfg(not(feature = "gzip"))]
fn decompress(_reader: impl Read) -> Result<String, ParseError> {
    Err(ParseError::MissingCapability(crate::error::Capability::Gzip))
}

#[cfg(feature = "gzip")]
fn compress(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    use std::io::Write;

    let file = std::fs::File::create(path).map_err(SaveError::IO)?;
    let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    encoder.write_all(bytes).map_err(SaveError::IO)?;
    encoder.finish().map_err(SaveError::IO)?.flush().map_err(SaveError::IO)
}

#[cfg(not(feature = "gzip"))]
fn compress(_path: &Path, _bytes: &[u8]) -> Result<(), SaveError> {
    Err(SaveError::MissingCapability(crate::error::Capability::Gzip))
}

#[test]
fn compressed_extension() {
    assert!(is_compressed(Path::new("drawing.svgz")));
    assert!(is_compressed(Path::new("DRAWING.SVGZ")));
    assert!(!is_compressed(Path::new("drawing.svg")));
    assert!(!is_compressed(Path::new("svgz")));
}

#[test]
#[cfg(feature = "gzip")]
fn gzip_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("drawing.svgz");
    write(&path, b"<svg/>")?;

    let raw = std::fs::read(&path)?;
    assert_eq!(&raw[..2], &[0x1f, 0x8b], "written with a gzip header");
    assert_eq!(read_to_string(&path)?, "<svg/>");
    Ok(())
}

#[test]
#[cfg(not(feature = "gzip"))]
fn gzip_unavailable() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("drawing.svgz");
    assert!(matches!(
        write(&path, b"<svg/>"),
        Err(SaveError::MissingCapability(crate::error::Capability::Gzip))
    ));
    assert!(!path.exists(), "nothing is written without compression");
    Ok(())
}

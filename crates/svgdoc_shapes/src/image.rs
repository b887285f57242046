//! Referencing and embedding pictures with `<image>`.
use std::{ffi::OsStr, fmt::Display, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use svgdoc_ast::{name::XLINK_NS, Document};

use crate::shape::{Dimensioned, Image, Positioned, Shape};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug)]
/// An error while reading or decoding a picture
pub enum ImageError {
    /// The picture could not be read
    IO(std::io::Error),
    /// The embedded picture isn't valid base64
    Decode(base64::DecodeError),
    /// The image doesn't reference any picture
    NotEmbedded,
}

impl Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(err) => err.fmt(f),
            Self::Decode(err) => write!(f, "invalid embedded image: {err}"),
            Self::NotEmbedded => f.write_str("image has no picture"),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IO(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::NotEmbedded => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The parts of a `data:` uri, such as `data:image/png;base64,iVBOR...`
pub struct ImageData {
    /// The media type, e.g. `image/png`
    pub mime: String,
    /// The encoding of the payload, e.g. `base64`, or empty
    pub encoding: String,
    /// The text following the comma
    pub payload: String,
}

impl ImageData {
    /// Splits a `data:` uri into it's parts
    pub fn parse(uri: &str) -> Option<Self> {
        let (meta, payload) = uri.strip_prefix("data:")?.split_once(',')?;
        let (mime, encoding) = meta.split_once(';').unwrap_or((meta, ""));
        Some(Self {
            mime: mime.to_string(),
            encoding: encoding.to_string(),
            payload: payload.to_string(),
        })
    }
}

/// Returns the media type for the extension of the path
pub fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Reads the width and height from the header of a PNG or GIF picture
pub fn dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.starts_with(PNG_SIGNATURE) {
        let width = bytes.get(16..20)?;
        let height = bytes.get(20..24)?;
        return Some((
            u32::from_be_bytes(width.try_into().ok()?),
            u32::from_be_bytes(height.try_into().ok()?),
        ));
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        let width = bytes.get(6..8)?;
        let height = bytes.get(8..10)?;
        return Some((
            u16::from_le_bytes(width.try_into().ok()?).into(),
            u16::from_le_bytes(height.try_into().ok()?).into(),
        ));
    }
    None
}

impl Image {
    /// Creates a detached image for the document, see [`Image::set_image`]
    ///
    /// # Errors
    ///
    /// If the picture is embedded and cannot be read
    pub fn new(
        document: &Document,
        x: impl Display,
        y: impl Display,
        path: impl AsRef<Path>,
        embed: bool,
        id: Option<&str>,
    ) -> Result<Self, ImageError> {
        let image = Self::create(document);
        image.set_x(x);
        image.set_y(y);
        image.set_id(id);
        image.set_image(path, embed)?;
        Ok(image)
    }

    /// Points the image at a picture.
    ///
    /// When embedded, the picture is read into a base64 `data:` uri and the size is taken from
    /// it's header when it's a PNG or GIF. Otherwise the path is referenced as is.
    ///
    /// # Errors
    ///
    /// If the picture is embedded and cannot be read
    pub fn set_image(&self, path: impl AsRef<Path>, embed: bool) -> Result<(), ImageError> {
        let path = path.as_ref();
        if !embed {
            self.set_href(&path.to_string_lossy());
            return Ok(());
        }

        let bytes = std::fs::read(path).map_err(ImageError::IO)?;
        match dimensions(&bytes) {
            Some((width, height)) => {
                self.set_width(width);
                self.set_height(height);
            }
            None => log::debug!("no size found for {}", path.display()),
        }
        self.set_href(&format!(
            "data:{};base64,{}",
            mime_type(path),
            STANDARD.encode(bytes)
        ));
        Ok(())
    }

    /// Returns the `xlink:href` of the image
    pub fn href(&self) -> String {
        self.node().get_attribute_ns(Some(XLINK_NS), "href")
    }

    /// Sets the `xlink:href` of the image
    pub fn set_href(&self, href: &str) {
        self.node().set_attribute_ns(Some(XLINK_NS), "xlink:href", href);
    }

    /// Returns the parts of the embedded picture, if the image has one
    pub fn image_data(&self) -> Option<ImageData> {
        ImageData::parse(&self.href())
    }

    /// Returns the picture's bytes, decoded from the `data:` uri or read from the referenced file
    ///
    /// # Errors
    ///
    /// If the image has no picture, the payload isn't valid base64 or the file cannot be read
    pub fn image_bytes(&self) -> Result<Vec<u8>, ImageError> {
        if let Some(data) = self.image_data() {
            if data.encoding != "base64" {
                return Ok(data.payload.into_bytes());
            }
            return STANDARD.decode(data.payload).map_err(ImageError::Decode);
        }
        let href = self.href();
        if href.is_empty() {
            return Err(ImageError::NotEmbedded);
        }
        std::fs::read(href).map_err(ImageError::IO)
    }
}

#[cfg(test)]
fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(&13_u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes
}

#[test]
fn embed() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("pixel.PNG");
    std::fs::write(&path, png(3, 2))?;

    let document = Document::new();
    let image = Image::new(&document, 1, 2, &path, true, Some("img"))?;
    assert_eq!(image.width(), "3");
    assert_eq!(image.height(), "2");
    assert!(image.href().starts_with("data:image/png;base64,iVBOR"));

    let data = image.image_data().ok_or(anyhow::anyhow!("not a data uri"))?;
    assert_eq!(data.mime, "image/png");
    assert_eq!(data.encoding, "base64");
    assert_eq!(image.image_bytes()?, png(3, 2));
    assert!(image
        .node()
        .to_string()
        .starts_with(r#"<image xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" x="1" y="2" id="img" width="3" height="2" xlink:href="data:image/png;base64,"#));
    Ok(())
}

#[test]
fn reference() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("anim.gif");
    std::fs::write(&path, b"GIF89a\x10\x00\x20\x00rest")?;
    assert_eq!(dimensions(&std::fs::read(&path)?), Some((16, 32)));

    let document = Document::new();
    let image = Image::new(&document, 0, 0, &path, false, Some("img"))?;
    assert_eq!(image.href(), path.to_string_lossy());
    assert_eq!(image.width(), "", "referenced pictures aren't measured");
    assert_eq!(image.image_data(), None);
    assert_eq!(image.image_bytes()?, b"GIF89a\x10\x00\x20\x00rest");
    Ok(())
}

#[test]
fn errors() {
    let document = Document::new();
    assert!(matches!(
        Image::new(&document, 0, 0, "missing.png", true, None),
        Err(ImageError::IO(_))
    ));

    let image = Image::create(&document);
    assert!(matches!(image.image_bytes(), Err(ImageError::NotEmbedded)));
    image.set_href("data:image/png;base64,!!!");
    assert!(matches!(image.image_bytes(), Err(ImageError::Decode(_))));
    image.set_href("data:,hello");
    assert!(matches!(image.image_bytes().as_deref(), Ok(b"hello")));
}

#[test]
fn mime_types() {
    assert_eq!(mime_type(Path::new("a.jpeg")), "image/jpeg");
    assert_eq!(mime_type(Path::new("a.JPG")), "image/jpeg");
    assert_eq!(mime_type(Path::new("a.svg")), "image/svg+xml");
    assert_eq!(mime_type(Path::new("a.webp")), "image/webp");
    assert_eq!(mime_type(Path::new("a")), "application/octet-stream");
    assert_eq!(
        ImageData::parse("data:text/plain,hi"),
        Some(ImageData {
            mime: "text/plain".into(),
            encoding: String::new(),
            payload: "hi".into()
        })
    );
}

//! Rasterizing documents with an external program, falling back to another one when the
//! preferred program fails.
use std::{
    ffi::OsString,
    fmt::Display,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use serde::{Deserialize, Serialize};
use svgdoc_ast::{serialize::Options, xmlwriter, Document};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// The size of an exported picture. A dimension of `0` keeps the document's own size.
pub struct ExportSize {
    /// The width in pixels
    pub width: u32,
    /// The height in pixels
    pub height: u32,
    /// Whether the aspect ratio is kept when both dimensions are given
    pub keep_ratio: bool,
}

impl ExportSize {
    /// The size as an ImageMagick geometry, e.g. `64x32!`
    fn geometry(&self) -> Option<String> {
        let dimension = |value: u32| {
            if value == 0 {
                String::new()
            } else {
                value.to_string()
            }
        };
        match (self.width, self.height) {
            (0, 0) => None,
            (width, height) => Some(format!(
                "{}x{}{}",
                dimension(width),
                dimension(height),
                if self.keep_ratio || width == 0 || height == 0 {
                    ""
                } else {
                    "!"
                }
            )),
        }
    }
}

#[derive(Debug)]
/// An error while exporting a document
pub enum ExportError {
    /// The program could not be started or written to
    Spawn(std::io::Error),
    /// The program exited unsuccessfully
    Failed {
        /// The name of the program
        engine: &'static str,
        /// The exit code, if the program wasn't stopped by a signal
        status: Option<i32>,
        /// What the program wrote to stderr
        stderr: String,
    },
    /// The document could not be serialized
    Serialize(xmlwriter::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn(err) => write!(f, "failed to run rasterizer: {err}"),
            Self::Failed {
                engine,
                status: Some(code),
                stderr,
            } => write!(f, "{engine} exited with code {code}: {stderr}"),
            Self::Failed { engine, stderr, .. } => write!(f, "{engine} was terminated: {stderr}"),
            Self::Serialize(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Failed { .. } => None,
        }
    }
}

/// A program which writes an SVG document as a raster picture
pub trait Rasterizer {
    /// The name of the program, used in errors and logs
    fn name(&self) -> &'static str;

    /// Writes the SVG source as a picture at `output`. The kind of picture follows the
    /// extension of `output`.
    ///
    /// # Errors
    ///
    /// If the program cannot be started or fails
    fn rasterize(&self, svg: &[u8], output: &Path, size: &ExportSize) -> Result<(), ExportError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
/// The external programs available for exporting
pub enum Engine {
    #[default]
    #[value(name = "imagemagick")]
    /// [ImageMagick](https://imagemagick.org), run as `magick`
    ImageMagick,
    /// [Inkscape](https://inkscape.org), run as `inkscape`
    Inkscape,
}

impl Engine {
    /// Returns the rasterizer running the program from `PATH`
    pub fn rasterizer(self) -> Box<dyn Rasterizer> {
        match self {
            Self::ImageMagick => Box::new(ImageMagick::default()),
            Self::Inkscape => Box::new(Inkscape::default()),
        }
    }

    /// Returns the engine to fall back to
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::ImageMagick => Self::Inkscape,
            Self::Inkscape => Self::ImageMagick,
        }
    }
}

#[derive(Debug, Clone)]
/// Runs `magick svg:- -thumbnail WxH[!] <output>`
pub struct ImageMagick {
    /// The program to run
    pub program: PathBuf,
}

impl Default for ImageMagick {
    fn default() -> Self {
        Self {
            program: PathBuf::from("magick"),
        }
    }
}

impl ImageMagick {
    fn command(&self, output: &Path, size: &ExportSize) -> Command {
        let mut command = Command::new(&self.program);
        command.arg("svg:-");
        if let Some(geometry) = size.geometry() {
            command.arg("-thumbnail").arg(geometry);
        }
        command.arg(output);
        command
    }
}

impl Rasterizer for ImageMagick {
    fn name(&self) -> &'static str {
        "imagemagick"
    }

    fn rasterize(&self, svg: &[u8], output: &Path, size: &ExportSize) -> Result<(), ExportError> {
        run(self.name(), self.command(output, size), svg)
    }
}

#[derive(Debug, Clone)]
/// Runs `inkscape --pipe --export-filename=<output> [-w W] [-h H]`
pub struct Inkscape {
    /// The program to run
    pub program: PathBuf,
}

impl Default for Inkscape {
    fn default() -> Self {
        Self {
            program: PathBuf::from("inkscape"),
        }
    }
}

impl Inkscape {
    fn command(&self, output: &Path, size: &ExportSize) -> Command {
        let mut command = Command::new(&self.program);
        let mut filename = OsString::from("--export-filename=");
        filename.push(output);
        command.arg("--pipe").arg(filename);
        if size.width > 0 {
            command.arg("-w").arg(size.width.to_string());
        }
        // inkscape scales the other dimension when only one is given
        if size.height > 0 && !(size.keep_ratio && size.width > 0) {
            command.arg("-h").arg(size.height.to_string());
        }
        command
    }
}

impl Rasterizer for Inkscape {
    fn name(&self) -> &'static str {
        "inkscape"
    }

    fn rasterize(&self, svg: &[u8], output: &Path, size: &ExportSize) -> Result<(), ExportError> {
        run(self.name(), self.command(output, size), svg)
    }
}

fn run(engine: &'static str, mut command: Command, svg: &[u8]) -> Result<(), ExportError> {
    log::debug!("running {command:?}");
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(ExportError::Spawn)?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(svg) {
            // the exit status explains why the program stopped reading
            Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {}
            result => result.map_err(ExportError::Spawn)?,
        }
    }

    let output = child.wait_with_output().map_err(ExportError::Spawn)?;
    if output.status.success() {
        return Ok(());
    }
    Err(ExportError::Failed {
        engine,
        status: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Exports the document with the preferred engine, falling back to the other engine.
///
/// Returns the name of the engine which wrote the picture.
///
/// # Errors
///
/// If the document cannot be serialized, or if both engines fail, in which case the error of
/// the preferred engine is returned
pub fn export(
    document: &Document,
    output: &Path,
    size: &ExportSize,
    preferred: Engine,
) -> Result<&'static str, ExportError> {
    export_with(
        document,
        output,
        size,
        preferred.rasterizer().as_ref(),
        preferred.other().rasterizer().as_ref(),
    )
}

/// Exports the document with the given rasterizers, see [`export`]
///
/// # Errors
///
/// If the document cannot be serialized, or if both rasterizers fail, in which case the error
/// of `preferred` is returned
pub fn export_with(
    document: &Document,
    output: &Path,
    size: &ExportSize,
    preferred: &dyn Rasterizer,
    fallback: &dyn Rasterizer,
) -> Result<&'static str, ExportError> {
    let svg = document
        .to_xml(Options {
            pretty: false,
            prolog: false,
        })
        .map_err(ExportError::Serialize)?;

    let first_error = match preferred.rasterize(svg.as_bytes(), output, size) {
        Ok(()) => return Ok(preferred.name()),
        Err(err) => err,
    };
    log::warn!(
        "{} failed, trying {}: {first_error}",
        preferred.name(),
        fallback.name()
    );
    match fallback.rasterize(svg.as_bytes(), output, size) {
        Ok(()) => Ok(fallback.name()),
        Err(err) => {
            log::warn!("{} failed: {err}", fallback.name());
            Err(first_error)
        }
    }
}

#[cfg(test)]
struct Fake {
    name: &'static str,
    succeeds: bool,
    received: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl Fake {
    fn new(name: &'static str, succeeds: bool) -> Self {
        Self {
            name,
            succeeds,
            received: std::cell::RefCell::default(),
        }
    }
}

#[cfg(test)]
impl Rasterizer for Fake {
    fn name(&self) -> &'static str {
        self.name
    }

    fn rasterize(&self, svg: &[u8], _output: &Path, _size: &ExportSize) -> Result<(), ExportError> {
        self.received
            .borrow_mut()
            .push(String::from_utf8_lossy(svg).into_owned());
        if self.succeeds {
            return Ok(());
        }
        Err(ExportError::Failed {
            engine: self.name,
            status: Some(1),
            stderr: format!("{} is broken", self.name),
        })
    }
}

#[test]
fn fallback() -> anyhow::Result<()> {
    let document = Document::new();
    let output = Path::new("out.png");
    let size = ExportSize::default();

    let first = Fake::new("first", false);
    let second = Fake::new("second", true);
    assert_eq!(
        export_with(&document, output, &size, &first, &second)?,
        "second"
    );
    assert_eq!(
        second.received.borrow().as_slice(),
        [r#"<svg xmlns="http://www.w3.org/2000/svg" width="210mm" height="297mm" version="1.1"/>"#],
        "the svg is written without the xml declaration"
    );

    let first = Fake::new("first", true);
    let second = Fake::new("second", true);
    assert_eq!(export_with(&document, output, &size, &first, &second)?, "first");
    assert!(second.received.borrow().is_empty());
    Ok(())
}

#[test]
fn both_fail() {
    let document = Document::new();
    let first = Fake::new("first", false);
    let second = Fake::new("second", false);
    let result = export_with(
        &document,
        Path::new("out.png"),
        &ExportSize::default(),
        &first,
        &second,
    );
    assert!(matches!(result, Err(ExportError::Failed { engine: "first", .. })));
    assert_eq!(second.received.borrow().len(), 1);
}

#[test]
fn missing_program() {
    let magick = ImageMagick {
        program: PathBuf::from("svgdoc-missing-rasterizer"),
    };
    assert!(matches!(
        magick.rasterize(b"<svg/>", Path::new("out.png"), &ExportSize::default()),
        Err(ExportError::Spawn(_))
    ));
}

#[test]
fn arguments() {
    let args = |command: Command| {
        command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
    };
    let output = Path::new("out.png");
    let exact = ExportSize {
        width: 64,
        height: 32,
        keep_ratio: false,
    };
    let ratio = ExportSize {
        keep_ratio: true,
        ..exact
    };

    let magick = ImageMagick::default();
    assert_eq!(
        args(magick.command(output, &exact)),
        ["svg:-", "-thumbnail", "64x32!", "out.png"]
    );
    assert_eq!(
        args(magick.command(output, &ratio)),
        ["svg:-", "-thumbnail", "64x32", "out.png"]
    );
    assert_eq!(
        args(magick.command(output, &ExportSize::default())),
        ["svg:-", "out.png"]
    );

    let inkscape = Inkscape::default();
    assert_eq!(
        args(inkscape.command(output, &exact)),
        ["--pipe", "--export-filename=out.png", "-w", "64", "-h", "32"]
    );
    assert_eq!(
        args(inkscape.command(output, &ratio)),
        ["--pipe", "--export-filename=out.png", "-w", "64"]
    );
    assert_eq!(
        args(inkscape.command(output, &ExportSize { width: 0, ..ratio })),
        ["--pipe", "--export-filename=out.png", "-h", "32"]
    );
}

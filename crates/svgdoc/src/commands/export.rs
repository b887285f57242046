use std::path::PathBuf;

use anyhow::Context;
use svgdoc_ast::Document;

use crate::{
    args::RunCommand,
    config::Config,
    export::{export, Engine, ExportSize},
};

#[derive(clap::Args, Debug)]
/// Writes a document as a raster picture using ImageMagick or Inkscape, trying the other when
/// the first fails
pub struct Export {
    /// The document to export
    #[clap(value_parser)]
    pub path: PathBuf,
    /// The picture to write. It's extension decides the kind of picture.
    #[clap(long, short)]
    pub output: PathBuf,
    /// The width in pixels. Defaults to the document's width
    #[clap(long)]
    pub width: Option<u32>,
    /// The height in pixels. Defaults to the document's height
    #[clap(long)]
    pub height: Option<u32>,
    /// Keeps the aspect ratio when both dimensions are given
    #[clap(long)]
    pub keep_ratio: bool,
    /// The program tried first
    #[clap(long, value_enum)]
    pub engine: Option<Engine>,
}

impl Export {
    fn size(&self, config: &Config) -> ExportSize {
        let defaults = ExportSize::from(config.export);
        ExportSize {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            keep_ratio: self.keep_ratio || defaults.keep_ratio,
        }
    }
}

impl RunCommand for Export {
    fn run(self, config: Config) -> anyhow::Result<()> {
        let document = Document::open_with_options(&self.path, config.document_options())
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let engine = self.engine.unwrap_or(config.export.engine);
        let used = export(&document, &self.output, &self.size(&config), engine)
            .with_context(|| format!("Failed to export {}", self.path.display()))?;
        log::info!("exported {} with {used}", self.output.display());
        Ok(())
    }
}

#[test]
fn size() {
    let config = Config {
        export: crate::config::Export {
            width: 100,
            height: 50,
            ..crate::config::Export::default()
        },
        ..Config::default()
    };
    let export = Export {
        path: PathBuf::from("in.svg"),
        output: PathBuf::from("out.png"),
        width: Some(10),
        height: None,
        keep_ratio: true,
        engine: None,
    };
    assert_eq!(
        export.size(&config),
        ExportSize {
            width: 10,
            height: 50,
            keep_ratio: true
        },
        "flags override the configuration"
    );
}

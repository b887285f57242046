use std::path::PathBuf;

use anyhow::{anyhow, Context};
use svgdoc_ast::{compress, serialize::Options, Document};

use crate::{
    args::RunCommand,
    config::Config,
    walk::{destination, documents},
};

#[derive(clap::Args, Debug)]
/// Parses and writes documents again, optionally compressing them
pub struct Format {
    /// The target files or directories to format. Directories are searched one level deep
    /// for `.svg` and `.svgz` files.
    #[clap(value_parser, required = true)]
    pub paths: Vec<PathBuf>,
    /// The file or directory to write to. Files ending with `.svgz` are compressed.
    /// Defaults to stdout
    #[clap(long, short)]
    pub output: Option<PathBuf>,
    /// Writes each element on it's own line
    #[clap(long)]
    pub pretty: bool,
    /// Omits the xml declaration
    #[clap(long)]
    pub no_prolog: bool,
}

impl Format {
    fn options(&self, config: &Config) -> Options {
        Options {
            pretty: self.pretty || config.format.pretty,
            prolog: !self.no_prolog && config.format.prolog,
        }
    }
}

impl RunCommand for Format {
    fn run(self, config: Config) -> anyhow::Result<()> {
        let options = self.options(&config);
        let inputs = documents(&self.paths)?;
        if inputs.len() > 1 && self.output.as_ref().is_some_and(|output| !output.is_dir()) {
            return Err(anyhow!(
                "Formatting {} documents requires the output to be a directory",
                inputs.len()
            ));
        }

        for input in &inputs {
            let document = Document::open_with_options(input, config.document_options())
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let xml = document.to_xml(options)?;
            let Some(output) = &self.output else {
                println!("{}", xml.trim_end_matches('\n'));
                continue;
            };

            let output = destination(output, input);
            if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            compress::write(&output, xml.as_bytes())
                .with_context(|| format!("Failed to write {}", output.display()))?;
            log::info!("{} -> {}", input.display(), output.display());
        }
        Ok(())
    }
}

//! The arguments of the CLI
use clap::{Parser, Subcommand};

use crate::{
    commands::{Export, Find, Format},
    config::Config,
};

/// A command of the CLI
pub trait RunCommand {
    /// # Errors
    ///
    /// If any part of the lifecycle fails
    /// * Fails to read or parse any files
    /// * Fails to write or serialize to any files
    fn run(self, config: Config) -> anyhow::Result<()>;
}

#[derive(Parser, Debug)]
#[clap(
    bin_name = "svgdoc",
    name = "svgdoc",
    author,
    version,
    about = "Format, search and export SVG documents",
    long_about = None
)]
/// The arguments of the CLI
pub struct Args {
    #[clap(subcommand)]
    /// The command to run
    pub command: Command,
}

#[derive(Subcommand, Debug)]
/// The commands of the CLI
pub enum Command {
    /// Re-serialize SVG documents
    Format(Format),
    /// Print the elements of a document matching an attribute
    Find(Find),
    /// Rasterize a document with an external program
    Export(Export),
}

impl RunCommand for Command {
    fn run(self, config: Config) -> anyhow::Result<()> {
        match self {
            Self::Format(format) => format.run(config),
            Self::Find(find) => find.run(config),
            Self::Export(export) => export.run(config),
        }
    }
}

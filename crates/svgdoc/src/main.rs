//! Svgdoc formats, searches and exports SVG documents.

use clap::Parser;
use svgdoc::{
    args::{Args, RunCommand},
    config::Config,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = Config::load()?;

    args.command.run(config)
}

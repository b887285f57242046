//! Types for the configuration file usable by svgdoc
use std::{
    env::current_dir,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::Context;
use etcetera::{choose_base_strategy, BaseStrategy};
use serde::{Deserialize, Serialize};
use svgdoc_ast::{serialize, DocumentOptions};

use crate::export::{Engine, ExportSize};

/// The name of the configuration file looked for in the working directory
pub const LOCAL_CONFIG: &str = "svgdocrc.json";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
/// How documents are written by `format`
pub struct Format {
    /// Whether each element is written on it's own line
    pub pretty: bool,
    /// Whether the xml declaration is written
    pub prolog: bool,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            pretty: false,
            prolog: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
/// How documents are rasterized by `export`
pub struct Export {
    /// The program tried first
    pub engine: Engine,
    /// The width in pixels, or `0` for the document's width
    pub width: u32,
    /// The height in pixels, or `0` for the document's height
    pub height: u32,
    /// Whether the aspect ratio is kept when both dimensions are given
    pub keep_ratio: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
/// The config for the CLI usage of svgdoc
pub struct Config {
    /// The defaults of `format`
    pub format: Format,
    /// The defaults of `export`
    pub export: Export,
    /// Whether ids are generated for new elements without one
    pub auto_id: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Format::default(),
            export: Export::default(),
            auto_id: true,
        }
    }
}

impl Config {
    fn load_local() -> std::io::Result<(String, PathBuf)> {
        let mut path = current_dir()?;
        path.push(LOCAL_CONFIG);
        Ok((read_to_string(&path)?, path))
    }

    fn load_base() -> std::io::Result<(String, PathBuf)> {
        let mut path = choose_base_strategy()
            .map_err(std::io::Error::other)?
            .config_dir();
        path.push("svgdoc");
        path.push("config.json");
        Ok((read_to_string(&path)?, path))
    }

    /// Tries loading the configuration from well-known paths, using the defaults when there is
    /// none
    ///
    /// # Errors
    /// When the config exists but cannot be parsed
    pub fn load() -> anyhow::Result<Self> {
        match Self::load_local().or_else(|_| Self::load_base()) {
            Ok((file, path)) => Self::parse(&file, &path),
            Err(err) => {
                log::debug!("no configuration loaded: {err}");
                Ok(Self::default())
            }
        }
    }

    /// Parses the configuration read from `path`
    ///
    /// # Errors
    /// When the config cannot be parsed
    pub fn parse(file: &str, path: &Path) -> anyhow::Result<Self> {
        let config = serde_json::from_str(file).with_context(|| {
            format!("Configuration at {} cannot be parsed", path.to_string_lossy())
        })?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// The options of documents opened by the CLI
    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            auto_id: self.auto_id,
            ..DocumentOptions::default()
        }
    }
}

impl From<Format> for serialize::Options {
    fn from(value: Format) -> Self {
        Self {
            pretty: value.pretty,
            prolog: value.prolog,
        }
    }
}

impl From<Export> for ExportSize {
    fn from(value: Export) -> Self {
        Self {
            width: value.width,
            height: value.height,
            keep_ratio: value.keep_ratio,
        }
    }
}

#[test]
fn serde() -> anyhow::Result<()> {
    let config = Config::parse(
        r#"{
        "format": { "pretty": true },
        "export": { "engine": "inkscape", "keepRatio": true, "width": 64 },
        "autoId": false
    }"#,
        Path::new(LOCAL_CONFIG),
    )?;

    pretty_assertions::assert_eq!(
        config,
        Config {
            format: Format {
                pretty: true,
                prolog: true,
            },
            export: Export {
                engine: Engine::Inkscape,
                width: 64,
                height: 0,
                keep_ratio: true,
            },
            auto_id: false,
        },
        "missing fields should use their defaults"
    );
    assert_eq!(
        serde_json::to_string(&Config::default())?,
        String::from(
            r#"{"format":{"pretty":false,"prolog":true},"export":{"engine":"imagemagick","width":0,"height":0,"keepRatio":false},"autoId":true}"#
        )
    );
    Ok(())
}

#[test]
fn invalid() {
    let error = Config::parse(r#"{ "format": { "pretty": "yes" } }"#, Path::new(LOCAL_CONFIG))
        .map(|_| ())
        .unwrap_err();
    assert!(error.to_string().contains("svgdocrc.json cannot be parsed"));
    assert_eq!(Config::parse("{}", Path::new(LOCAL_CONFIG)).ok(), Some(Config::default()));
}

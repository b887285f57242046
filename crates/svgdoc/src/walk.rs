//! Finds the documents to process from the paths given to a command, and decides where the
//! results of each are written.
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use anyhow::anyhow;
use ignore::WalkBuilder;
use svgdoc_ast::compress::COMPRESSED_EXTENSION;

/// Whether the path has an `svg` or `svgz` extension, ignoring case
pub fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|extension| {
            extension.eq_ignore_ascii_case("svg")
                || extension.eq_ignore_ascii_case(COMPRESSED_EXTENSION)
        })
}

/// Lists the files of the given paths. Files are listed as is, and directories are searched
/// one level deep for documents, sorted by name.
///
/// # Errors
///
/// When no paths are given or a path doesn't exist
pub fn documents(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    if paths.is_empty() {
        return Err(anyhow!("This command requires at least one path"));
    }

    let mut documents = vec![];
    for path in paths {
        if path.is_file() {
            documents.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            return Err(anyhow!("{} does not exist", path.display()));
        }
        for entry in WalkBuilder::new(path)
            .max_depth(Some(1))
            .follow_links(true)
            .sort_by_file_name(Ord::cmp)
            .build()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("skipping entry of {}: {err}", path.display());
                    continue;
                }
            };
            if entry.file_type().is_none_or(|file_type| !file_type.is_file()) {
                continue;
            }
            if is_svg(entry.path()) {
                documents.push(entry.into_path());
            }
        }
    }
    log::debug!("found {} documents", documents.len());
    Ok(documents)
}

/// Where the result for `input` is written. An existing directory receives a file of the same
/// name as the input.
pub fn destination(output: &Path, input: &Path) -> PathBuf {
    match input.file_name() {
        Some(name) if output.is_dir() => output.join(name),
        _ => output.to_path_buf(),
    }
}

#[test]
fn walk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let nested = dir.path().join("nested");
    std::fs::create_dir(&nested)?;
    for name in ["b.svg", "a.SVGZ", "notes.txt"] {
        std::fs::write(dir.path().join(name), "")?;
    }
    std::fs::write(nested.join("deep.svg"), "")?;
    let single = nested.join("deep.svg");

    let found = documents(&[dir.path().to_path_buf(), single.clone()])?;
    assert_eq!(
        found,
        vec![dir.path().join("a.SVGZ"), dir.path().join("b.svg"), single]
    );

    assert!(documents(&[]).is_err());
    assert!(documents(&[dir.path().join("missing")]).is_err());

    assert_eq!(destination(dir.path(), Path::new("in/b.svg")), dir.path().join("b.svg"));
    assert_eq!(
        destination(&dir.path().join("out.svgz"), Path::new("b.svg")),
        dir.path().join("out.svgz")
    );
    Ok(())
}
